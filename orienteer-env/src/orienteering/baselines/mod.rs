pub mod greedy;
pub mod random;
