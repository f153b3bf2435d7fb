pub mod error;
pub use error::{ConfigError, EnvError, ValidationError};
pub mod orienteering;
pub use orienteering as op;
