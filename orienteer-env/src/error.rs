use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvError>;

#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid tour: {0}")]
    Validation(#[from] ValidationError),
    #[error("malformed batch input: {0}")]
    Batch(String),
    #[error("{0} is not supported")]
    Unimplemented(&'static str),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no travel budget configured for {num_loc} locations")]
    UnsupportedNodeCount { num_loc: usize },
    #[error("{field} bounds are inverted (min {min}, max {max})")]
    InvalidBounds {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("batch shape {0:?} holds no instances")]
    EmptyBatch(Vec<usize>),
    #[error("number of locations must be at least 1")]
    ZeroLocations,
    #[error("field `{field}` of instance {instance} is outside its declared bounds")]
    ObservationOutOfBounds {
        field: &'static str,
        instance: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("instance {instance}: node {node} is visited more than once")]
    DuplicateVisit { instance: usize, node: usize },
    #[error("instance {instance}: node {node} does not exist")]
    NodeOutOfRange { instance: usize, node: usize },
    #[error(
        "instance {instance}: tour length {length} exceeds capacity {capacity} by {excess}"
    )]
    MaxLengthExceeded {
        instance: usize,
        length: f32,
        capacity: f32,
        excess: f32,
    },
    #[error("instance {instance}: tracked prize {tracked} disagrees with tour prize {recomputed}")]
    PrizeMismatch {
        instance: usize,
        tracked: f32,
        recomputed: f32,
    },
}
