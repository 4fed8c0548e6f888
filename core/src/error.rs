use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Weights for '{field}' sum to {sum}, expected 1.0")]
    InvalidWeights { field: &'static str, sum: f64 },

    #[error("Range for '{field}' is inverted: min {min} > max {max}")]
    InvertedRange { field: &'static str, min: u32, max: u32 },

    #[error("Probability for '{field}' is outside [0, 1]: {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("Clip bounds for '{field}' are misordered: lo {lo} > hi {hi}")]
    MisorderedClip { field: &'static str, lo: f64, hi: f64 },

    #[error("Table '{field}' has no entry for '{missing}'")]
    IncompleteTable { field: &'static str, missing: &'static str },

    #[error("Parameter '{field}' is invalid: {value}")]
    InvalidParameter { field: &'static str, value: f64 },

    #[error("Row count must be at least 1")]
    EmptyTable,

    #[error("Run '{run_id}' not found")]
    RunNotFound { run_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GenResult<T> = Result<T, GenError>;
