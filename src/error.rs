use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid worker count: {0} (at least one worker is required)")]
    InvalidWorkerCount(usize),
    #[error("Worker failed: {0}")]
    WorkerFailed(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::WorkerFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
