use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to write record: {0}")]
    Emit(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
