use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),

    #[error("field path {0:?} would replace a record key of the same name")]
    ReservedFieldPath(String),

    #[error("invalid deploy entry: {0:?}")]
    InvalidDeployEntry(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
