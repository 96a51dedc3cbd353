pub type ViewshiftResult<T> = Result<T, ViewshiftError>;

#[derive(thiserror::Error, Debug)]
pub enum ViewshiftError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("animation not found: {0}")]
    NotFound(String),

    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewshiftError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDescriptor(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
