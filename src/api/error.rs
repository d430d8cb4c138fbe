use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Invalid Route")]
    InvalidRoute,
    #[error("Invalid request payload")]
    InvalidPayload,
    #[error("Text field cannot be empty")]
    EmptyText,
    #[error("Input must be a non-negative integer")]
    InvalidNumber,
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::MethodNotAllowed => 405,
            ApiError::InvalidRoute
            | ApiError::InvalidPayload
            | ApiError::EmptyText
            | ApiError::InvalidNumber => 400,
        }
    }
}
