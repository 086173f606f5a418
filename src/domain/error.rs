use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {field} `{value}`")]
    UnknownValue { field: &'static str, value: String },
    #[error("invalid content identifier: {reason}")]
    InvalidId { reason: &'static str },
}

impl DomainError {
    pub fn unknown(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field,
            value: value.into(),
        }
    }
}
