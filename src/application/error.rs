use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::moderation::ModerationError, config::LoadError, domain::error::DomainError,
    infra::error::InfraError,
};

/// Flattened error chain for reporting at the binary boundary.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            let message = inner.to_string();
            if messages.last() != Some(&message) {
                messages.push(message);
            }
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Moderation(#[from] ModerationError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status: 2 for usage and configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Domain(_) => 2,
            AppError::Infra(InfraError::Configuration { .. }) => 2,
            AppError::Moderation(ModerationError::Validation(_)) => 2,
            AppError::Infra(_) | AppError::Moderation(_) | AppError::Unexpected(_) => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let error = AppError::from(LoadError::Missing { key: "api.base_url" });
        let report = error.report();

        assert_eq!(
            report.messages,
            vec![
                "failed to load configuration".to_string(),
                "missing configuration for `api.base_url`".to_string(),
            ]
        );
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn transparent_errors_are_not_repeated() {
        let error = AppError::from(ModerationError::validation("feedback is required"));
        assert_eq!(error.report().messages, vec!["feedback is required".to_string()]);
    }
}
