use thiserror::Error;

/// Unified error type for the quicknotes crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Caller input was malformed; rejected before any network call.
    #[error("{0}")]
    Validation(String),
    /// A required credential or endpoint is absent.
    #[error("{0}")]
    Configuration(String),
    /// The data store rejected or failed a request.
    #[error("{0}")]
    Store(String),
    /// The store acknowledged a write but returned no row.
    #[error("store acknowledged the {0} but returned no row")]
    EmptyResponse(&'static str),
    /// The summarization provider call failed.
    #[error("{0}")]
    Provider(String),
    /// The request carried no usable session.
    #[error("{0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation",
            CoreError::Configuration(_) => "configuration",
            CoreError::Store(_) => "store",
            CoreError::EmptyResponse(_) => "empty_response",
            CoreError::Provider(_) => "provider",
            CoreError::Unauthorized(_) => "unauthorized",
        }
    }
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_carried_verbatim() {
        let error = CoreError::Provider("overloaded_error: try again".to_string());
        assert_eq!(error.to_string(), "overloaded_error: try again");
        assert_eq!(error.code(), "provider");
    }

    #[test]
    fn empty_response_names_the_operation() {
        let error = CoreError::EmptyResponse("insert");
        assert_eq!(
            error.to_string(),
            "store acknowledged the insert but returned no row"
        );
    }
}
