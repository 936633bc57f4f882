//! Error handling utilities for MCP servers
//!
//! Domain errors describe which MCP error class they belong to by implementing
//! [`Classified`]; the blanket [`IntoMcpError`] impl turns any classified
//! error into the protocol error, keeping the error's own message.

use rmcp::ErrorData as McpError;
use serde_json::Value;

/// MCP error classes a domain error can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent arguments the server cannot act on
    InvalidParams,
    /// Everything else, including failures reported by backing services
    Internal,
}

/// An error that knows which MCP error class it belongs to
///
/// ```rust,ignore
/// impl Classified for StoreError {
///     fn class(&self) -> ErrorClass {
///         match self {
///             StoreError::BadKey(_) => ErrorClass::InvalidParams,
///             _ => ErrorClass::Internal,
///         }
///     }
/// }
/// ```
pub trait Classified: std::fmt::Display {
    fn class(&self) -> ErrorClass {
        ErrorClass::Internal
    }

    /// Structured data attached to the MCP error
    fn data(&self) -> Option<Value> {
        None
    }
}

/// Conversion into the MCP error type
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl<E: Classified> IntoMcpError for E {
    fn into_mcp_error(self) -> McpError {
        let data = self.data();
        let message = self.to_string();
        match self.class() {
            ErrorClass::InvalidParams => McpError::invalid_params(message, data),
            ErrorClass::Internal => McpError::internal_error(message, data),
        }
    }
}

/// Extension trait for Result types to convert to MCP errors
///
/// ```rust,ignore
/// let rows = executor.execute(&params.sql).await.to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    /// Convert the error to an MCP error
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[derive(Debug)]
    enum LookupError {
        BadKey(String),
        Backend,
    }

    impl std::fmt::Display for LookupError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                LookupError::BadKey(k) => write!(f, "bad key: {}", k),
                LookupError::Backend => write!(f, "backend down"),
            }
        }
    }

    impl Classified for LookupError {
        fn class(&self) -> ErrorClass {
            match self {
                LookupError::BadKey(_) => ErrorClass::InvalidParams,
                LookupError::Backend => ErrorClass::Internal,
            }
        }
    }

    struct Unclassified;

    impl std::fmt::Display for Unclassified {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    impl Classified for Unclassified {}

    #[test]
    fn test_default_class_is_internal() {
        let err = Unclassified.into_mcp_error();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("test error"));
        assert!(err.data.is_none());
    }

    #[test]
    fn test_classified_errors_keep_their_class() {
        let err = LookupError::BadKey("x".into()).into_mcp_error();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "bad key: x");

        let err = LookupError::Backend.into_mcp_error();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_result_ext() {
        let result: Result<(), LookupError> = Err(LookupError::BadKey("k".into()));
        let mcp_result = result.to_mcp_err();
        assert_eq!(mcp_result.unwrap_err().code, ErrorCode::INVALID_PARAMS);
    }
}
