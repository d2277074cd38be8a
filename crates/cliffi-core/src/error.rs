//! Error taxonomy for the invocation engine.
//!
//! Every variant is terminal for the current run: the tool performs
//! exactly one call per invocation, so there is no retry layer. Errors
//! are detected as early as possible (parse before marshal before load
//! before dispatch) and each names the offending token, path, or symbol.

use thiserror::Error;

use crate::types::TypeTag;

/// Errors that can occur while parsing, marshaling, or dispatching a call.
#[derive(Error, Debug)]
pub enum CliffiError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(String),

    #[error("invalid return type '{0}'")]
    InvalidReturnType(String),

    #[error("malformed argument list: type tag '{0}' has no value")]
    MalformedArgumentList(String),

    #[error("cannot convert '{value}' to {tag}: {reason}")]
    ValueConversion {
        tag: TypeTag,
        value: String,
        reason: String,
    },

    #[error("failed to load library '{path}': {source}")]
    LibraryLoad {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("function '{name}' not found in '{path}': {source}")]
    SymbolNotFound {
        name: String,
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("call dispatch failed: {0}")]
    CallDispatch(String),
}

impl CliffiError {
    /// Process exit code for this error class.
    ///
    /// Parse-time failures share the conventional usage code; the later
    /// stages each get a distinct code so scripts can tell a missing
    /// library from a missing symbol.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliffiError::Usage(_)
            | CliffiError::UnknownTypeTag(_)
            | CliffiError::InvalidReturnType(_)
            | CliffiError::MalformedArgumentList(_) => 2,
            CliffiError::ValueConversion { .. } => 3,
            CliffiError::LibraryLoad { .. } => 4,
            CliffiError::SymbolNotFound { .. } => 5,
            CliffiError::CallDispatch(_) => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliffiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_stage() {
        let usage = CliffiError::Usage("missing function name".into());
        let conv = CliffiError::ValueConversion {
            tag: TypeTag::Int,
            value: "abc".into(),
            reason: "invalid digit".into(),
        };
        let dispatch = CliffiError::CallDispatch("null address".into());
        assert_eq!(usage.exit_code(), 2);
        assert_eq!(conv.exit_code(), 3);
        assert_eq!(dispatch.exit_code(), 6);
    }

    #[test]
    fn test_display_names_offending_token() {
        let err = CliffiError::UnknownTypeTag("q".into());
        assert_eq!(err.to_string(), "unknown type tag 'q'");

        let err = CliffiError::ValueConversion {
            tag: TypeTag::Char,
            value: "300".into(),
            reason: "value out of range".into(),
        };
        assert!(err.to_string().contains("300"));
        assert!(err.to_string().contains("char"));
    }
}
