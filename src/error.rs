//! Error types for the scheme and codec

use thiserror::Error;

/// Result type for scheme operations
pub type Result<T> = std::result::Result<T, SchemeError>;

/// Scheme and codec errors
///
/// Registration errors (`KindConflict`, `InvalidKindName`, `InvalidVersion`)
/// indicate a misconfigured build and are expected to abort startup. All other
/// variants are caused by input and are returned to the caller.
#[derive(Error, Debug)]
pub enum SchemeError {
    #[error("Kind {kind:?} in version {version} is already bound to {existing}, cannot bind it to {attempted}")]
    KindConflict {
        version: String,
        kind: String,
        existing: &'static str,
        attempted: &'static str,
    },

    #[error("Invalid kind name: {0:?}")]
    InvalidKindName(String),

    #[error("Invalid version: {0:?}")]
    InvalidVersion(String),

    #[error("Not found: {what} in version {version}")]
    NotFound { what: String, version: String },

    #[error("Unregistered kind {kind:?} in version {version}{}", suggestion_suffix(.suggestion))]
    UnregisteredKind {
        kind: String,
        version: String,
        suggestion: Option<String>,
    },

    #[error("Version mismatch: codec expects {expected}, payload declares {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Type mismatch: expected {expected}, payload decoded to {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemeError {
    /// Whether this error was raised while registering types
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            SchemeError::KindConflict { .. }
                | SchemeError::InvalidKindName(_)
                | SchemeError::InvalidVersion(_)
        )
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(kind) => format!(" (did you mean {kind:?}?)"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_errors_are_classified() {
        let conflict = SchemeError::KindConflict {
            version: "v1beta1".to_string(),
            kind: "Pod".to_string(),
            existing: "a::Pod",
            attempted: "b::Pod",
        };
        assert!(conflict.is_registration_error());
        assert!(SchemeError::InvalidVersion("1".to_string()).is_registration_error());
        assert!(!SchemeError::Decode("eof".to_string()).is_registration_error());
    }

    #[test]
    fn test_unregistered_kind_message() {
        let err = SchemeError::UnregisteredKind {
            kind: "Nod".to_string(),
            version: "v1beta1".to_string(),
            suggestion: Some("Node".to_string()),
        };
        assert_eq!(
            err.to_string(),
            r#"Unregistered kind "Nod" in version v1beta1 (did you mean "Node"?)"#
        );

        let err = SchemeError::UnregisteredKind {
            kind: "Widget".to_string(),
            version: "v1".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), r#"Unregistered kind "Widget" in version v1"#);
    }
}
