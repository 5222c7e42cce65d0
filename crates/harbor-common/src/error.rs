//! Error types for the Harbor operator
//!
//! Errors carry structured fields so that diagnostics name the resource or
//! asset involved. Configuration assembly itself is infallible; the only
//! failures at this layer come from packaging (missing assets) and from
//! serializing resources at the edges.

use thiserror::Error;

/// Main error type for Harbor operator operations
#[derive(Debug, Error)]
pub enum Error {
    /// A static asset shipped with the operator could not be opened or read
    ///
    /// Assets are packaged alongside the binary, so this indicates a build or
    /// deployment defect rather than a transient fault.
    #[error("asset error [{path}]: {message}")]
    Asset {
        /// Path of the asset that failed to load
        path: String,
        /// Description of what failed
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create an asset error for the given path
    pub fn asset(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Whether this error is a packaging defect that must stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Asset { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_error_names_the_path() {
        let err = Error::asset("/assets/templates/core/app.conf", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("/assets/templates/core/app.conf"));
        assert!(msg.contains("file not found"));
        assert!(err.is_fatal());
    }

    #[test]
    fn serialization_error_keeps_kind() {
        let err = Error::serialization_for("Harbor", "missing field `publicURL`");
        match &err {
            Error::Serialization { kind, message } => {
                assert_eq!(kind.as_deref(), Some("Harbor"));
                assert!(message.contains("publicURL"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_fatal());
    }

    #[test]
    fn serialization_error_displays_message() {
        let err = Error::serialization_for("ConfigMap", "bad yaml");
        assert_eq!(err.to_string(), "serialization error: bad yaml");
    }
}
