//! Error types for catalog reads.

use thiserror::Error;

use crate::state::VersionState;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while resolving catalog resources.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dataset does not exist, or not at the requested visibility.
    #[error("dataset not found")]
    DatasetNotFound,

    /// The edition does not exist, or not at the requested visibility.
    #[error("edition not found")]
    EditionNotFound,

    /// The version does not exist, or not at the requested visibility.
    #[error("version not found")]
    VersionNotFound,

    /// The dimension is not part of the version.
    #[error("dimension not found")]
    DimensionNotFound,

    /// A stored version carries a state outside the lifecycle, or not the
    /// state the caller's visibility requires.
    #[error("incorrect resource state: {state}")]
    InvalidState {
        /// The stored state value.
        state: String,
        /// The state the visibility required, if any.
        expected: Option<VersionState>,
    },

    /// A path identifier could not be parsed.
    #[error("malformed identifier: {message}")]
    MalformedIdentifier {
        /// Description of the parse failure.
        message: String,
    },

    /// A query parameter is out of range.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The document store failed or returned an undecodable document.
    #[error(transparent)]
    Collaborator(#[from] ftb_core::Error),
}

/// How a [`CatalogError`] should be reported to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The resource does not exist.
    NotFound,
    /// The request itself is invalid.
    BadRequest,
    /// Stored data or infrastructure is at fault.
    Internal,
}

impl CatalogError {
    /// Returns the reporting class of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::DatasetNotFound
            | Self::EditionNotFound
            | Self::VersionNotFound
            | Self::DimensionNotFound => ErrorClass::NotFound,
            Self::MalformedIdentifier { .. } | Self::InvalidParameter { .. } => {
                ErrorClass::BadRequest
            }
            Self::InvalidState { .. } | Self::Collaborator(_) => ErrorClass::Internal,
        }
    }

    /// Creates a malformed identifier error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Collaborator(ftb_core::Error::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family_is_distinct_per_level() {
        let errors = [
            CatalogError::DatasetNotFound,
            CatalogError::EditionNotFound,
            CatalogError::VersionNotFound,
            CatalogError::DimensionNotFound,
        ];
        for err in &errors {
            assert_eq!(err.class(), ErrorClass::NotFound);
        }
        let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "dataset not found",
                "edition not found",
                "version not found",
                "dimension not found"
            ]
        );
    }

    #[test]
    fn test_invalid_state_is_internal() {
        let err = CatalogError::InvalidState {
            state: "gibberish".into(),
            expected: None,
        };
        assert_eq!(err.class(), ErrorClass::Internal);
    }

    #[test]
    fn test_collaborator_failure_is_internal() {
        let err = CatalogError::from(ftb_core::Error::storage("connection refused"));
        assert_eq!(err.class(), ErrorClass::Internal);
    }

    #[test]
    fn test_malformed_identifier_is_bad_request() {
        assert_eq!(
            CatalogError::malformed("version must be a positive integer").class(),
            ErrorClass::BadRequest
        );
    }
}
