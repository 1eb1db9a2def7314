//! Error types for addressing, grouping and projection.

use std::fmt;

/// Errors and warnings produced by the addressing core.
///
/// `MalformedPathSegment` is a hard failure returned by the codecs.
/// `AmbiguousEntityKey` and `IntegrityWarning` are warning-level values:
/// they describe one record and never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A percent-encoded segment could not be decoded.
    MalformedPathSegment { segment: String, reason: String },
    /// A name contains the key separator and cannot be told apart from a
    /// model-prefixed key when parsed back.
    AmbiguousEntityKey { name: String, separator: String },
    /// A record could not be placed in its derived structure.
    IntegrityWarning { id: String, reason: String },
}

impl AddressError {
    pub(crate) fn malformed(segment: &str, reason: impl Into<String>) -> Self {
        AddressError::MalformedPathSegment {
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn integrity(id: &str, reason: impl Into<String>) -> Self {
        AddressError::IntegrityWarning {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error is advisory rather than a hard failure.
    pub fn is_warning(&self) -> bool {
        !matches!(self, AddressError::MalformedPathSegment { .. })
    }
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::MalformedPathSegment { segment, reason } => {
                write!(f, "Malformed path segment '{segment}': {reason}")
            }
            AddressError::AmbiguousEntityKey { name, separator } => {
                write!(
                    f,
                    "Entity name '{name}' contains the key separator '{separator}'"
                )
            }
            AddressError::IntegrityWarning { id, reason } => {
                write!(f, "Integrity warning for '{id}': {reason}")
            }
        }
    }
}

impl std::error::Error for AddressError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_classification() {
        assert!(!AddressError::malformed("%zz", "bad escape").is_warning());
        assert!(AddressError::integrity("a//b", "empty segment").is_warning());
        assert!(AddressError::AmbiguousEntityKey {
            name: "a__b".into(),
            separator: "__".into(),
        }
        .is_warning());
    }

    #[test]
    fn display_names_the_record() {
        let err = AddressError::integrity("files/x", "empty group id");
        assert_eq!(
            err.to_string(),
            "Integrity warning for 'files/x': empty group id"
        );
    }
}
