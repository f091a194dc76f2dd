//! Validation error types

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field missing or blank
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (email, id, date)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// List carries more entries than allowed
    TooMany { field: &'static str, max: usize },

    /// Unknown value for an enumerated parameter
    InvalidVariant { field: &'static str, value: String },

    /// Date must lie after the current instant
    NotInFuture { field: &'static str },

    /// Update request carried no fields
    NoChanges,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooMany { field, max } => {
                write!(f, "{} accepts at most {} entries", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::NotInFuture { field } => write!(f, "{} must be in the future", field),
            Self::NoChanges => write!(f, "no fields to update"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `value` and require it to be non-empty and at most `max` chars.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`] but a missing or blank value is allowed.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

/// Keep `null` apart from an absent field in update bodies.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: absent is
/// `None`, `null` is `Some(None)`, a value is `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validate an optional field present in an update: blank or `null`
/// clears it (`Some(None)`).
pub(crate) fn clearable_text(
    field: &'static str,
    value: &Option<Option<String>>,
    max: usize,
) -> Result<Option<Option<String>>, ValidationError> {
    value
        .as_ref()
        .map(|v| optional_text(field, v.as_deref(), max))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 200,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 200 characters"
        );
        assert_eq!(
            ValidationError::NotInFuture { field: "eventDate" }.to_string(),
            "eventDate must be in the future"
        );
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Ada  ", 10).unwrap(), "Ada");
        assert_eq!(
            required_text("name", "   ", 10).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
        assert!(matches!(
            required_text("name", "abcdefghijk", 10),
            Err(ValidationError::TooLong { max: 10, .. })
        ));
    }

    #[test]
    fn clearable_text_distinguishes_absent_and_blank() {
        assert_eq!(clearable_text("year", &None, 10).unwrap(), None);
        assert_eq!(clearable_text("year", &Some(None), 10).unwrap(), Some(None));
        assert_eq!(
            clearable_text("year", &Some(Some(" ".into())), 10).unwrap(),
            Some(None)
        );
        assert_eq!(
            clearable_text("year", &Some(Some(" 3rd ".into())), 10).unwrap(),
            Some(Some("3rd".to_owned()))
        );
        assert!(clearable_text("year", &Some(Some("x".repeat(11))), 10).is_err());
    }

    #[test]
    fn optional_text_allows_blank() {
        assert_eq!(optional_text("location", None, 10).unwrap(), None);
        assert_eq!(optional_text("location", Some("  "), 10).unwrap(), None);
        assert_eq!(
            optional_text("location", Some(" Hall A "), 10).unwrap(),
            Some("Hall A".to_owned())
        );
    }
}
