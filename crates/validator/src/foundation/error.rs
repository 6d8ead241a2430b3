//! The per-property error value.
//!
//! A [`ValidationError`] pairs a property name with a human-readable message.
//! The message is always stored trimmed, and an empty message means
//! "no error": the value may exist transiently (for example as the result of
//! a rule chain that passed) but it never reports [`has_error`].
//!
//! [`has_error`]: ValidationError::has_error

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A validation message attached to one property.
///
/// Whole-object rules report under the empty property name `""`.
///
/// # Examples
///
/// ```rust,ignore
/// use vigil_validator::ValidationError;
///
/// let error = ValidationError::new("Age", "  Must be between 18 and 200.\n");
/// assert!(error.has_error());
/// assert_eq!(error.message(), "Must be between 18 and 200.");
/// assert_eq!(error.to_string(), "Age: Must be between 18 and 200.");
///
/// let none = ValidationError::new("Age", "   ");
/// assert!(!none.has_error());
/// assert_eq!(none.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    property_name: String,
    message: String,
}

impl ValidationError {
    /// Creates a new error value, trimming the message.
    pub fn new(property_name: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.as_ref().trim().to_owned(),
        }
    }

    /// Creates a value for `property_name` that carries no error.
    pub fn none(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: String::new(),
        }
    }

    /// The property this message belongs to.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// The trimmed message; empty when there is no error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the value and returns its message.
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }

    /// Returns true when the message is non-empty.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.message.is_empty()
    }

    /// Replaces the message in place, trimming it.
    ///
    /// Used when merging validation sources and coalescing whole-object
    /// errors; not part of the public value contract.
    pub(crate) fn set_message(&mut self, message: impl AsRef<str>) {
        self.message = message.as_ref().trim().to_owned();
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_error() {
            write!(f, "{}: {}", self.property_name, self.message)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
