//! Validation attributes.
//!
//! An attribute is a declarative check attached to a property in its type's
//! descriptor. The engine only discovers, caches and invokes attributes
//! through the uniform [`ValidationAttribute`] capability; the definitions
//! themselves are pluggable. This module ships a small standard set:
//!
//! - [`Required`] - not null, not a blank string
//! - [`StringLength`] - character count within bounds
//! - [`Range`] - value within inclusive bounds
//! - [`RegularExpression`] - full-string pattern match
//! - [`Predicate`] - arbitrary closure
//!
//! New attributes are easiest to write with the [`attribute!`](crate::attribute)
//! macro.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::attributes::{self, AttributeExt};
//!
//! let attr = attributes::range(18, 200).with_message("{name} must be an adult age.");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub mod length;
pub mod pattern;
pub mod range;
pub mod required;

pub use length::{StringLength, max_length, string_length};
pub use pattern::{RegularExpression, regular_expression};
pub use range::{Range, range};
pub use required::{Required, required};

// ============================================================================
// CAPABILITY
// ============================================================================

/// The uniform "is valid / format message" capability of an attribute.
pub trait ValidationAttribute: Send + Sync {
    /// Returns true when `value` satisfies the attribute.
    fn is_valid(&self, value: &Value) -> bool;

    /// Formats the failure message for `property`.
    fn format_error_message(&self, property: &str) -> String;
}

/// Shared handle to an attribute, as stored in type descriptors.
pub type SharedAttribute = Arc<dyn ValidationAttribute>;

impl<A: ValidationAttribute + ?Sized> ValidationAttribute for Arc<A> {
    fn is_valid(&self, value: &Value) -> bool {
        (**self).is_valid(value)
    }

    fn format_error_message(&self, property: &str) -> String {
        (**self).format_error_message(property)
    }
}

// ============================================================================
// WITH MESSAGE
// ============================================================================

/// Replaces the failure message of an attribute.
///
/// The `{name}` placeholder receives the property name.
#[derive(Debug, Clone)]
pub struct WithMessage<A> {
    inner: A,
    template: String,
}

impl<A> WithMessage<A> {
    /// Wraps `inner` with a custom message template.
    pub fn new(inner: A, template: impl Into<String>) -> Self {
        Self {
            inner,
            template: template.into(),
        }
    }

    /// Returns a reference to the inner attribute.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Returns the message template.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl<A: ValidationAttribute> ValidationAttribute for WithMessage<A> {
    fn is_valid(&self, value: &Value) -> bool {
        self.inner.is_valid(value)
    }

    fn format_error_message(&self, property: &str) -> String {
        self.template.replace("{name}", property)
    }
}

/// Extension methods available on every attribute.
pub trait AttributeExt: ValidationAttribute + Sized {
    /// Replaces this attribute's failure message.
    fn with_message(self, template: impl Into<String>) -> WithMessage<Self> {
        WithMessage::new(self, template)
    }
}

impl<A: ValidationAttribute> AttributeExt for A {}

// ============================================================================
// PREDICATE
// ============================================================================

/// An attribute backed by a closure.
#[derive(Clone)]
pub struct Predicate {
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    template: String,
}

impl Predicate {
    /// Creates a closure attribute; `{name}` in `template` receives the
    /// property name.
    pub fn new<F>(check: F, template: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            template: template.into(),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl ValidationAttribute for Predicate {
    fn is_valid(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    fn format_error_message(&self, property: &str) -> String {
        self.template.replace("{name}", property)
    }
}

/// Creates a [`Predicate`] attribute.
pub fn predicate<F>(check: F, template: impl Into<String>) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Predicate::new(check, template)
}

// ============================================================================
// TESTS
// ============================================================================
