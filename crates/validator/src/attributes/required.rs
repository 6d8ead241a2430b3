//! Presence attribute.

use serde_json::Value;

crate::attribute! {
    /// The value must be present: not null and, for strings, not blank.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use vigil_validator::attributes::{required, ValidationAttribute};
    /// use serde_json::json;
    ///
    /// assert!(required().is_valid(&json!("alice")));
    /// assert!(!required().is_valid(&json!("  ")));
    /// assert!(!required().is_valid(&json!(null)));
    /// ```
    pub Required;
    valid(value) {
        match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        }
    }
    message(name) { format!("The {name} field is required.") }
    fn required();
}
