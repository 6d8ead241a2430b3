//! String length attribute.
//!
//! Length is measured in Unicode scalar values. A null value passes: pair
//! with [`Required`](super::Required) when presence matters.

use crate::foundation::stringify;

crate::attribute! {
    /// The string form of the value must have between `min` and `max`
    /// characters (inclusive).
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub StringLength { min: usize, max: usize };
    valid(self, value) {
        stringify(value).is_none_or(|s| {
            let len = s.chars().count();
            len >= self.min && len <= self.max
        })
    }
    message(self, name) {
        format!(
            "The field {name} must be a string with a minimum length of {} and a maximum length of {}.",
            self.min, self.max
        )
    }
    new(min: usize, max: usize) { Self { min, max } }
    fn string_length(min: usize, max: usize);
}

/// Creates a [`StringLength`] attribute with no lower bound.
#[must_use]
pub fn max_length(max: usize) -> StringLength {
    StringLength::new(0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ValidationAttribute;
    use serde_json::json;

    #[test]
    fn test_bounds() {
        let attr = string_length(3, 7);
        assert!(!attr.is_valid(&json!("ab")));
        assert!(attr.is_valid(&json!("abc")));
        assert!(attr.is_valid(&json!("abcdefg")));
        assert!(!attr.is_valid(&json!("abcdefgh")));
    }

    #[test]
    fn test_null_passes() {
        assert!(string_length(3, 7).is_valid(&json!(null)));
    }

    #[test]
    fn test_max_length() {
        let attr = max_length(2);
        assert_eq!(attr.min, 0);
        assert!(attr.is_valid(&json!("")));
        assert!(!attr.is_valid(&json!("abc")));
    }

    #[test]
    fn test_message() {
        assert_eq!(
            string_length(3, 7).format_error_message("Name"),
            "The field Name must be a string with a minimum length of 3 and a maximum length of 7."
        );
    }
}
