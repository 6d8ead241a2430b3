//! Inclusive range attribute.

use serde_json::Value;

use crate::foundation::{stringify, within};

crate::attribute! {
    /// The value must lie within `[min, max]`.
    ///
    /// A null value passes. A value with no ordering against the bounds
    /// fails; attributes report, they never raise usage errors.
    pub Range { min: Value, max: Value };
    valid(self, value) {
        value.is_null() || within(value, &self.min, &self.max).unwrap_or(false)
    }
    message(self, name) {
        format!(
            "The field {name} must be between {} and {}.",
            stringify(&self.min).unwrap_or_default(),
            stringify(&self.max).unwrap_or_default()
        )
    }
    new(min: impl Into<Value>, max: impl Into<Value>) {
        Self { min: min.into(), max: max.into() }
    }
    fn range(min: impl Into<Value>, max: impl Into<Value>);
}
