//! Regular expression attribute.

use regex::Regex;

use crate::foundation::stringify;

crate::attribute! {
    /// The string form of the value must match `pattern` in full.
    ///
    /// Null and empty strings pass.
    pub RegularExpression { pattern: Regex };
    valid(self, value) {
        match stringify(value) {
            None => true,
            Some(s) if s.is_empty() => true,
            Some(s) => self
                .pattern
                .find(&s)
                .is_some_and(|m| m.start() == 0 && m.end() == s.len()),
        }
    }
    message(self, name) {
        format!(
            "The field {name} must match the regular expression '{}'.",
            self.pattern.as_str()
        )
    }
    new(pattern: &str) -> regex::Error {
        Ok(Self { pattern: Regex::new(pattern)? })
    }
    fn regular_expression(pattern: &str) -> regex::Error;
}
