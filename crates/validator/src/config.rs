//! Engine configuration.
//!
//! Every rule kind falls back to a default message template when the caller
//! does not supply one through `with_message`. The templates and the
//! separator used to join several messages live here so hosts can load them
//! from their own configuration files.

use serde::{Deserialize, Serialize};

/// Default message templates, one per rule kind.
///
/// `string_length` and `range` accept the `$min$` and `$max$` placeholders.
/// `custom` and `range` default to messages naming the failure; hosts that
/// want the uniform `"Can not be empty."` text for them can set it here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultMessages {
    /// Message for `required`.
    pub required: String,
    /// Message for `custom_rule`.
    pub custom: String,
    /// Template for `string_length`.
    pub string_length: String,
    /// Message for `string_required`.
    pub string_required: String,
    /// Message for `string_regex`.
    pub string_regex: String,
    /// Template for `range`.
    pub range: String,
}

impl Default for DefaultMessages {
    fn default() -> Self {
        Self {
            required: "Can not be empty.".to_owned(),
            custom: "Is not valid.".to_owned(),
            string_length:
                "Can not be less than $min$ characters nor more than $max$ characters.".to_owned(),
            string_required: "Can not be empty string.".to_owned(),
            string_regex: "Not matching the pattern.".to_owned(),
            range: "Must be between $min$ and $max$.".to_owned(),
        }
    }
}

/// Configuration of a [`Validator`](crate::Validator).
///
/// # Examples
///
/// ```rust,ignore
/// use vigil_validator::{Validator, ValidatorConfig};
///
/// let config: ValidatorConfig = serde_json::from_str(r#"{ "separator": "; " }"#)?;
/// let validator = Validator::with_config(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Joins the messages of several failing rules, attributes or sources
    /// (default: `"\n"`).
    pub separator: String,
    /// Fallback message templates.
    pub messages: DefaultMessages,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_owned(),
            messages: DefaultMessages::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{ "messages": { "required": "Required." } }"#).unwrap();
        assert_eq!(config.separator, "\n");
        assert_eq!(config.messages.required, "Required.");
        assert_eq!(config.messages.range, DefaultMessages::default().range);
    }

    #[test]
    fn custom_and_range_messages_are_configurable() {
        use crate::rules::ValidationRules;
        use serde_json::json;

        let config: ValidatorConfig = serde_json::from_str(
            r#"{ "messages": { "custom": "Can not be empty.", "range": "Can not be empty." } }"#,
        )
        .unwrap();
        let mut rules = ValidationRules::with_config(&config);
        rules.custom_rule(|_| false).range(1, 2);
        assert_eq!(
            rules.validate(&json!(5)).unwrap(),
            "Can not be empty.\nCan not be empty."
        );
        assert_eq!(DefaultMessages::default().custom, "Is not valid.");
    }
}
