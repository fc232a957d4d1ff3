//! Per-type behaviour of form fields.
//!
//! Each [`FieldType`] variant knows which extra rules it contributes, how
//! a validated raw string becomes a stored JSON value, and how a renderer
//! should draw it.

use serde::Serialize;
use serde_json::Value;

use super::rules::Rule;
use crate::models::form::{FieldSchema, FieldType};

/// Minimum accepted length of a `tel` value before normalization.
pub const MIN_PHONE_LENGTH: usize = 8;

/// Widget family a renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Input,
    Select,
    Checkbox,
    Textarea,
}

/// Rendering instructions derived from a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderHint {
    pub widget: Widget,
    /// HTML `input` type, for [`Widget::Input`] fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<&'static str>,
    /// Autocomplete token for browsers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<&'static str>,
}

impl FieldType {
    /// Rules contributed by the type itself, on top of presence.
    pub fn type_rules(&self, field: &FieldSchema) -> Vec<Rule> {
        match self {
            FieldType::Email => vec![Rule::Email],
            FieldType::Tel => vec![Rule::MinLength(MIN_PHONE_LENGTH)],
            FieldType::Number => vec![Rule::Numeric],
            FieldType::Select => vec![Rule::OneOf(field.options.clone().unwrap_or_default())],
            FieldType::Checkbox => vec![Rule::Boolean],
            FieldType::Text | FieldType::Textarea => Vec::new(),
        }
    }

    /// Turn an already validated, trimmed raw value into its stored form.
    pub fn coerce(&self, raw: &str) -> Value {
        match self {
            FieldType::Number => raw
                .parse::<i64>()
                .map(Value::from)
                .ok()
                .or_else(|| {
                    raw.parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                })
                .unwrap_or_else(|| Value::String(raw.to_string())),
            FieldType::Checkbox => parse_flag(raw)
                .map(Value::Bool)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            _ => Value::String(raw.to_string()),
        }
    }

    pub fn render_hint(&self) -> RenderHint {
        let input = |input_type, autocomplete| RenderHint {
            widget: Widget::Input,
            input_type: Some(input_type),
            autocomplete,
        };
        match self {
            FieldType::Text => input("text", None),
            FieldType::Email => input("email", Some("email")),
            FieldType::Tel => input("tel", Some("tel")),
            FieldType::Number => input("number", None),
            FieldType::Select => RenderHint {
                widget: Widget::Select,
                input_type: None,
                autocomplete: None,
            },
            FieldType::Checkbox => RenderHint {
                widget: Widget::Checkbox,
                input_type: Some("checkbox"),
                autocomplete: None,
            },
            FieldType::Textarea => RenderHint {
                widget: Widget::Textarea,
                input_type: None,
                autocomplete: None,
            },
        }
    }
}

/// Checkbox values as sent by browsers and API clients.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_coerces_to_json_number() {
        assert_eq!(FieldType::Number.coerce("42"), Value::from(42));
        assert_eq!(FieldType::Number.coerce("2.5"), Value::from(2.5));
    }

    #[test]
    fn checkbox_coerces_to_bool() {
        assert_eq!(FieldType::Checkbox.coerce("on"), Value::Bool(true));
        assert_eq!(FieldType::Checkbox.coerce("0"), Value::Bool(false));
    }

    #[test]
    fn text_like_types_stay_strings() {
        for ty in [FieldType::Text, FieldType::Email, FieldType::Tel, FieldType::Textarea] {
            assert_eq!(ty.coerce("7"), Value::String("7".into()));
        }
    }

    #[test]
    fn render_hints_match_html_inputs() {
        assert_eq!(FieldType::Tel.render_hint().input_type, Some("tel"));
        assert_eq!(FieldType::Select.render_hint().widget, Widget::Select);
        assert_eq!(FieldType::Textarea.render_hint().input_type, None);
    }

    #[test]
    fn select_rule_carries_options() {
        let field = FieldSchema::new(FieldType::Select, "size", "Size", true).with_options(&["S", "M"]);
        assert_eq!(
            FieldType::Select.type_rules(&field),
            vec![Rule::OneOf(vec!["S".into(), "M".into()])]
        );
    }
}
