//! Rule derivation and submission validation.
//!
//! [`build_rules`] turns a schema into a [`RuleSet`]; [`RuleSet::validate`]
//! applies it to raw form input and returns the normalized answers plus
//! the UTM attribution, or every per-field failure at once.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::field::parse_flag;
use super::normalize::{is_phone_like, normalize_phone};
use crate::error::ValidationErrors;
use crate::models::form::{FieldType, FormSchema};
use crate::models::submission::Utm;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)*$").expect("email pattern is valid")
});

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Must be present and non-empty.
    Required,
    /// May be absent; absent values are left out of the stored data.
    Nullable,
    Email,
    /// Minimum length in characters of the raw value.
    MinLength(usize),
    Numeric,
    OneOf(Vec<String>),
    Boolean,
}

impl Rule {
    /// Check a present, trimmed value. Presence rules always pass here.
    fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Rule::Required | Rule::Nullable => Ok(()),
            Rule::Email if EMAIL_RE.is_match(value) => Ok(()),
            Rule::Email => Err("must be a valid email address".into()),
            Rule::MinLength(min) if value.chars().count() >= *min => Ok(()),
            Rule::MinLength(min) => Err(format!("must be at least {min} characters")),
            Rule::Numeric => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err("must be a number".into()),
            },
            Rule::OneOf(options) if options.iter().any(|o| o == value) => Ok(()),
            Rule::OneOf(_) => Err("is not one of the allowed options".into()),
            Rule::Boolean if parse_flag(value).is_some() => Ok(()),
            Rule::Boolean => Err("must be checked or unchecked".into()),
        }
    }
}

/// Rules for one declared field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub name: String,
    pub field_type: FieldType,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

/// Validation rules derived from a form schema, in schema order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

/// Normalized answers ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    /// Declared fields only, keyed by field name.
    pub data: Map<String, Value>,
    pub utm: Utm,
}

/// Derive one presence rule per field plus the rules its type contributes.
pub fn build_rules(schema: &FormSchema) -> RuleSet {
    let fields = schema
        .iter()
        .map(|field| {
            let presence = if field.required {
                Rule::Required
            } else {
                Rule::Nullable
            };
            let mut rules = vec![presence];
            rules.extend(field.field_type.type_rules(field));
            FieldRules {
                name: field.name.clone(),
                field_type: field.field_type,
                rules,
            }
        })
        .collect();
    RuleSet { fields }
}

impl RuleSet {
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate raw form input.
    ///
    /// Keys that are neither declared fields nor UTM keys are dropped.
    /// Empty strings count as absent. On success, phone-like names are
    /// normalized and typed values coerced.
    pub fn validate(
        &self,
        input: &BTreeMap<String, String>,
    ) -> Result<ValidatedSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut data = Map::new();

        for field in &self.fields {
            let value = input
                .get(&field.name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty());

            let Some(value) = value else {
                if field.is_required() {
                    errors.add(&field.name, "is required");
                }
                continue;
            };

            let failures: Vec<String> = field
                .rules
                .iter()
                .filter_map(|rule| rule.check(value).err())
                .collect();
            if !failures.is_empty() {
                for message in failures {
                    errors.add(&field.name, message);
                }
                continue;
            }

            let stored = if is_phone_like(&field.name) && field.field_type != FieldType::Checkbox {
                Value::String(normalize_phone(value))
            } else {
                field.field_type.coerce(value)
            };
            data.insert(field.name.clone(), stored);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedSubmission {
            data,
            utm: Utm::from_input(input),
        })
    }
}
