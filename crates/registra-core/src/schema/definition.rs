//! Save-time integrity checks for a form schema.

use std::collections::HashSet;

use crate::error::{RegistraError, RegistraResult};
use crate::models::form::{FieldType, FormSchema};
use crate::models::submission::UTM_KEYS;

/// Whether `name` is usable as a submission data key.
fn is_safe_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl FormSchema {
    /// Reject schemas that would make stored answers ambiguous.
    ///
    /// Checks that every name is a safe key, unique, and not one of the
    /// reserved UTM keys; that labels are present; and that options are
    /// given exactly for `select` fields.
    pub fn validate_definition(&self) -> RegistraResult<()> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for (index, field) in self.iter().enumerate() {
            let at = format!("field #{}", index + 1);
            if !is_safe_name(&field.name) {
                problems.push(format!("{at}: name '{}' is not a valid key", field.name));
            } else if UTM_KEYS.contains(&field.name.as_str()) {
                problems.push(format!("{at}: name '{}' is reserved", field.name));
            } else if !seen.insert(field.name.as_str()) {
                problems.push(format!("{at}: duplicate name '{}'", field.name));
            }
            if field.label.trim().is_empty() {
                problems.push(format!("{at}: label is required"));
            }
            let has_options = field.options.as_ref().is_some_and(|o| !o.is_empty());
            match (field.field_type, has_options) {
                (FieldType::Select, false) => {
                    problems.push(format!("{at}: select fields need at least one option"));
                }
                (FieldType::Select, true) | (_, false) => {}
                (_, true) => {
                    problems.push(format!("{at}: only select fields take options"));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RegistraError::InvalidSchema {
                message: problems.join("; "),
            })
        }
    }
}
