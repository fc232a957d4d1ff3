//! Fields a webinar needs before registrants can be synced to the video
//! provider.

use crate::models::form::{FieldSchema, FieldType, FormSchema};

/// Append required `email`, `first_name` and `last_name` fields when the
/// schema lacks them (Spanish `nombre`/`apellido` count as present).
///
/// Never removes or reorders existing fields, so applying it repeatedly
/// yields the same schema. Returns the number of fields appended.
pub fn augment_for_registrant_sync(schema: &mut FormSchema) -> usize {
    let lacks = |schema: &FormSchema, names: &[&str]| !names.iter().any(|n| schema.has_field(n));

    let mut additions = Vec::new();
    if lacks(schema, &["email"]) {
        additions.push(FieldSchema::new(FieldType::Email, "email", "Email", true));
    }
    if lacks(schema, &["first_name", "nombre"]) {
        additions.push(FieldSchema::new(FieldType::Text, "first_name", "Nombre", true));
    }
    if lacks(schema, &["last_name", "apellido"]) {
        additions.push(FieldSchema::new(FieldType::Text, "last_name", "Apellido", true));
    }

    let added = additions.len();
    for field in additions {
        schema.push(field);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_empty_schema() {
        let mut schema = FormSchema::default();
        assert_eq!(augment_for_registrant_sync(&mut schema), 3);
        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["email", "first_name", "last_name"]);
        assert!(schema.iter().all(|f| f.required));
    }

    #[test]
    fn spanish_aliases_count_as_present() {
        let mut schema = FormSchema::new(vec![
            FieldSchema::new(FieldType::Text, "nombre", "Nombre", true),
            FieldSchema::new(FieldType::Text, "apellido", "Apellido", false),
        ]);
        assert_eq!(augment_for_registrant_sync(&mut schema), 1);
        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["nombre", "apellido", "email"]);
    }

    #[test]
    fn is_idempotent() {
        let mut once = FormSchema::new(vec![FieldSchema::new(FieldType::Tel, "phone", "Tel", false)]);
        augment_for_registrant_sync(&mut once);
        let mut twice = once.clone();
        assert_eq!(augment_for_registrant_sync(&mut twice), 0);
        assert_eq!(once, twice);
    }
}
