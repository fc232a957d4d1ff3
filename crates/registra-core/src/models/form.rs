//! Form schema model.
//!
//! A webinar's registration form is stored as data: an ordered list of
//! [`FieldSchema`] entries. The wire and storage shape is a JSON array:
//!
//! ```json
//! [{ "type": "email", "name": "email", "label": "Email", "required": true },
//!  { "type": "select", "name": "role", "label": "Role", "required": false,
//!    "options": ["Founder", "Engineer"] }]
//! ```

use serde::{Deserialize, Serialize};

/// The input kind of a form field. Serialized as its lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Select,
    Checkbox,
    Textarea,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Textarea => "textarea",
        }
    }
}

/// One field of a registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Key under which the answer is stored in submission data.
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Allowed values, only for `select` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSchema {
    pub fn new(field_type: FieldType, name: &str, label: &str, required: bool) -> Self {
        Self {
            field_type,
            name: name.to_string(),
            label: label.to_string(),
            placeholder: None,
            required,
            options: None,
        }
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(|o| o.to_string()).collect());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

/// Ordered list of form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema(Vec<FieldSchema>);

impl FormSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }

    pub fn push(&mut self, field: FieldSchema) {
        self.0.push(field);
    }

    pub fn into_inner(self) -> Vec<FieldSchema> {
        self.0
    }
}

impl From<Vec<FieldSchema>> for FormSchema {
    fn from(fields: Vec<FieldSchema>) -> Self {
        Self(fields)
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
