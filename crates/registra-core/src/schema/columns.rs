//! Dynamic columns for the admin submissions table and CSV export.
//!
//! Both views derive their data columns from form schemas; the fixed
//! columns around them (webinar title, UTM keys, creation time) are the
//! same everywhere.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::models::form::FormSchema;
use crate::models::submission::{Submission, UTM_KEYS};

/// Where a column's cell value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "key", rename_all = "snake_case")]
pub enum ColumnSource {
    WebinarTitle,
    /// A submission data key.
    Data(String),
    Utm(&'static str),
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    #[serde(flatten)]
    pub source: ColumnSource,
    pub heading: String,
}

impl Column {
    fn new(source: ColumnSource, heading: impl Into<String>) -> Self {
        Self {
            source,
            heading: heading.into(),
        }
    }

    /// Render this column's cell for one submission.
    pub fn cell(&self, webinar_title: &str, submission: &Submission) -> String {
        match &self.source {
            ColumnSource::WebinarTitle => webinar_title.to_string(),
            ColumnSource::Data(key) => submission.data.get(key).map(render).unwrap_or_default(),
            ColumnSource::Utm(key) => submission
                .utm
                .pairs()
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| *v)
                .unwrap_or_default()
                .to_string(),
            ColumnSource::CreatedAt => submission.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `first_name` → `First Name`.
pub fn headline(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Data columns for the union of the given schemas.
///
/// The first schema that declares a name decides its heading; blank labels
/// fall back to a headline of the name.
pub fn table_columns<'a>(schemas: impl IntoIterator<Item = &'a FormSchema>) -> Vec<Column> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for schema in schemas {
        for field in schema {
            if !seen.insert(field.name.clone()) {
                continue;
            }
            let heading = if field.label.trim().is_empty() {
                headline(&field.name)
            } else {
                field.label.clone()
            };
            columns.push(Column::new(ColumnSource::Data(field.name.clone()), heading));
        }
    }
    columns
}

fn utm_heading(key: &str) -> String {
    headline(key).replacen("Utm", "UTM", 1)
}

/// Full export layout for one webinar's submissions.
pub fn export_columns(schema: &FormSchema) -> Vec<Column> {
    let mut columns = vec![Column::new(ColumnSource::WebinarTitle, "Webinar")];
    columns.extend(table_columns([schema]));
    columns.extend(
        UTM_KEYS
            .iter()
            .map(|key| Column::new(ColumnSource::Utm(key), utm_heading(key))),
    );
    columns.push(Column::new(ColumnSource::CreatedAt, "Created At"));
    columns
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::models::form::{FieldSchema, FieldType};
    use crate::models::submission::Utm;

    #[test]
    fn headline_title_cases_words() {
        assert_eq!(headline("first_name"), "First Name");
        assert_eq!(headline("e-mail"), "E Mail");
    }

    #[test]
    fn table_columns_union_first_label_wins() {
        let a = FormSchema::new(vec![
            FieldSchema::new(FieldType::Email, "email", "Email", true),
            FieldSchema::new(FieldType::Text, "company", " ", false),
        ]);
        let b = FormSchema::new(vec![
            FieldSchema::new(FieldType::Email, "email", "Correo", true),
            FieldSchema::new(FieldType::Text, "city", "Ciudad", false),
        ]);
        let columns = table_columns([&a, &b]);
        let headings: Vec<_> = columns.iter().map(|c| c.heading.as_str()).collect();
        assert_eq!(headings, ["Email", "Company", "Ciudad"]);
    }

    #[test]
    fn export_layout_and_cells() {
        let schema = FormSchema::new(vec![
            FieldSchema::new(FieldType::Email, "email", "Email", true),
            FieldSchema::new(FieldType::Checkbox, "consent", "Consent", false),
        ]);
        let columns = export_columns(&schema);
        let headings: Vec<_> = columns.iter().map(|c| c.heading.as_str()).collect();
        assert_eq!(
            headings,
            [
                "Webinar",
                "Email",
                "Consent",
                "UTM Source",
                "UTM Medium",
                "UTM Campaign",
                "UTM Term",
                "UTM Content",
                "Created At"
            ]
        );

        let submission = Submission {
            id: Uuid::new_v4(),
            webinar_id: Uuid::new_v4(),
            data: json!({ "email": "a@b.com", "consent": true })
                .as_object()
                .cloned()
                .unwrap(),
            utm: Utm {
                utm_campaign: Some("launch".into()),
                ..Default::default()
            },
            sent_to_clay_at: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 9, 19, 17, 22).unwrap(),
        };
        let row: Vec<_> = columns.iter().map(|c| c.cell("Launch", &submission)).collect();
        assert_eq!(
            row,
            ["Launch", "a@b.com", "true", "", "", "launch", "", "", "2026-01-09 19:17:22"]
        );
    }
}
