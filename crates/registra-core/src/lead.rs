//! Canonical lead extraction.
//!
//! Registration forms name their fields freely (`email`, `correo`,
//! `nombre`, ...). Integrations need a fixed set of contact attributes, so
//! every integration goes through [`extract_canonical`] and therefore sees
//! the same values for the same submission.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A canonical contact attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Email,
    FirstName,
    LastName,
    Phone,
    Company,
    JobTitle,
    Country,
    State,
    City,
}

/// Alias priority per canonical field. The first alias present with a
/// non-empty value wins; order within a row is part of the contract.
pub const ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Email, &["email", "correo", "e-mail", "mail"]),
    (
        CanonicalField::FirstName,
        &["first_name", "nombre", "firstname", "name"],
    ),
    (
        CanonicalField::LastName,
        &["last_name", "apellido", "lastname", "surname"],
    ),
    (
        CanonicalField::Phone,
        &["phone", "telefono", "tel", "mobile", "celular"],
    ),
    (
        CanonicalField::Company,
        &["company", "empresa", "organization", "organizacion"],
    ),
    (
        CanonicalField::JobTitle,
        &["job_title", "cargo", "position", "puesto"],
    ),
    (CanonicalField::Country, &["country", "pais"]),
    (CanonicalField::State, &["state", "estado", "region"]),
    (CanonicalField::City, &["city", "ciudad"]),
];

impl CanonicalField {
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Email => "email",
            CanonicalField::FirstName => "first_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::Phone => "phone",
            CanonicalField::Company => "company",
            CanonicalField::JobTitle => "job_title",
            CanonicalField::Country => "country",
            CanonicalField::State => "state",
            CanonicalField::City => "city",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        ALIASES
            .iter()
            .find(|(field, _)| field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

/// Contact attributes extracted from a submission. Unmatched fields are
/// `None` and skipped when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalLead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl CanonicalLead {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: CanonicalField) -> &Option<String> {
        match field {
            CanonicalField::Email => &self.email,
            CanonicalField::FirstName => &self.first_name,
            CanonicalField::LastName => &self.last_name,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Company => &self.company,
            CanonicalField::JobTitle => &self.job_title,
            CanonicalField::Country => &self.country,
            CanonicalField::State => &self.state,
            CanonicalField::City => &self.city,
        }
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<String> {
        match field {
            CanonicalField::Email => &mut self.email,
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::Company => &mut self.company,
            CanonicalField::JobTitle => &mut self.job_title,
            CanonicalField::Country => &mut self.country,
            CanonicalField::State => &mut self.state,
            CanonicalField::City => &mut self.city,
        }
    }
}

/// Text of a submitted value, if it counts as non-empty.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Map arbitrarily named submission data onto canonical fields.
pub fn extract_canonical(data: &Map<String, Value>) -> CanonicalLead {
    let mut lead = CanonicalLead::default();
    for (field, aliases) in ALIASES {
        *lead.slot_mut(*field) = aliases
            .iter()
            .find_map(|alias| data.get(*alias).and_then(text_of));
    }
    lead
}
