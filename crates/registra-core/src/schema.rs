//! The form schema engine.
//!
//! Everything that interprets a [`FormSchema`](crate::models::form::FormSchema)
//! lives here so that validation, table columns and export columns agree
//! on what each field type means:
//!
//! - [`field`]: per-type behaviour (rules, value coercion, render hints)
//! - [`rules`]: rule derivation and submission validation
//! - [`normalize`]: name-based value normalization (phone numbers)
//! - [`definition`]: save-time integrity checks of a schema
//! - [`columns`]: admin table and CSV export columns
//! - [`augment`]: additive fields required for video-provider sync

pub mod augment;
pub mod columns;
pub mod definition;
pub mod field;
pub mod normalize;
pub mod rules;

pub use augment::augment_for_registrant_sync;
pub use columns::{Column, ColumnSource, export_columns, table_columns};
pub use field::{RenderHint, Widget};
pub use normalize::{is_phone_like, normalize_phone};
pub use rules::{Rule, RuleSet, ValidatedSubmission, build_rules};
