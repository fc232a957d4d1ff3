//! Registra Core — domain models, the form schema engine, and the
//! contracts every other crate builds on.
//!
//! This crate provides:
//! - Domain models for tenants, webinars and submissions ([`models`])
//! - The field schema engine: rule derivation, validation, normalization,
//!   column generation and auto-augmentation ([`schema`])
//! - Host-based tenant resolution ([`tenancy`])
//! - Canonical lead extraction shared by all integrations ([`lead`])
//! - Repository and outbound integration traits ([`repository`],
//!   [`integrations`])

pub mod error;
pub mod integrations;
pub mod lead;
pub mod models;
pub mod repository;
pub mod schema;
pub mod tenancy;

pub use error::{RegistraError, RegistraResult, ValidationErrors};
