//! Domain models for Registra.
//!
//! These are the core types shared across all crates.

pub mod form;
pub mod submission;
pub mod tenant;
pub mod webinar;
