//! Shared types and models for Smallbatch ERP
//!
//! This crate contains the wire models and stock arithmetic shared between
//! the backend and any other component of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
