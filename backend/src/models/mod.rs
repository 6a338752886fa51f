//! Database models for Smallbatch ERP
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
