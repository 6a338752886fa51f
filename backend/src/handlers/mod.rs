//! HTTP handlers

pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod manufacturing;
pub mod purchase;
pub mod sales;

pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use manufacturing::*;
pub use purchase::*;
pub use sales::*;
