//! Business logic services

pub mod dashboard;
pub mod inventory;
pub mod manufacturing;
pub mod purchase;
pub mod sales;

pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use manufacturing::ManufacturingService;
pub use purchase::PurchaseService;
pub use sales::SalesService;
