//! Domain models for Smallbatch ERP

mod manufacturing;
mod material;
mod product;
mod purchase;
mod sale;
mod user;

pub use manufacturing::*;
pub use material::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use user::*;
