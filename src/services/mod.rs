pub mod audit_service;
pub mod points_service;

pub use audit_service::*;
pub use points_service::*;
