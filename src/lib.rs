pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod swagger;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::Config;
pub use error::{AppError, AppResult};
