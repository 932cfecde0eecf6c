pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod leave;
pub mod models;
pub mod router;
pub mod scope;
pub mod session;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AppError, Result};
