//! HR server access.

pub mod backend;
pub mod client;

pub use backend::{HrBackend, LeaveScope};
pub use client::ApiClient;
