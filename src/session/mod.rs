//! Authenticated session: persistence, lifecycle and change events.

pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use service::{ClearReason, Session, SessionEvent, SessionService};
pub use store::{FileStore, KeyValueStore, MemoryStore};
