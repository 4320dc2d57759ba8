//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use crate::core::session::{MemorySessionStore, SessionStore};

/// A signed-out in-memory session.
pub fn guest_session() -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::new())
}

/// An in-memory session holding `token`.
pub fn session_with_token(token: &str) -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::with_token(token))
}
