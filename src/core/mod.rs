//! # Core
//!
//! Configuration and session state. Everything else takes these as
//! injected dependencies.
//!
//! ```text
//!               ┌───────────────────────────┐
//!               │           CORE            │
//!               │                           │
//!               │  • config  (settings)     │
//!               │  • session (auth token)   │
//!               └─────────────┬─────────────┘
//!                             │ Arc<dyn SessionStore>
//!            ┌────────────────┴────────────────┐
//!            ▼                                 ▼
//!     ┌─────────────┐                   ┌─────────────┐
//!     │   routing   │                   │     api     │
//!     │   (guard)   │                   │  (client)   │
//!     └─────────────┘                   └──────┬──────┘
//!                                              ▼
//!                                       ┌─────────────┐
//!                                       │  services   │
//!                                       └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`session`]: the session token stores

pub mod config;
pub mod session;
