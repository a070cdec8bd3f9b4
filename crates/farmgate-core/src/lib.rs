//! Farmgate Core Library
//!
//! Shared functionality for Farmgate components:
//! - Session store (bearer token + user identity, persisted across runs)
//! - Role model and role-gated route guard
//! - Common error types

pub mod error;
pub mod role;
pub mod routes;
pub mod session;
pub mod tracing_init;

pub use error::{Error, Result};
pub use role::Role;
pub use routes::{Navigation, Route};
pub use session::{Session, SessionStore};
