//! Farmgate API gateway client.
//!
//! All traffic to the marketplace backend goes through one
//! reqwest-based [`ApiClient`]: bearer-token injection from the shared
//! session store, typed error mapping, and a global 401 interceptor
//! that drops the session. The [`Cart`] aggregate layers the
//! mutate-then-refetch cart flow on top of it.

mod cart;
mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use cart::Cart;
pub use client::ApiClient;
pub use error::ApiError;
