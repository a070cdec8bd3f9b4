//! Farmgate API client errors.

use thiserror::Error;

/// Errors surfaced by the API gateway client and the cart aggregate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, TLS, timeout). Nothing is
    /// retried automatically; the caller decides.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the backend, carrying the server-provided
    /// message when one was present (e.g. "Quantité insuffisante").
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered 401. The session has already been cleared by
    /// the time this error is observed.
    #[error("not authenticated (session cleared)")]
    Unauthorized,

    /// A 2xx body that did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rejected locally before any network call (empty delivery address,
    /// zero quantity).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Client misconfiguration (empty base URL).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for 400-class business rejections (insufficient stock,
    /// duplicate email, ...), which are shown verbatim next to the
    /// triggering command.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }
}
