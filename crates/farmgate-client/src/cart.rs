//! Cart aggregate.
//!
//! Client-side view over the server-held cart. Price and stock truth
//! live server-side, so every mutation is followed by a full refetch
//! instead of an optimistic local patch — the cache only ever holds
//! what the server last confirmed. If two mutations race, the last
//! completed refetch wins.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{CartLine, CartUpdate};

/// Cached view of the current user's cart.
#[derive(Debug)]
pub struct Cart {
    client: Arc<ApiClient>,
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty view; call [`Self::refresh`] to populate it.
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            lines: Vec::new(),
        }
    }

    /// A view pre-populated with `lines`, standing in for a completed
    /// refetch.
    #[cfg(test)]
    pub(crate) fn with_lines(client: Arc<ApiClient>, lines: Vec<CartLine>) -> Self {
        Self { client, lines }
    }

    /// The last server-confirmed lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Display total, summed from server-provided line totals. Never
    /// used for checkout; the server recomputes the charged amount.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.total_price).sum()
    }

    /// Re-fetch the cart from the server, replacing the cache.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.lines = self.client.cart().await?;
        Ok(())
    }

    /// Add `quantity` of a product. Zero is rejected locally; exceeding
    /// stock is a server-side 400 surfaced verbatim.
    pub async fn add(&mut self, product_id: u64, quantity: u32) -> Result<(), ApiError> {
        if quantity == 0 {
            return Err(ApiError::InvalidInput("quantity must be positive".into()));
        }
        self.client.cart_add(product_id, quantity).await?;
        self.refresh().await
    }

    /// Set a line's quantity. Same constraints as [`Self::add`].
    pub async fn update_quantity(&mut self, line_id: u64, quantity: u32) -> Result<(), ApiError> {
        if quantity == 0 {
            return Err(ApiError::InvalidInput("quantity must be positive".into()));
        }
        self.client
            .cart_update(
                line_id,
                &CartUpdate {
                    quantity: Some(quantity),
                    ..CartUpdate::default()
                },
            )
            .await?;
        self.refresh().await
    }

    /// Toggle the peeling service on a line. Idempotent: sending the
    /// current value again is harmless.
    pub async fn toggle_peeling(&mut self, line_id: u64, requested: bool) -> Result<(), ApiError> {
        self.client
            .cart_update(
                line_id,
                &CartUpdate {
                    peeling_requested: Some(requested),
                    ..CartUpdate::default()
                },
            )
            .await?;
        self.refresh().await
    }

    /// Remove a line.
    pub async fn remove(&mut self, line_id: u64) -> Result<(), ApiError> {
        self.client.cart_remove(line_id).await?;
        self.refresh().await
    }

    /// Convert the cart into orders. An empty or whitespace address is
    /// rejected before any network call; on server failure the cached
    /// lines are left untouched.
    pub async fn checkout(&mut self, delivery_address: &str) -> Result<(), ApiError> {
        if delivery_address.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "delivery address must not be empty".into(),
            ));
        }
        self.client.cart_checkout(delivery_address).await?;
        self.refresh().await
    }
}
