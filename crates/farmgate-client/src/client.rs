//! Marketplace API client.
//!
//! One reqwest client for every backend call. The session store is
//! injected at construction; the bearer token is read from it per
//! request, so a login or logout takes effect on the very next call.
//! A 401 from any endpoint clears the session before the error is
//! returned to the caller.

use std::str::FromStr;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

use farmgate_core::role::Role;
use farmgate_core::session::{Session, SessionStore};

use crate::error::ApiError;
use crate::types::{
    Ack, CartLine, CartUpdate, ErrorBody, Identity, LoginResponse, NewAccount, NewProduct, Order,
    OrderStatus, PendingPage, Product, ProductPatch, Statistics, UserDetails, UsersPage,
    ValidationAck,
};

/// Typed client for the marketplace backend.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000`),
    /// authenticating from `session`.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed — safe to ignore.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Build the API URL for a given path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Attach the bearer token from the session store, when logged in.
    pub(crate) fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.current() {
            Some(Session { token, .. }) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success status to an error. 401 is the global
    /// interceptor: the session is cleared before anything else sees
    /// the failure.
    pub(crate) fn error_for(&self, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            warn!("server answered 401; clearing session");
            self.session.clear();
            return ApiError::Unauthorized;
        }
        ApiError::Api {
            status: status.as_u16(),
            message: server_message(body),
        }
    }

    /// Decode a response, mapping HTTP errors to `ApiError`.
    async fn parse<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self.error_for(status, &body));
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// `POST /login`. On success the session is established (persisted and
    /// attached to every subsequent request) and returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.login_at("/login", email, password).await
    }

    /// `POST /admin/login`. Same exchange as [`Self::login`] against the
    /// admin credential table.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.login_at("/admin/login", email, password).await
    }

    async fn login_at(&self, path: &str, email: &str, password: &str) -> Result<Session, ApiError> {
        let resp = self
            .http
            .post(self.api_url(path))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        // Bad credentials come back as 401 but must not run the global
        // interceptor: there is no session to invalidate, and the login
        // form shows the failure inline.
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }
        let lr: LoginResponse = self.parse(resp).await?;

        let role = Role::from_str(&lr.user_type)
            .map_err(|e| ApiError::Decode(format!("login response: {e}")))?;
        let session = Session {
            token: lr.token,
            user_id: lr.user_id,
            role,
        };
        self.session
            .establish(session.clone())
            .map_err(|e| ApiError::Config(format!("failed to persist session: {e}")))?;
        Ok(session)
    }

    /// `POST /register`.
    pub async fn register(&self, account: &NewAccount) -> Result<Ack, ApiError> {
        let resp = self
            .http
            .post(self.api_url("/register"))
            .json(account)
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `GET /check-auth` — verify the persisted token against the server.
    pub async fn check_auth(&self) -> Result<Identity, ApiError> {
        let resp = self.authed(self.http.get(self.api_url("/check-auth"))).send().await?;
        self.parse(resp).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// `GET /products` — publicly listed (validated) products.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let resp = self.http.get(self.api_url("/products")).send().await?;
        self.parse(resp).await
    }

    /// `GET /farmer/products` — the calling farmer's own products,
    /// including ones still awaiting validation.
    pub async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        let resp = self
            .authed(self.http.get(self.api_url("/farmer/products")))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `POST /products` (multipart) — submit a product together with its
    /// image. The product starts unvalidated and invisible to customers.
    pub async fn submit_product(
        &self,
        product: &NewProduct,
        image_name: &str,
        image_mime: &str,
        image: Vec<u8>,
    ) -> Result<Ack, ApiError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name(image_name.to_string())
            .mime_str(image_mime)?;
        let mut form = reqwest::multipart::Form::new()
            .text("name", product.name.clone())
            .text("price", product.price.to_string())
            .text("quantity", product.quantity.to_string())
            .text("unit", product.unit.clone())
            .text("peeling_available", product.peeling_available.to_string())
            .text("peeling_price", product.peeling_price.to_string())
            .part("product_image", part);
        if let Some(desc) = &product.description {
            form = form.text("description", desc.clone());
        }

        let resp = self
            .authed(self.http.post(self.api_url("/products")))
            .multipart(form)
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PUT /products/{id}` — partial update, seller only.
    pub async fn update_product(&self, id: u64, patch: &ProductPatch) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.put(self.api_url(&format!("/products/{id}"))))
            .json(patch)
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `DELETE /products/{id}` — seller only.
    pub async fn delete_product(&self, id: u64) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.delete(self.api_url(&format!("/products/{id}"))))
            .send()
            .await?;
        self.parse(resp).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// `GET /cart`.
    pub async fn cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let resp = self.authed(self.http.get(self.api_url("/cart"))).send().await?;
        self.parse(resp).await
    }

    /// `POST /cart/add`. Stock limits are enforced server-side; an
    /// excessive quantity comes back as a 400 rejection.
    pub async fn cart_add(&self, product_id: u64, quantity: u32) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.post(self.api_url("/cart/add")))
            .json(&serde_json::json!({ "product_id": product_id, "quantity": quantity }))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PUT /cart/{id}` — quantity and/or peeling update.
    pub async fn cart_update(&self, line_id: u64, update: &CartUpdate) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.put(self.api_url(&format!("/cart/{line_id}"))))
            .json(update)
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `DELETE /cart/{id}`.
    pub async fn cart_remove(&self, line_id: u64) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.delete(self.api_url(&format!("/cart/{line_id}"))))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `POST /cart/checkout` — converts every cart line into an order.
    /// Callers validate the address first; see [`crate::Cart::checkout`].
    pub async fn cart_checkout(&self, delivery_address: &str) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.post(self.api_url("/cart/checkout")))
            .json(&serde_json::json!({ "delivery_address": delivery_address }))
            .send()
            .await?;
        self.parse(resp).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders` — buyer's own orders (the server gives farmers the
    /// orders placed on their products instead).
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp = self.authed(self.http.get(self.api_url("/orders"))).send().await?;
        self.parse(resp).await
    }

    /// `GET /orders/farmer` — orders on the calling farmer's products.
    pub async fn farmer_orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp = self
            .authed(self.http.get(self.api_url("/orders/farmer")))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PUT /orders/{id}` — status transition (farmer/admin action).
    pub async fn update_order_status(
        &self,
        order_id: u64,
        status: OrderStatus,
    ) -> Result<Ack, ApiError> {
        let resp = self
            .authed(self.http.put(self.api_url(&format!("/orders/{order_id}"))))
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .await?;
        self.parse(resp).await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// `GET /admin/orders` — every order in the system.
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp = self
            .authed(self.http.get(self.api_url("/admin/orders")))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `GET /admin/statistics` — dashboard aggregates.
    pub async fn statistics(&self) -> Result<Statistics, ApiError> {
        let resp = self
            .authed(self.http.get(self.api_url("/admin/statistics")))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `GET /admin/products/pending?page=N&per_page=M` — paginated
    /// products awaiting validation.
    pub async fn pending_products(&self, page: u32, per_page: u32) -> Result<PendingPage, ApiError> {
        let url = format!(
            "{}?page={page}&per_page={per_page}",
            self.api_url("/admin/products/pending")
        );
        let resp = self.authed(self.http.get(url)).send().await?;
        self.parse(resp).await
    }

    /// `GET /admin/users?page=N&per_page=M` — paginated user accounts.
    pub async fn admin_users(&self, page: u32, per_page: u32) -> Result<UsersPage, ApiError> {
        let url = format!("{}?page={page}&per_page={per_page}", self.api_url("/admin/users"));
        let resp = self.authed(self.http.get(url)).send().await?;
        self.parse(resp).await
    }

    /// `GET /admin/users/{id}` — one account with its activity totals.
    pub async fn user_details(&self, user_id: u64) -> Result<UserDetails, ApiError> {
        let resp = self
            .authed(self.http.get(self.api_url(&format!("/admin/users/{user_id}"))))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `PUT /admin/users/{id}/status` — activate or deactivate an account.
    pub async fn set_user_active(&self, user_id: u64, active: bool) -> Result<Ack, ApiError> {
        let resp = self
            .authed(
                self.http
                    .put(self.api_url(&format!("/admin/users/{user_id}/status"))),
            )
            .json(&serde_json::json!({ "active": active }))
            .send()
            .await?;
        self.parse(resp).await
    }

    /// `POST /admin/products/{id}/validate` — approve a product for the
    /// public listing. Validating twice is a 400 rejection.
    pub async fn validate_product(&self, product_id: u64) -> Result<ValidationAck, ApiError> {
        let resp = self
            .authed(
                self.http
                    .post(self.api_url(&format!("/admin/products/{product_id}/validate"))),
            )
            .send()
            .await?;
        self.parse(resp).await
    }
}

/// Pull the human-readable message out of a rejection body, falling back
/// to the raw text.
pub(crate) fn server_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}
