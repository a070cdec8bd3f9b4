//! Route table and role-gated navigation guard.
//!
//! Every view the application can show is declared here, together with
//! the roles allowed to reach it. The guard is a pure function over a
//! session snapshot: no network, no hidden state. Unknown paths resolve
//! to [`Route::NotFound`] rather than being an error.

use crate::role::Role;
use crate::session::Session;

/// Declared views. Nothing outside this enum is navigable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Login,
    Register,
    /// Customer shopping cart.
    Cart,
    /// Buyer order history (farmers see orders on their own products).
    Orders,
    /// Farmer: submit a product for validation.
    AddProduct,
    /// Farmer: own products, including ones awaiting validation.
    MyProducts,
    /// Farmer: incoming orders for the farmer's products.
    FarmerOrders,
    /// Admin dashboard (statistics).
    Admin,
    /// Admin: products awaiting validation.
    PendingProducts,
    /// Fallback for undeclared paths.
    NotFound,
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The route is reachable; show it.
    Allow(Route),
    /// Not logged in and the route is protected.
    RedirectLogin,
    /// Logged in but the role is not in the allow-list. Silent redirect,
    /// no error surfaced.
    RedirectHome,
}

impl Route {
    /// Map a URL-style path onto a declared route.
    pub fn resolve(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/" => Self::Home,
            "/products" => Self::Products,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/cart" => Self::Cart,
            "/orders" => Self::Orders,
            "/add-product" => Self::AddProduct,
            "/my-products" => Self::MyProducts,
            "/farmer-orders" => Self::FarmerOrders,
            "/admin" => Self::Admin,
            "/validate" => Self::PendingProducts,
            _ => Self::NotFound,
        }
    }

    /// Roles allowed to enter this route. `None` means public.
    pub const fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Self::Home
            | Self::Products
            | Self::Login
            | Self::Register
            | Self::NotFound => None,
            Self::Cart => Some(&[Role::Customer]),
            Self::Orders => Some(&[Role::Customer, Role::Farmer]),
            Self::AddProduct | Self::MyProducts | Self::FarmerOrders => Some(&[Role::Farmer]),
            Self::Admin | Self::PendingProducts => Some(&[Role::Admin]),
        }
    }

    /// Decide whether `session` may enter this route.
    pub fn guard(self, session: Option<&Session>) -> Navigation {
        let Some(allowed) = self.allowed_roles() else {
            return Navigation::Allow(self);
        };
        match session {
            None => Navigation::RedirectLogin,
            Some(s) if allowed.contains(&s.role) => Navigation::Allow(self),
            Some(_) => Navigation::RedirectHome,
        }
    }
}
