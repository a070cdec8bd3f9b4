//! Farmgate CLI library.
//!
//! The command modules are the view layer of the storefront: they render
//! listings and dashboards to stdout and drive the API client. Every
//! role-scoped command goes through the navigation gate before touching
//! the network.

pub mod admin_cmd;
pub mod auth_cmd;
pub mod cart_cmd;
pub mod config;
pub mod nav;
pub mod order_cmd;
pub mod product_cmd;
