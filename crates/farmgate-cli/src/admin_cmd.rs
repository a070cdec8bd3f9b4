//! Admin subcommands: dashboard statistics, product validation, and
//! user administration.

use std::io::{self, Write};
use std::sync::Arc;

use farmgate_client::ApiClient;
use farmgate_core::routes::Route;
use farmgate_core::session::SessionStore;

use crate::nav::gate;

/// Admin subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AdminAction {
    /// Dashboard aggregates.
    Stats,
    /// Products awaiting validation (paginated).
    Pending {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Approve a product for the public listing.
    Validate { product_id: u64 },
    /// List user accounts (paginated).
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Show one account with its activity totals.
    User { user_id: u64 },
    /// Activate an account (pass --off to deactivate).
    SetActive {
        user_id: u64,
        /// Deactivate instead of activate.
        #[arg(long)]
        off: bool,
    },
}

/// Execute an admin subcommand.
pub async fn run(
    action: AdminAction,
    client: &Arc<ApiClient>,
    session: &Arc<SessionStore>,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        AdminAction::Stats => {
            if !gate(session, Route::Admin)? {
                return Ok(());
            }
            let stats = client.statistics().await?;
            writeln!(
                out,
                "Users: {} total ({} farmers, {} customers)",
                stats.users.total, stats.users.farmers, stats.users.customers
            )?;
            writeln!(
                out,
                "Sales: {} orders, {:.2} revenue ({} orders / {:.2} this month)",
                stats.sales.total_orders,
                stats.sales.total_revenue,
                stats.sales.monthly.orders,
                stats.sales.monthly.revenue
            )?;
            for (status, count) in &stats.sales.orders_by_status {
                writeln!(out, "  {status}: {count}")?;
            }
            if !stats.top_sellers.is_empty() {
                writeln!(out, "Top sellers:")?;
                for seller in &stats.top_sellers {
                    writeln!(
                        out,
                        "  {} — {} orders, {:.2}",
                        seller.name, seller.total_orders, seller.total_sales
                    )?;
                }
            }
        }
        AdminAction::Pending { page, per_page } => {
            if !gate(session, Route::PendingProducts)? {
                return Ok(());
            }
            let pending = client.pending_products(page, per_page).await?;
            if pending.products.is_empty() {
                writeln!(out, "No products awaiting validation.")?;
                return Ok(());
            }
            for p in &pending.products {
                writeln!(
                    out,
                    "#{} {} — {:.2}/{} | stock {} | by {} | submitted {}",
                    p.id, p.name, p.price, p.unit, p.quantity, p.seller_name, p.created_at
                )?;
            }
            writeln!(
                out,
                "Page {}/{} ({} pending)",
                pending.current_page, pending.total_pages, pending.total_products
            )?;
        }
        AdminAction::Validate { product_id } => {
            if !gate(session, Route::PendingProducts)? {
                return Ok(());
            }
            let ack = client.validate_product(product_id).await?;
            writeln!(out, "{} (validated at {})", ack.message, ack.validation_date)?;
        }
        AdminAction::Users { page, per_page } => {
            if !gate(session, Route::Admin)? {
                return Ok(());
            }
            let listing = client.admin_users(page, per_page).await?;
            for u in &listing.users {
                let state = if u.active { "" } else { " [deactivated]" };
                writeln!(
                    out,
                    "#{} {} <{}> ({}){} | since {}",
                    u.id, u.name, u.email, u.user_type, state, u.created_at
                )?;
            }
            writeln!(
                out,
                "Page {}/{} ({} users)",
                listing.current_page, listing.total_pages, listing.total_users
            )?;
        }
        AdminAction::User { user_id } => {
            if !gate(session, Route::Admin)? {
                return Ok(());
            }
            let u = client.user_details(user_id).await?;
            let state = if u.active { "active" } else { "deactivated" };
            writeln!(out, "#{} {} <{}> ({}, {})", u.id, u.name, u.email, u.user_type, state)?;
            if let Some(phone) = &u.phone {
                writeln!(out, "Phone: {phone}")?;
            }
            if let Some(address) = &u.address {
                writeln!(out, "Address: {address}")?;
            }
            if let (Some(products), Some(sales)) = (u.total_products, u.total_sales) {
                writeln!(out, "Farmer activity: {products} products, {sales:.2} in sales")?;
            }
            if let (Some(orders), Some(spent)) = (u.total_orders, u.total_spent) {
                writeln!(out, "Buyer activity: {orders} orders, {spent:.2} spent")?;
            }
        }
        AdminAction::SetActive { user_id, off } => {
            if !gate(session, Route::Admin)? {
                return Ok(());
            }
            let ack = client.set_user_active(user_id, !off).await?;
            writeln!(out, "{}", ack.message)?;
        }
    }
    Ok(())
}
