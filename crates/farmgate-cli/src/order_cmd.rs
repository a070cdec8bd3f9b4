//! Order subcommands: buyer history, farmer's incoming orders, the
//! admin-wide view, and status transitions.

use std::io::{self, Write};
use std::sync::Arc;

use farmgate_client::types::{Order, OrderStatus};
use farmgate_client::ApiClient;
use farmgate_core::role::Role;
use farmgate_core::routes::Route;
use farmgate_core::session::SessionStore;

use crate::nav::gate;

/// Order subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum OrderAction {
    /// Your orders (farmers see orders on their own products).
    List,
    /// Incoming orders for your products (farmer).
    Farmer,
    /// Every order in the system (admin).
    All,
    /// Transition an order's status (farmer/admin).
    SetStatus {
        order_id: u64,
        /// pending, processing, shipped, delivered or cancelled.
        status: OrderStatus,
    },
}

/// Execute an order subcommand.
pub async fn run(
    action: OrderAction,
    client: &Arc<ApiClient>,
    session: &Arc<SessionStore>,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        OrderAction::List => {
            if !gate(session, Route::Orders)? {
                return Ok(());
            }
            print_orders(&mut out, &client.orders().await?)?;
        }
        OrderAction::Farmer => {
            if !gate(session, Route::FarmerOrders)? {
                return Ok(());
            }
            print_orders(&mut out, &client.farmer_orders().await?)?;
        }
        OrderAction::All => {
            if !gate(session, Route::Admin)? {
                return Ok(());
            }
            print_orders(&mut out, &client.all_orders().await?)?;
        }
        OrderAction::SetStatus { order_id, status } => {
            // Status transitions are a farmer/admin action, never
            // customer-controlled; gate on the acting role's order view.
            let route = match session.role() {
                Some(Role::Admin) => Route::Admin,
                _ => Route::FarmerOrders,
            };
            if !gate(session, route)? {
                return Ok(());
            }
            let ack = client.update_order_status(order_id, status).await?;
            writeln!(out, "{}", ack.message)?;
        }
    }
    Ok(())
}

fn print_orders(out: &mut impl Write, orders: &[Order]) -> anyhow::Result<()> {
    if orders.is_empty() {
        writeln!(out, "No orders.")?;
        return Ok(());
    }
    for o in orders {
        let peeling = if o.peeling_requested { ", peeled" } else { "" };
        writeln!(
            out,
            "#{} product {} x{}{} — {:.2} | {} | {} | {}",
            o.id,
            o.product_id,
            o.quantity,
            peeling,
            o.total_price,
            o.status.as_str(),
            o.delivery_address,
            o.created_at
        )?;
    }
    Ok(())
}
