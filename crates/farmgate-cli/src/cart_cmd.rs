//! Cart subcommands. Customer-only; every mutation is confirmed by a
//! refetch of the server-held cart before anything is printed.

use std::io::{self, Write};
use std::sync::Arc;

use farmgate_client::{ApiClient, Cart};
use farmgate_core::routes::Route;
use farmgate_core::session::SessionStore;

use crate::nav::gate;

/// Cart subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum CartAction {
    /// Show the current cart.
    Show,
    /// Add a product to the cart.
    Add {
        product_id: u64,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Change a line's quantity.
    Update { line_id: u64, quantity: u32 },
    /// Remove a line.
    Remove { line_id: u64 },
    /// Request the peeling service on a line (or drop it with --off).
    Peeling {
        line_id: u64,
        #[arg(long)]
        off: bool,
    },
    /// Convert the cart into orders.
    Checkout {
        /// Delivery address (must be non-empty).
        #[arg(short, long)]
        address: String,
    },
}

/// Execute a cart subcommand.
pub async fn run(
    action: CartAction,
    client: &Arc<ApiClient>,
    session: &Arc<SessionStore>,
) -> anyhow::Result<()> {
    if !gate(session, Route::Cart)? {
        return Ok(());
    }
    let mut out = io::stdout();
    let mut cart = Cart::new(Arc::clone(client));

    match action {
        CartAction::Show => {
            cart.refresh().await?;
        }
        CartAction::Add { product_id, quantity } => {
            cart.add(product_id, quantity).await?;
            writeln!(out, "Added product {product_id} x{quantity}.")?;
        }
        CartAction::Update { line_id, quantity } => {
            cart.update_quantity(line_id, quantity).await?;
            writeln!(out, "Updated line {line_id}.")?;
        }
        CartAction::Remove { line_id } => {
            cart.remove(line_id).await?;
            writeln!(out, "Removed line {line_id}.")?;
        }
        CartAction::Peeling { line_id, off } => {
            cart.toggle_peeling(line_id, !off).await?;
            writeln!(
                out,
                "Peeling {} for line {line_id}.",
                if off { "disabled" } else { "requested" }
            )?;
        }
        CartAction::Checkout { address } => {
            cart.checkout(&address).await?;
            writeln!(out, "Order placed. Delivery to: {address}")?;
        }
    }

    print_cart(&mut out, &cart)?;
    Ok(())
}

fn print_cart(out: &mut impl Write, cart: &Cart) -> anyhow::Result<()> {
    if cart.lines().is_empty() {
        writeln!(out, "Cart is empty.")?;
        return Ok(());
    }
    for line in cart.lines() {
        writeln!(
            out,
            "#{} {} x{} @ {:.2} = {:.2} (from {})",
            line.id,
            line.product_name,
            line.quantity,
            line.price_per_unit,
            line.total_price,
            line.seller_name
        )?;
    }
    writeln!(out, "Total: {:.2}", cart.total())?;
    Ok(())
}
