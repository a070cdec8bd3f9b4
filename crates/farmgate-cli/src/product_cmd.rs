//! Product subcommands: public listing, the farmer's own products, and
//! submission/update/delete of products for sale.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use farmgate_client::types::{NewProduct, Product, ProductPatch};
use farmgate_client::ApiClient;
use farmgate_core::routes::Route;
use farmgate_core::session::SessionStore;

use crate::nav::gate;

/// Product subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ProductAction {
    /// List validated products (public).
    List,
    /// List your own products, including ones awaiting validation.
    Mine,
    /// Submit a product for admin validation.
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Price per unit.
        #[arg(short, long)]
        price: f64,
        /// Stock on hand.
        #[arg(short, long)]
        quantity: u32,
        /// Sale unit (e.g. "kg").
        #[arg(short, long)]
        unit: String,
        /// Offer the peeling service for this product.
        #[arg(long)]
        peeling_available: bool,
        /// Peeling surcharge per unit.
        #[arg(long, default_value_t = 0.0)]
        peeling_price: f64,
        /// Product image (jpeg or png).
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Update one of your products.
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Delete one of your products.
    Delete { id: u64 },
}

/// Execute a product subcommand.
pub async fn run(
    action: ProductAction,
    client: &Arc<ApiClient>,
    session: &Arc<SessionStore>,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ProductAction::List => {
            let products = client.products().await?;
            print_products(&mut out, &products)?;
        }
        ProductAction::Mine => {
            if !gate(session, Route::MyProducts)? {
                return Ok(());
            }
            let products = client.my_products().await?;
            print_products(&mut out, &products)?;
        }
        ProductAction::Add {
            name,
            description,
            price,
            quantity,
            unit,
            peeling_available,
            peeling_price,
            image,
        } => {
            if !gate(session, Route::AddProduct)? {
                return Ok(());
            }
            let mime = image_mime(&image)?;
            let bytes = std::fs::read(&image)?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "product.jpg".to_string());
            let ack = client
                .submit_product(
                    &NewProduct {
                        name,
                        description,
                        price,
                        quantity,
                        unit,
                        peeling_available,
                        peeling_price,
                    },
                    &file_name,
                    mime,
                    bytes,
                )
                .await?;
            writeln!(out, "{}", ack.message)?;
        }
        ProductAction::Update {
            id,
            name,
            description,
            price,
            quantity,
            unit,
        } => {
            if !gate(session, Route::MyProducts)? {
                return Ok(());
            }
            let patch = ProductPatch {
                name,
                description,
                price,
                quantity,
                unit,
                ..ProductPatch::default()
            };
            if serde_json::to_value(&patch)?.as_object().is_none_or(|o| o.is_empty()) {
                anyhow::bail!("nothing to update; pass at least one field");
            }
            let ack = client.update_product(id, &patch).await?;
            writeln!(out, "{}", ack.message)?;
        }
        ProductAction::Delete { id } => {
            if !gate(session, Route::MyProducts)? {
                return Ok(());
            }
            let ack = client.delete_product(id).await?;
            writeln!(out, "{}", ack.message)?;
        }
    }
    Ok(())
}

fn print_products(out: &mut impl Write, products: &[Product]) -> anyhow::Result<()> {
    if products.is_empty() {
        writeln!(out, "No products.")?;
        return Ok(());
    }
    for p in products {
        let state = if p.validated_by_admin { "" } else { " [pending validation]" };
        let peeling = if p.peeling_available {
            format!(" (+{:.2} peeling)", p.peeling_price)
        } else {
            String::new()
        };
        writeln!(
            out,
            "#{} {} — {:.2}/{} | stock {}{}{}",
            p.id, p.name, p.price, p.unit, p.quantity, peeling, state
        )?;
    }
    Ok(())
}

/// Backend only accepts `image/*` uploads.
fn image_mime(path: &std::path::Path) -> anyhow::Result<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        other => anyhow::bail!("unsupported image type: {other:?} (use jpeg or png)"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_by_extension() {
        assert_eq!(image_mime(std::path::Path::new("a.jpg")).unwrap(), "image/jpeg");
        assert_eq!(image_mime(std::path::Path::new("a.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(image_mime(std::path::Path::new("a.png")).unwrap(), "image/png");
        assert!(image_mime(std::path::Path::new("a.pdf")).is_err());
        assert!(image_mime(std::path::Path::new("noext")).is_err());
    }
}
