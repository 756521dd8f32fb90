//! # Product Commands
//!
//! Price list management and the sale total quote.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppConfig, SessionState};
use fiado_core::balance::quote_sale_total;
use fiado_core::validation::{
    normalize_search_query, validate_price, validate_product_name, validate_quantity,
};
use fiado_core::{Money, NewProduct, Product, Quantity, UnitKind};
use fiado_db::Database;

/// Product DTO for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub unit_kind: UnitKind,
    pub created_at: String,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            unit_kind: p.unit_kind,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Input for [`add_product`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub unit_kind: UnitKind,
}

/// A sale total quoted from the product's current price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleQuoteDto {
    pub product_id: i64,
    pub unit_kind: UnitKind,
    pub unit_price_cents: i64,
    pub quantity_milli: i64,
    pub total_cents: i64,
}

/// Every product, name ascending.
pub async fn list_products(db: &Database) -> Result<Vec<ProductDto>, ApiError> {
    debug!("list_products command");
    let products = db.products().list().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Name suggestions for the sale form.
pub async fn search_products(
    db: &Database,
    config: &AppConfig,
    query: &str,
) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    let Some(query) = normalize_search_query(query, config.min_search_len) else {
        debug!("search_products: query too short");
        return Ok(Vec::new());
    };

    let products = db.products().search(&query).await?;
    let dtos: Vec<ProductDto> = products
        .into_iter()
        .take(config.suggestion_limit.unwrap_or(usize::MAX))
        .map(ProductDto::from)
        .collect();

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        query = %query,
        "search_products complete"
    );
    Ok(dtos)
}

/// The product whose name matches exactly, ignoring case.
pub async fn find_product_exact(db: &Database, name: &str) -> Result<Option<ProductDto>, ApiError> {
    debug!(name = %name, "find_product_exact command");
    let product = db.products().find_exact(name.trim()).await?;
    Ok(product.map(ProductDto::from))
}

/// Adds a product to the price list.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Blank name or negative price
/// * `Err(CONFLICT)` - A product with this exact name exists
pub async fn add_product(db: &Database, req: AddProductRequest) -> Result<ProductDto, ApiError> {
    let name = validate_product_name(&req.name)?;
    let price = Money::from_cents(req.price_cents);
    validate_price(price)?;

    debug!(name = %name, price = price.cents(), unit_kind = %req.unit_kind, "add_product command");

    let product = db
        .products()
        .insert(&NewProduct {
            name,
            price,
            unit_kind: req.unit_kind,
        })
        .await?;
    Ok(ProductDto::from(product))
}

/// Puts a product on the sale entry form.
pub async fn select_product(
    db: &Database,
    session: &SessionState,
    id: i64,
) -> Result<ProductDto, ApiError> {
    let product = db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    session.with_session_mut(|s| s.select_product(product.clone()));
    Ok(ProductDto::from(product))
}

/// Quotes a sale: typed quantity × the product's current price.
///
/// `quantity` is operator text such as `"1,250"` or `"3"`.
pub async fn quote_sale(
    db: &Database,
    product_id: i64,
    quantity: &str,
) -> Result<SaleQuoteDto, ApiError> {
    let quantity: Quantity = quantity.parse()?;
    validate_quantity(quantity)?;

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let total = quote_sale_total(product.price(), quantity)?;
    debug!(product_id, quantity = %quantity, total = total.cents(), "quote_sale");

    Ok(SaleQuoteDto {
        product_id,
        unit_kind: product.unit_kind,
        unit_price_cents: product.price_cents,
        quantity_milli: quantity.milli(),
        total_cents: total.cents(),
    })
}

/// Deletes a product that no sale references.
///
/// ## Returns
/// * `Err(CONSTRAINT_ERROR)` - Sales still reference the product
/// * `Err(NOT_FOUND)` - No product with this id
pub async fn delete_product(
    db: &Database,
    session: &SessionState,
    id: i64,
) -> Result<(), ApiError> {
    debug!(id, "delete_product command");
    db.products().delete(id).await?;
    session.with_session_mut(|s| s.forget_product(id));
    Ok(())
}
