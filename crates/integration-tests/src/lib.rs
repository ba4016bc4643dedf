//! Integration tests for Variation Table.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router tests (no database needed)
//! cargo test -p variation-table-integration-tests
//!
//! # Live tests against a running admin server
//! ADMIN_BASE_URL=http://localhost:3001 cargo test -p variation-table-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `variation_grid` - grid rendering, filtering and prefill
//! - `bulk_save` - applying bulk edits through the form
//! - `admin_live` - smoke tests against a deployed admin (ignored by default)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;
use url::form_urlencoded;

use variation_table_admin::{catalog::Catalog, routes, state::AppState};
use variation_table_core::catalog::{CatalogError, MemoryCatalog};
use variation_table_core::{Attribute, ImageId, Product, ProductId, ProductType, Variation, VariationId};

/// The hoodie: variable, `pa_color` from terms, `size` inline.
pub const HOODIE: ProductId = ProductId::new(100);
/// A variable product without any variations.
pub const EMPTY_VARIABLE: ProductId = ProductId::new(200);
/// A simple product.
pub const MUG: ProductId = ProductId::new(300);

/// Hoodie variations in child order: (id, color, size, sku, price, image).
pub const HOODIE_VARIATIONS: [(i64, &str, &str, &str, &str, i64); 4] = [
    (101, "Red", "Small", "HOOD-RS", "30.00", 7),
    (102, "Red", "Large", "HOOD-RL", "32.00", 0),
    (103, "Blue", "Small", "HOOD-BS", "30.00", 0),
    (104, "Blue", "X-Large", "", "", 0),
];

/// Build the demo catalog used across tests.
///
/// # Errors
///
/// Returns `CatalogError::Backend` if the store lock is poisoned.
pub fn demo_catalog() -> Result<MemoryCatalog, CatalogError> {
    let catalog = MemoryCatalog::new();

    catalog.insert_product(Product {
        id: HOODIE,
        name: "Hoodie".to_string(),
        product_type: ProductType::Variable,
        attributes: vec![
            Attribute::enumerated("pa_color", "Color"),
            Attribute::freeform("size", "Size", ["Small", "Large", "X-Large"]),
        ],
        children: Vec::new(),
    })?;
    catalog.insert_product(Product {
        id: EMPTY_VARIABLE,
        name: "Beanie".to_string(),
        product_type: ProductType::Variable,
        attributes: vec![Attribute::enumerated("pa_color", "Color")],
        children: Vec::new(),
    })?;
    catalog.insert_product(Product {
        id: MUG,
        name: "Mug".to_string(),
        product_type: ProductType::Simple,
        attributes: Vec::new(),
        children: Vec::new(),
    })?;

    catalog.set_terms("pa_color", ["Red", "Blue", "Green"])?;
    catalog.insert_media(ImageId::new(7), "https://cdn.example.com/hoodie-red.jpg")?;
    catalog.insert_media(ImageId::new(8), "https://cdn.example.com/hoodie-any.jpg")?;

    for (id, color, size, sku, price, image) in HOODIE_VARIATIONS {
        let mut variation = Variation::new(VariationId::new(id), HOODIE)
            .with_attribute("pa_color", color)
            .with_attribute("size", size);
        variation.set_sku(sku);
        variation.set_regular_price(price);
        variation.set_image_id(image);
        catalog.insert_variation(variation)?;
    }

    Ok(catalog)
}

/// Admin router backed by `catalog`, plus a handle for inspecting it.
pub fn app(catalog: MemoryCatalog) -> (Router, Arc<MemoryCatalog>) {
    let catalog = Arc::new(catalog);
    let state = AppState::new(Catalog::Memory(Arc::clone(&catalog)), None);
    (routes::routes().with_state(state), catalog)
}

/// Response status and body text.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap_or_else(|e| match e {});
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    TestResponse {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// `GET uri`.
pub async fn get(app: Router, uri: &str) -> TestResponse {
    let request = Request::get(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

/// `POST uri` with an urlencoded form body.
pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("Failed to build request");
    send(app, request).await
}
