//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (catalog reachable)
//!
//! # Products
//! GET  /                       - Redirects to /products
//! GET  /products               - Variable products with "Manage Variations" links
//!
//! # Variations
//! GET  /variations?product_id=N[&<attribute>=<value>...]
//!                              - Filter form and editable grid
//! POST /variations?product_id=N
//!                              - Apply a bulk edit, re-render the grid
//! ```

use axum::{
    Router,
    response::Redirect,
    routing::get,
};

use crate::state::AppState;

pub mod health;
pub mod notice;
pub mod products;
pub mod variations;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(|| async { Redirect::to("/products") }))
        .route("/products", get(products::index))
        .route("/variations", get(variations::index).post(variations::save))
}
