//! Integration tests for the variation grid page.
//!
//! Drives the admin router in-process against the in-memory demo catalog.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use variation_table_integration_tests::{app, demo_catalog, get};

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_products_lists_only_manageable_products() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/products").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Hoodie"));
    assert!(resp.body.contains("/variations?product_id=100"));
    assert!(resp.body.contains("Manage Variations"));
    // Variable without children, and simple products, have nothing to manage
    assert!(!resp.body.contains("Beanie"));
    assert!(!resp.body.contains("Mug"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let (router, _) = app(demo_catalog().unwrap());
    let resp = get(router, "/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let (router, _) = app(demo_catalog().unwrap());
    let resp = get(router, "/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

// =============================================================================
// Grid
// =============================================================================

#[tokio::test]
async fn test_grid_shows_every_variation_without_filter() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100").await;

    assert_eq!(resp.status, StatusCode::OK);
    for id in 101..=104 {
        assert!(resp.body.contains(&format!("name=\"variation_sku_{id}\"")));
        assert!(resp.body.contains(&format!("name=\"variation_price_{id}\"")));
        assert!(resp.body.contains(&format!("name=\"variation_image_{id}\"")));
    }
    assert!(resp.body.contains("Showing 4 of 4 variations."));
    assert!(resp.body.contains("Red, Small"));
    assert!(resp.body.contains("value=\"HOOD-RS\""));
    assert!(resp.body.contains("hoodie-red.jpg"));
    assert!(resp.body.contains("name=\"save_variations\""));
}

#[tokio::test]
async fn test_grid_filters_by_attribute() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&pa_color=Red").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("variation_sku_101"));
    assert!(resp.body.contains("variation_sku_102"));
    assert!(!resp.body.contains("variation_sku_103"));
    assert!(!resp.body.contains("variation_sku_104"));
    assert!(resp.body.contains("Showing 2 of 4 variations."));
    // The save target keeps the filter
    assert!(resp.body.contains("product_id=100&amp;pa_color=Red"));
}

#[tokio::test]
async fn test_grid_filters_combine_with_and() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&pa_color=Blue&size=Small").await;

    assert!(resp.body.contains("variation_sku_103"));
    assert!(resp.body.contains("Showing 1 of 4 variations."));
}

#[tokio::test]
async fn test_empty_filter_value_is_ignored() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&pa_color=&size=").await;

    assert!(resp.body.contains("Showing 4 of 4 variations."));
}

#[tokio::test]
async fn test_selectors_list_terms_and_inline_options() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&size=Large").await;

    assert!(resp.body.contains("name=\"pa_color\""));
    assert!(resp.body.contains("value=\"Green\""));
    assert!(resp.body.contains("name=\"size\""));
    assert!(resp.body.contains("<option value=\"Large\" selected>"));
}

#[tokio::test]
async fn test_variable_product_without_children_renders_empty_grid() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=200").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Showing 0 of 0 variations."));
}

// =============================================================================
// Prefill
// =============================================================================

#[tokio::test]
async fn test_prefill_generates_uppercase_skus() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&sku_base=TEE").await;

    assert!(resp.body.contains("value=\"TEE-RS\""));
    assert!(resp.body.contains("value=\"TEE-BXL\""));
    // Nothing is saved by a prefill
    assert!(catalog.save_log().unwrap().is_empty());
}

#[tokio::test]
async fn test_prefill_price_and_image() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&bulk_price=19.99&bulk_image=8").await;

    assert_eq!(resp.body.matches("value=\"19.99\"").count(), 5);
    assert_eq!(resp.body.matches("hoodie-any.jpg").count(), 4);
}

#[tokio::test]
async fn test_invalid_prefill_price_is_reported_and_ignored() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=100&bulk_price=abc").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("notice-warning"));
    assert!(resp.body.contains("bulk_price"));
    assert!(resp.body.contains("value=\"32.00\""));
}

// =============================================================================
// Informational pages
// =============================================================================

#[tokio::test]
async fn test_missing_product_id_is_informational() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Product ID not provided."));
}

#[tokio::test]
async fn test_simple_and_unknown_products_are_informational() {
    for uri in ["/variations?product_id=300", "/variations?product_id=999"] {
        let (app, _) = app(demo_catalog().unwrap());
        let resp = get(app, uri).await;

        assert_eq!(resp.status, StatusCode::OK);
        assert!(
            resp.body
                .contains("Invalid product ID or the product is not a variable product.")
        );
        assert!(!resp.body.contains("variation_sku_"));
    }
}

#[tokio::test]
async fn test_non_integer_product_id_is_bad_request() {
    let (app, _) = app(demo_catalog().unwrap());
    let resp = get(app, "/variations?product_id=abc").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
