//! Integration tests for bulk saving through the variation form.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use variation_table_core::catalog::CatalogStore;
use variation_table_core::{ImageId, VariationId};
use variation_table_integration_tests::{app, demo_catalog, post_form};

const SAVE_URI: &str = "/variations?product_id=100";

fn all_children() -> Vec<VariationId> {
    (101..=104).map(VariationId::new).collect()
}

#[tokio::test]
async fn test_single_sku_edit_saves_every_child_once() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(
        app,
        SAVE_URI,
        &[("variation_sku_101", "NEW"), ("save_variations", "1")],
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.body
            .contains("Variations updated successfully. 4 of 4 saved.")
    );
    assert_eq!(catalog.save_log().unwrap(), all_children());

    let saved = catalog
        .get_variation(VariationId::new(101))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.sku, "NEW");
    assert_eq!(saved.regular_price, "30.00");
    assert_eq!(saved.image_id, Some(ImageId::new(7)));

    // The re-rendered grid shows the saved value
    assert!(resp.body.contains("value=\"NEW\""));
}

#[tokio::test]
async fn test_price_and_image_edits() {
    let (app, catalog) = app(demo_catalog().unwrap());
    post_form(
        app,
        SAVE_URI,
        &[
            ("variation_price_102", " 35.50 "),
            ("variation_image_101", "0"),
            ("variation_image_103", "8"),
            ("save_variations", "1"),
        ],
    )
    .await;

    let v101 = catalog.get_variation(VariationId::new(101)).await.unwrap().unwrap();
    let v102 = catalog.get_variation(VariationId::new(102)).await.unwrap().unwrap();
    let v103 = catalog.get_variation(VariationId::new(103)).await.unwrap().unwrap();
    assert_eq!(v101.image_id, None);
    assert_eq!(v102.regular_price, "35.50");
    assert_eq!(v102.sku, "HOOD-RL");
    assert_eq!(v103.image_id, Some(ImageId::new(8)));
}

#[tokio::test]
async fn test_sku_is_sanitized() {
    let (app, catalog) = app(demo_catalog().unwrap());
    post_form(
        app,
        SAVE_URI,
        &[
            ("variation_sku_104", "  <b>NEW</b>\tsku  "),
            ("save_variations", "1"),
        ],
    )
    .await;

    let v104 = catalog.get_variation(VariationId::new(104)).await.unwrap().unwrap();
    assert_eq!(v104.sku, "NEW sku");
}

#[tokio::test]
async fn test_failed_save_does_not_stop_later_saves() {
    let catalog = demo_catalog().unwrap();
    catalog.fail_saves_for(VariationId::new(102), "locked").unwrap();
    let (app, catalog) = app(catalog);

    let resp = post_form(
        app,
        SAVE_URI,
        &[
            ("variation_sku_102", "SKIP"),
            ("variation_sku_103", "LATER"),
            ("save_variations", "1"),
        ],
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("3 of 4 saved."));
    assert!(resp.body.contains("Variation #102 could not be saved: locked"));
    assert!(resp.body.contains("notice-error"));
    assert_eq!(catalog.save_log().unwrap(), all_children());

    let v103 = catalog.get_variation(VariationId::new(103)).await.unwrap().unwrap();
    assert_eq!(v103.sku, "LATER");
}

#[tokio::test]
async fn test_duplicate_sku_is_reported_per_variation() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(
        app,
        SAVE_URI,
        &[("variation_sku_103", "HOOD-RS"), ("save_variations", "1")],
    )
    .await;

    assert!(
        resp.body
            .contains("Variation #103 could not be saved: Invalid or duplicated SKU.")
    );
    let v103 = catalog.get_variation(VariationId::new(103)).await.unwrap().unwrap();
    assert_eq!(v103.sku, "HOOD-BS");
}

#[tokio::test]
async fn test_invalid_price_is_reported() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(
        app,
        SAVE_URI,
        &[("variation_price_102", "abc"), ("save_variations", "1")],
    )
    .await;

    assert!(resp.body.contains("3 of 4 saved."));
    assert!(resp.body.contains("Variation #102 could not be saved: Invalid price"));
    let v102 = catalog.get_variation(VariationId::new(102)).await.unwrap().unwrap();
    assert_eq!(v102.regular_price, "32.00");
}

#[tokio::test]
async fn test_filtered_save_still_saves_every_child() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(
        app,
        "/variations?product_id=100&pa_color=Blue",
        &[("variation_sku_103", "BLUE-S"), ("save_variations", "1")],
    )
    .await;

    assert_eq!(catalog.save_log().unwrap(), all_children());
    assert!(resp.body.contains("Showing 2 of 4 variations."));
    assert!(!resp.body.contains("variation_sku_101"));
}

#[tokio::test]
async fn test_edits_for_foreign_variations_are_ignored() {
    let (app, catalog) = app(demo_catalog().unwrap());
    post_form(
        app,
        SAVE_URI,
        &[("variation_sku_999", "GHOST"), ("save_variations", "1")],
    )
    .await;

    assert_eq!(catalog.save_log().unwrap(), all_children());
    assert!(catalog.get_variation(VariationId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_submission_without_marker_saves_nothing() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(app, SAVE_URI, &[("variation_sku_101", "NEW")]).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(catalog.save_log().unwrap().is_empty());
    assert!(!resp.body.contains("Variations updated successfully."));
}

#[tokio::test]
async fn test_save_for_simple_product_is_informational() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(
        app,
        "/variations?product_id=300",
        &[("save_variations", "1")],
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.body
            .contains("Invalid product ID or the product is not a variable product.")
    );
    assert!(catalog.save_log().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_without_product_id_is_informational() {
    let (app, catalog) = app(demo_catalog().unwrap());
    let resp = post_form(app, "/variations", &[("save_variations", "1")]).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Product ID not provided."));
    assert!(catalog.save_log().unwrap().is_empty());
}
