//! Products list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use variation_table_core::Product;
use variation_table_core::catalog::CatalogStore;

use super::notice::Notice;
use crate::{error::AppError, state::AppState};

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub variation_count: usize,
    pub manage_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            variation_count: product.children.len(),
            manage_url: format!("/variations?product_id={}", product.id),
        }
    }
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: String,
    pub notices: Vec<Notice>,
    pub products: Vec<ProductView>,
}

/// Products list page handler.
///
/// Only variable products with at least one variation get a row, since the
/// others have nothing to manage.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<ProductsIndexTemplate, AppError> {
    let products: Vec<ProductView> = state
        .catalog()
        .list_products()
        .await?
        .iter()
        .filter(|product| product.is_eligible())
        .map(ProductView::from)
        .collect();

    tracing::debug!(count = products.len(), "Listing manageable products");

    Ok(ProductsIndexTemplate {
        current_path: "/products".to_string(),
        notices: Vec::new(),
        products,
    })
}
