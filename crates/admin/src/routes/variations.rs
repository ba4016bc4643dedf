//! Variation table route handlers.
//!
//! Both handlers capture the query string (and for `POST` the form body) into
//! a `RequestContext` once, then hand it to the core workflow.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use url::form_urlencoded;

use variation_table_core::ProductId;
use variation_table_core::grid::bulk::{
    IMAGE_FIELD_PREFIX, PRICE_FIELD_PREFIX, SKU_FIELD_PREFIX, SUBMIT_MARKER,
};
use variation_table_core::grid::request::{
    BULK_IMAGE_PARAM, BULK_PRICE_PARAM, PRODUCT_ID_PARAM, SKU_BASE_PARAM,
};
use variation_table_core::grid::{
    FilterSelector, GridError, RequestContext, RowViewModel, VariationGrid, apply,
};

use super::notice::{Notice, NoticePageTemplate};
use crate::{error::AppError, media::MediaLibrary, state::AppState};

const CURRENT_PATH: &str = "/variations";

/// One editable row, with its form field names resolved.
#[derive(Debug, Clone)]
pub struct RowView {
    pub variation_id: String,
    pub label: String,
    pub image_url: Option<String>,
    pub image_id: String,
    pub sku: String,
    pub price: String,
    pub sku_field: String,
    pub price_field: String,
    pub image_field: String,
}

impl From<RowViewModel> for RowView {
    fn from(row: RowViewModel) -> Self {
        let id = row.variation_id;
        Self {
            variation_id: id.to_string(),
            label: row.label,
            image_url: row.image_url,
            image_id: row.image_id.map(|id| id.to_string()).unwrap_or_default(),
            sku: row.sku,
            price: row.price,
            sku_field: format!("{SKU_FIELD_PREFIX}{id}"),
            price_field: format!("{PRICE_FIELD_PREFIX}{id}"),
            image_field: format!("{IMAGE_FIELD_PREFIX}{id}"),
        }
    }
}

/// Variation grid page template.
#[derive(Template, WebTemplate)]
#[template(path = "variations/index.html")]
pub struct VariationsIndexTemplate {
    pub current_path: String,
    pub product_id: String,
    pub product_name: String,
    pub notices: Vec<Notice>,
    pub selectors: Vec<FilterSelector>,
    /// Active filter values, carried through the prefill form.
    pub criteria: Vec<(String, String)>,
    pub rows: Vec<RowView>,
    pub total: usize,
    pub sku_base: String,
    pub bulk_price: String,
    pub bulk_image: String,
    pub form_action: String,
    pub submit_marker: &'static str,
    pub product_id_param: &'static str,
    pub sku_base_param: &'static str,
    pub bulk_price_param: &'static str,
    pub bulk_image_param: &'static str,
}

/// Variation grid page handler.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let ctx = RequestContext::new(query, None);
    let product_id = match ctx.product_id() {
        Ok(id) => id,
        Err(err) => return terminal_page(err, Vec::new()),
    };
    render_grid(&state, &ctx, product_id, Vec::new()).await
}

/// Bulk save handler.
///
/// Applies the submitted edits when the submit marker is present, then
/// re-renders the grid with the outcome as notices.
#[instrument(skip(state, query, form), fields(product_id = tracing::field::Empty))]
pub async fn save(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let ctx = RequestContext::new(query, Some(form));
    let product_id = match ctx.product_id() {
        Ok(id) => id,
        Err(err) => return terminal_page(err, Vec::new()),
    };
    tracing::Span::current().record("product_id", product_id.as_i64());

    let mut notices = Vec::new();
    if let Some(edits) = ctx.bulk_edit() {
        match apply(product_id, &edits, state.catalog()).await {
            Ok(outcome) => notices.extend(Notice::for_outcome(&outcome)),
            Err(err) => return terminal_page(err, notices),
        }
    } else {
        tracing::debug!("Submission without the save marker; nothing applied");
    }

    render_grid(&state, &ctx, product_id, notices).await
}

async fn render_grid(
    state: &AppState,
    ctx: &RequestContext,
    product_id: ProductId,
    mut notices: Vec<Notice>,
) -> Result<Response, AppError> {
    let grid = match VariationGrid::load(state.catalog(), product_id, ctx).await {
        Ok(grid) => grid,
        Err(err) => return terminal_page(err, notices),
    };

    let (prefill, rejected) = ctx.prefill();
    notices.extend(
        rejected
            .iter()
            .map(|err| Notice::warning(format!("Ignored {err}"))),
    );

    let thumbnails = state.catalog().thumbnails(&grid.image_ids(&prefill)).await?;
    let media = MediaLibrary::new(state.media_base_url().cloned(), thumbnails);
    let rows = grid
        .rows(&media, &prefill)
        .into_iter()
        .map(RowView::from)
        .collect();

    let criteria: Vec<(String, String)> = grid
        .criteria
        .active()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let template = VariationsIndexTemplate {
        current_path: CURRENT_PATH.to_string(),
        product_id: product_id.to_string(),
        product_name: grid.product.name.clone(),
        notices,
        selectors: grid.selectors(),
        form_action: form_action(product_id, &criteria),
        criteria,
        rows,
        total: grid.total,
        sku_base: prefill.sku_base.unwrap_or_default(),
        bulk_price: prefill.price.unwrap_or_default(),
        bulk_image: prefill
            .image_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        submit_marker: SUBMIT_MARKER,
        product_id_param: PRODUCT_ID_PARAM,
        sku_base_param: SKU_BASE_PARAM,
        bulk_price_param: BULK_PRICE_PARAM,
        bulk_image_param: BULK_IMAGE_PARAM,
    };
    Ok(template.into_response())
}

/// Render the informational page for terminal errors; anything else is a
/// real error.
fn terminal_page(err: GridError, mut notices: Vec<Notice>) -> Result<Response, AppError> {
    let Some(notice) = Notice::for_terminal(&err) else {
        return Err(err.into());
    };
    tracing::info!(reason = %err, "Variation table unavailable for request");
    notices.push(notice);
    Ok(NoticePageTemplate {
        current_path: CURRENT_PATH.to_string(),
        notices,
    }
    .into_response())
}

/// Save target keeping the product and the active filter, but not the
/// prefill parameters.
fn form_action(product_id: ProductId, criteria: &[(String, String)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair(PRODUCT_ID_PARAM, &product_id.to_string());
    for (name, value) in criteria {
        query.append_pair(name, value);
    }
    format!("{CURRENT_PATH}?{}", query.finish())
}
