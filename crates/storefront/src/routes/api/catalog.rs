//! Catalog endpoint.

use axum::{
    Json,
    extract::State,
    http::header::CACHE_CONTROL,
    response::IntoResponse,
};

use crate::error::Result;
use crate::state::AppState;

/// The product catalog as a JSON array.
///
/// GET /api/catalog
///
/// # Errors
///
/// 500 if the catalog file cannot be read or parsed.
pub async fn catalog(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let catalog = state.catalog().catalog().await?;

    Ok((
        [(CACHE_CONTROL, "public, max-age=60")],
        Json(catalog.products().to_vec()),
    ))
}
