//! Catalog route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use tannenbaum_core::Catalog;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Serve the normalized vendor catalog.
///
/// The heavy lifting (fetch, filter, coerce) lives in the Square client and
/// the normalizer; this handler only maps errors onto the public contract.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<Catalog>> {
    let catalog = state
        .square()
        .catalog(state.store())
        .await
        .map_err(AppError::Catalog)?;

    Ok(Json((*catalog).clone()))
}
