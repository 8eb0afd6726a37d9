//! HTTP request handlers

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::error::ApiError;
use super::state::AppState;
use crate::encoding::PriceCategory;
use crate::error::PipelineError;
use crate::features::ListingInput;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthcheckOutput {
    pub status: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ListingOutput {
    pub id: i64,
    pub price_category: String,
}

pub async fn health() -> HttpResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    HttpResponse::Ok().json(HealthcheckOutput {
        status: "ok".to_string(),
        timestamp,
    })
}

pub async fn inference(
    state: web::Data<AppState>,
    listing: web::Json<ListingInput>,
) -> Result<HttpResponse, ApiError> {
    let listing = listing.into_inner();
    debug!("Inference request for listing {}", listing.id);

    // Labels are checked before touching the model
    let features = listing.feature_vector()?;
    let model = state.model().await?;

    let predictions = tokio::task::spawn_blocking(move || {
        model.predict(&DenseMatrix::from_2d_vec(&vec![features]))
    })
    .await
    .map_err(PipelineError::from)?
    .map_err(|e| PipelineError::Training(e.to_string()))?;
    let raw = *predictions.first().ok_or(PipelineError::EmptyPrediction)?;
    let category = PriceCategory::from_code(i64::from(raw))?;

    info!("Listing {} classified as {}", listing.id, category);
    Ok(HttpResponse::Ok().json(ListingOutput {
        id: listing.id,
        price_category: category.label().to_string(),
    }))
}
