//! AI recommendations API endpoint.
//!
//! This endpoint never returns an error status: any failure in the pipeline
//! is served as the default payload with HTTP 200.

use api_types::recommendation::RecommendationResponse;
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{server::ServerState, user};

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Json<RecommendationResponse> {
    let report = match state.engine.recommendations(&user.email, Utc::now()).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("recommendation pipeline failed: {err}");
            engine::advisor::default_report()
        }
    };

    Json(RecommendationResponse {
        recommendations: report.recommendations,
        summary: report.summary,
    })
}
