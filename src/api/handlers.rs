//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, PlacementRecord, SeriesEntry, SummaryResponse};
use crate::placement::PlacementId;
use crate::sim::aggregate::ResultAggregator;

/// `GET /placements` → 200 + `Vec<PlacementRecord>` JSON, in store order.
pub async fn list_placements(State(state): State<Arc<AppState>>) -> Json<Vec<PlacementRecord>> {
    Json(
        state
            .placements
            .iter()
            .map(|p| PlacementRecord::new(p, &state.aggregator))
            .collect(),
    )
}

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let total = state.aggregator.aggregate_summary(&state.placements);
    let count = |success: bool| {
        state
            .placements
            .iter()
            .filter_map(|p| p.result.as_ref())
            .filter(|r| r.is_success() == success)
            .count()
    };

    Json(SummaryResponse {
        placements: state.placements.len(),
        succeeded: count(true),
        failed: count(false),
        price_per_mwh: state.aggregator.price_per_mwh(),
        total_energy_mwh: total.total_energy_mwh,
        revenue: total.revenue,
    })
}

/// Returns the hourly series of one placement.
///
/// `GET /placements/{id}/series` → 200 + `Vec<SeriesPoint>` JSON
/// (empty without a successful result), 404 + `ErrorResponse` for an
/// unknown id.
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let id = PlacementId::new(id);
    let Some(placement) = state.placements.iter().find(|p| p.id == id) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("placement {id} not found"),
            }),
        ));
    };
    Ok(Json(ResultAggregator::hourly_series(placement)))
}

/// `GET /comparison` → 200 + `Vec<SeriesEntry>` JSON, successful placements only.
pub async fn get_comparison(State(state): State<Arc<AppState>>) -> Json<Vec<SeriesEntry>> {
    let mut series = ResultAggregator::comparison_series(&state.placements);
    let entries = state
        .placements
        .iter()
        .filter_map(|p| {
            series.remove(&p.id).map(|series| SeriesEntry {
                id: p.id,
                turbine_type: p.turbine_type.clone(),
                series,
            })
        })
        .collect();
    Json(entries)
}
