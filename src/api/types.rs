//! API response types.

use serde::Serialize;

use crate::placement::{Placement, PlacementId};
use crate::sim::aggregate::{ResultAggregator, SeriesPoint, Summary};
use crate::sim::types::SimulationResult;

/// Simulation state of one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// No simulation has been attempted.
    Pending,
    Success,
    Failure,
}

/// One placement as listed by `GET /placements`.
#[derive(Debug, Serialize)]
pub struct PlacementRecord {
    pub id: PlacementId,
    pub lat: f64,
    pub lng: f64,
    pub turbine_type: Option<String>,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlacementRecord {
    pub fn new(p: &Placement, aggregator: &ResultAggregator) -> Self {
        let status = match &p.result {
            None => ResultStatus::Pending,
            Some(SimulationResult::Success(_)) => ResultStatus::Success,
            Some(SimulationResult::Failure { .. }) => ResultStatus::Failure,
        };
        Self {
            id: p.id,
            lat: p.lat,
            lng: p.lng,
            turbine_type: p.turbine_type.clone(),
            status,
            summary: aggregator.summary(p),
            error: p.result.as_ref().and_then(|r| r.error()).map(str::to_string),
        }
    }
}

/// Aggregate over all placements, `GET /summary`.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub placements: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub price_per_mwh: f64,
    pub total_energy_mwh: f64,
    pub revenue: f64,
}

/// One placement's series in `GET /comparison`.
#[derive(Debug, Serialize)]
pub struct SeriesEntry {
    pub id: PlacementId,
    pub turbine_type: Option<String>,
    pub series: Vec<SeriesPoint>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::SimulationOutput;
    use crate::turbine::TurbineCatalog;

    fn placement(result: Option<SimulationResult>) -> Placement {
        Placement {
            id: PlacementId::new(7),
            lat: 44.5,
            lng: -63.0,
            turbine_type: Some("SWT-7.0-154".to_string()),
            result,
        }
    }

    #[test]
    fn record_maps_result_status() {
        let agg = ResultAggregator::default();

        let pending = PlacementRecord::new(&placement(None), &agg);
        assert_eq!(pending.status, ResultStatus::Pending);
        assert!(pending.summary.is_none());

        let failed =
            PlacementRecord::new(&placement(Some(SimulationResult::failure("boom"))), &agg);
        assert_eq!(failed.status, ResultStatus::Failure);
        assert_eq!(failed.error.as_deref(), Some("boom"));

        let ok = PlacementRecord::new(
            &placement(Some(SimulationResult::Success(SimulationOutput {
                daily_energies: vec![],
                total_energy_mwh: Some(2.0),
                model: TurbineCatalog::builtin().models()[0].clone(),
            }))),
            &agg,
        );
        assert_eq!(ok.status, ResultStatus::Success);
        assert_eq!(ok.summary.map(|s| s.revenue), Some(100.0));
    }

    #[test]
    fn record_serializes_without_empty_fields() {
        let record = PlacementRecord::new(&placement(None), &ResultAggregator::default());
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "pending");
        assert!(json.get("summary").is_none());
        assert!(json.get("error").is_none());
    }
}
