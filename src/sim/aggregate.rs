//! Post-hoc reduction of placement results into summaries and time series.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::placement::{Placement, PlacementId};

/// Default energy sale price ($/MWh).
pub const DEFAULT_PRICE_PER_MWH: f64 = 50.0;

/// Energy and revenue for one placement or a set of placements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_energy_mwh: f64,
    /// `total_energy_mwh * price_per_mwh`.
    pub revenue: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Energy generated: {:.2} MWh | Potential revenue: ${:.2}",
            self.total_energy_mwh, self.revenue
        )
    }
}

/// One hour of a placement's simulated output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Simulated day's date combined with the hour.
    pub timestamp: NaiveDateTime,
    pub energy_mwh: f64,
    pub wind_speed_ms: f64,
}

/// Computes summaries and series from placements.
///
/// Placements without a successful result contribute zero to every
/// aggregate and are absent from series output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultAggregator {
    price_per_mwh: f64,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_PER_MWH)
    }
}

impl ResultAggregator {
    pub fn new(price_per_mwh: f64) -> Self {
        Self { price_per_mwh }
    }

    pub fn price_per_mwh(&self) -> f64 {
        self.price_per_mwh
    }

    fn priced(&self, total_energy_mwh: f64) -> Summary {
        Summary {
            total_energy_mwh,
            revenue: total_energy_mwh * self.price_per_mwh,
        }
    }

    /// Summary for one placement, or `None` without a successful result.
    pub fn summary(&self, placement: &Placement) -> Option<Summary> {
        placement
            .result
            .as_ref()
            .and_then(|r| r.as_success())
            .map(|output| self.priced(output.resolved_total_mwh()))
    }

    /// Sum over all placements, counting failed or missing results as zero.
    pub fn aggregate_summary(&self, placements: &[Placement]) -> Summary {
        let total = placements
            .iter()
            .filter_map(|p| self.summary(p))
            .map(|s| s.total_energy_mwh)
            .sum();
        self.priced(total)
    }

    /// Flattens a placement's daily/hourly output into one series, in the
    /// order the service reported it.
    pub fn hourly_series(placement: &Placement) -> Vec<SeriesPoint> {
        let Some(output) = placement.result.as_ref().and_then(|r| r.as_success()) else {
            return Vec::new();
        };
        output
            .daily_energies
            .iter()
            .flat_map(|day| {
                day.hourly_energies.iter().map(move |h| SeriesPoint {
                    timestamp: day.timestamp(h),
                    energy_mwh: h.energy_mwh,
                    wind_speed_ms: h.predicted_wind_speed_ms,
                })
            })
            .collect()
    }

    /// Series per placement with a successful result, keyed by id.
    ///
    /// Ids are allocated in insertion order, so iteration follows placement
    /// order. Timestamps are not deduplicated across placements.
    pub fn comparison_series(placements: &[Placement]) -> BTreeMap<PlacementId, Vec<SeriesPoint>> {
        placements
            .iter()
            .filter(|p| p.result.as_ref().is_some_and(|r| r.is_success()))
            .map(|p| (p.id, Self::hourly_series(p)))
            .collect()
    }
}
