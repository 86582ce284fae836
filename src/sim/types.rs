//! Simulation result types attached to placements.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::turbine::TurbineModel;

/// Energy produced in one hour of a simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEnergy {
    /// Start of the hour.
    pub hour: NaiveTime,
    pub energy_mwh: f64,
    /// Wind speed predicted for the hour (m/s).
    pub predicted_wind_speed_ms: f64,
}

/// One simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    pub hourly_energies: Vec<HourlyEnergy>,
    /// Day total as reported by the service, if it reported one.
    pub daily_total_energy_mwh: Option<f64>,
}

impl DailyEnergy {
    /// The reported day total, or the sum of the hourly entries.
    pub fn total_energy_mwh(&self) -> f64 {
        self.daily_total_energy_mwh
            .unwrap_or_else(|| self.hourly_energies.iter().map(|h| h.energy_mwh).sum())
    }

    /// Timestamp for an hourly entry of this day.
    pub fn timestamp(&self, hourly: &HourlyEnergy) -> NaiveDateTime {
        self.date.and_time(hourly.hour)
    }
}

/// Successful yield simulation for one placement, merged with the model it
/// was run for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub daily_energies: Vec<DailyEnergy>,
    /// Run total as reported by the service, if it reported one.
    pub total_energy_mwh: Option<f64>,
    pub model: TurbineModel,
}

impl SimulationOutput {
    /// Most specific total available: the reported run total, else the sum
    /// of day totals (each falling back to its hourly sum).
    pub fn resolved_total_mwh(&self) -> f64 {
        self.total_energy_mwh.unwrap_or_else(|| {
            self.daily_energies
                .iter()
                .map(DailyEnergy::total_energy_mwh)
                .sum()
        })
    }
}

/// Outcome of the latest simulation run for a placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimulationResult {
    Success(SimulationOutput),
    Failure { error: String },
}

impl SimulationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    pub fn as_success(&self) -> Option<&SimulationOutput> {
        match self {
            Self::Success(output) => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
