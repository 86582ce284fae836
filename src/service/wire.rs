//! JSON request and response bodies exchanged with the external services.
//!
//! Field names follow the services' contract, including their unit-suffixed
//! casing (`total_energy_MWh`, `predicted_wind_speed_m_s`).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{YieldReport, YieldRequest};
use crate::error::ServiceError;
use crate::geo::{GeoBox, GeoPoint};
use crate::sim::period::SimulationPeriod;
use crate::sim::types::{DailyEnergy, HourlyEnergy};

/// Message used when a non-2xx body carries no `error` field.
pub(crate) const DEFAULT_FAILURE_MESSAGE: &str = "API request failed";

#[derive(Debug, Serialize)]
pub(crate) struct YieldRequestBody {
    cut_in: f64,
    rated: f64,
    cut_out: f64,
    rated_power: f64,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

impl From<&YieldRequest> for YieldRequestBody {
    fn from(r: &YieldRequest) -> Self {
        let (start_date, end_date, days) = match r.period {
            SimulationPeriod::DateRange { start, end } => (
                Some(start.format("%Y-%m-%d").to_string()),
                Some(end.format("%Y-%m-%d").to_string()),
                None,
            ),
            SimulationPeriod::Days(days) => (None, None, Some(days)),
        };
        Self {
            cut_in: r.cut_in,
            rated: r.rated,
            cut_out: r.cut_out,
            rated_power: r.rated_power,
            latitude: r.latitude,
            longitude: r.longitude,
            start_date,
            end_date,
            days,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct YieldResponseBody {
    #[serde(default)]
    daily_energies: Option<Vec<DayBody>>,
    #[serde(default, rename = "total_energy_MWh")]
    total_energy_mwh: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DayBody {
    date: NaiveDate,
    #[serde(default)]
    hourly_energies: Vec<HourBody>,
    #[serde(default, rename = "daily_total_energy_MWh")]
    daily_total_energy_mwh: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HourBody {
    hour: HourValue,
    #[serde(rename = "hourly_energy_MWh")]
    energy_mwh: f64,
    #[serde(rename = "predicted_wind_speed_m_s")]
    predicted_wind_speed_ms: f64,
}

/// `"HH:MM"` from current services, a bare hour index from older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HourValue {
    Index(u32),
    Text(String),
}

impl HourValue {
    fn to_time(&self) -> Option<NaiveTime> {
        match self {
            HourValue::Index(h) => NaiveTime::from_hms_opt(*h, 0, 0),
            HourValue::Text(s) => {
                let s = s.trim();
                NaiveTime::parse_from_str(s, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                    .ok()
                    .or_else(|| {
                        s.parse::<u32>()
                            .ok()
                            .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
                    })
            }
        }
    }
}

impl YieldResponseBody {
    /// Converts the body into a report.
    ///
    /// A body carrying neither `daily_energies` nor `total_energy_MWh` is
    /// malformed, as is an unparseable hour value.
    pub(crate) fn into_report(self) -> Result<YieldReport, ServiceError> {
        if self.daily_energies.is_none() && self.total_energy_mwh.is_none() {
            return Err(ServiceError::Malformed {
                message: "response has neither daily_energies nor total_energy_MWh".to_string(),
            });
        }

        let mut daily_energies = Vec::new();
        for day in self.daily_energies.unwrap_or_default() {
            let mut hourly_energies = Vec::with_capacity(day.hourly_energies.len());
            for h in day.hourly_energies {
                let hour = h.hour.to_time().ok_or_else(|| ServiceError::Malformed {
                    message: format!("invalid hour {:?} on {}", h.hour, day.date),
                })?;
                hourly_energies.push(HourlyEnergy {
                    hour,
                    energy_mwh: h.energy_mwh,
                    predicted_wind_speed_ms: h.predicted_wind_speed_ms,
                });
            }
            daily_energies.push(DailyEnergy {
                date: day.date,
                hourly_energies,
                daily_total_energy_mwh: day.daily_total_energy_mwh,
            });
        }

        Ok(YieldReport {
            daily_energies,
            total_energy_mwh: self.total_energy_mwh,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl ErrorBody {
    /// Extracts the human-readable failure message from a non-2xx body.
    pub(crate) fn message_from(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationRequestBody {
    sw_lat: f64,
    sw_lng: f64,
    ne_lat: f64,
    ne_lng: f64,
    chosen_int: u32,
}

impl GenerationRequestBody {
    pub(crate) fn new(area: &GeoBox, count: u32) -> Self {
        Self {
            sw_lat: area.sw().lat,
            sw_lng: area.sw().lng,
            ne_lat: area.ne().lat,
            ne_lng: area.ne().lng,
            chosen_int: count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerationResponseBody {
    status: String,
    #[serde(default)]
    points: Vec<GeoPoint>,
    #[serde(default)]
    message: Option<String>,
}

impl GenerationResponseBody {
    pub(crate) fn into_points(self) -> Result<Vec<GeoPoint>, ServiceError> {
        if self.status == "success" {
            Ok(self.points)
        } else {
            Err(ServiceError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| format!("generation status \"{}\"", self.status)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::turbine::TurbineCatalog;

    fn parse(value: serde_json::Value) -> Result<YieldReport, ServiceError> {
        let body: YieldResponseBody =
            serde_json::from_value(value).map_err(|e| ServiceError::Decode {
                message: e.to_string(),
            })?;
        body.into_report()
    }

    #[test]
    fn date_range_request_uses_iso_dates() {
        let catalog = TurbineCatalog::builtin();
        let model = catalog.get("SWT-7.0-154").expect("builtin model");
        let period = SimulationPeriod::DateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap_or_default(),
        };
        let req = YieldRequest::new(model, GeoPoint::new(45.0, -63.0), period);
        let body = serde_json::to_value(YieldRequestBody::from(&req)).expect("serializes");
        assert_eq!(
            body,
            json!({
                "cut_in": 3.0,
                "rated": 13.0,
                "cut_out": 25.0,
                "rated_power": 7000.0,
                "latitude": 45.0,
                "longitude": -63.0,
                "start_date": "2025-03-01",
                "end_date": "2025-03-07"
            })
        );
    }

    #[test]
    fn day_count_request_omits_dates() {
        let catalog = TurbineCatalog::builtin();
        let model = catalog.get("SG 14-222 DD").expect("builtin model");
        let req = YieldRequest::new(model, GeoPoint::new(44.0, -62.0), SimulationPeriod::Days(3));
        let body = serde_json::to_value(YieldRequestBody::from(&req)).expect("serializes");
        assert_eq!(body["days"], 3);
        assert!(body.get("start_date").is_none());
        assert!(body.get("end_date").is_none());
    }

    #[test]
    fn full_response_parses_hours_and_totals() {
        let report = parse(json!({
            "total_energy_MWh": 12.5,
            "num_days": 1,
            "daily_energies": [{
                "date": "2025-03-01",
                "daily_total_energy_MWh": 12.5,
                "hourly_energies": [
                    {"hour": "00:00", "hourly_energy_MWh": 0.5, "predicted_wind_speed_m_s": 6.1},
                    {"hour": "01:00", "hourly_energy_MWh": 0.7, "predicted_wind_speed_m_s": 6.8}
                ]
            }]
        }))
        .expect("valid body");
        assert_eq!(report.total_energy_mwh, Some(12.5));
        let day = &report.daily_energies[0];
        assert_eq!(day.hourly_energies.len(), 2);
        assert_eq!(
            day.hourly_energies[1].hour,
            NaiveTime::from_hms_opt(1, 0, 0).unwrap_or_default()
        );
    }

    #[test]
    fn integer_hours_are_accepted() {
        let report = parse(json!({
            "daily_energies": [{
                "date": "2025-03-01",
                "hourly_energies": [
                    {"hour": 13, "hourly_energy_MWh": 1.0, "predicted_wind_speed_m_s": 9.0}
                ]
            }]
        }))
        .expect("valid body");
        assert_eq!(
            report.daily_energies[0].hourly_energies[0].hour,
            NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default()
        );
    }

    #[test]
    fn total_only_response_is_valid() {
        let report = parse(json!({ "total_energy_MWh": 100 })).expect("valid body");
        assert!(report.daily_energies.is_empty());
        assert_eq!(report.total_energy_mwh, Some(100.0));
    }

    #[test]
    fn empty_object_is_malformed() {
        assert!(matches!(
            parse(json!({})),
            Err(ServiceError::Malformed { .. })
        ));
    }

    #[test]
    fn bad_hour_is_malformed() {
        let err = parse(json!({
            "daily_energies": [{
                "date": "2025-03-01",
                "hourly_energies": [
                    {"hour": "noon", "hourly_energy_MWh": 1.0, "predicted_wind_speed_m_s": 9.0}
                ]
            }]
        }));
        assert!(matches!(err, Err(ServiceError::Malformed { .. })));
    }

    #[test]
    fn error_body_message_extraction() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error": "Missing required fields"}"#),
            "Missing required fields"
        );
        assert_eq!(
            ErrorBody::message_from("<html>oops</html>"),
            DEFAULT_FAILURE_MESSAGE
        );
        assert_eq!(
            ErrorBody::message_from(r#"{"error": ""}"#),
            DEFAULT_FAILURE_MESSAGE
        );
    }

    #[test]
    fn generation_status_other_than_success_is_rejected() {
        let ok: GenerationResponseBody = serde_json::from_value(json!({
            "status": "success",
            "points": [{"lat": 44.1, "lng": -63.2}]
        }))
        .expect("valid body");
        assert_eq!(
            ok.into_points().ok(),
            Some(vec![GeoPoint::new(44.1, -63.2)])
        );

        let rejected: GenerationResponseBody = serde_json::from_value(json!({
            "status": "error",
            "message": "area is on land"
        }))
        .expect("valid body");
        assert_eq!(
            rejected.into_points(),
            Err(ServiceError::Rejected {
                message: "area is on land".to_string()
            })
        );
    }

    #[test]
    fn generation_request_uses_normalized_corners() {
        let area = GeoBox::from_corners(GeoPoint::new(45.0, -62.0), GeoPoint::new(44.0, -63.0));
        let body = serde_json::to_value(GenerationRequestBody::new(&area, 5)).expect("serializes");
        assert_eq!(
            body,
            json!({
                "sw_lat": 44.0,
                "sw_lng": -63.0,
                "ne_lat": 45.0,
                "ne_lng": -62.0,
                "chosen_int": 5
            })
        );
    }
}
