//! External HTTP collaborators: the yield simulator and the placement
//! generator.
//!
//! The orchestration code only sees the [`YieldService`] and
//! [`PlacementGenerator`] traits; [`http::HttpServiceClient`] is the
//! production implementation.

pub mod http;
mod wire;

use tracing::{info, warn};

use crate::error::{Error, Result, ServiceError};
use crate::geo::{GeoBox, GeoPoint};
use crate::placement::{PlacementId, PlacementStore};
use crate::sim::period::SimulationPeriod;
use crate::sim::types::DailyEnergy;
use crate::turbine::TurbineModel;

/// One yield simulation request: a site, a turbine power curve, and a period.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldRequest {
    pub cut_in: f64,
    pub rated: f64,
    pub cut_out: f64,
    /// Rated power (kW).
    pub rated_power: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub period: SimulationPeriod,
}

impl YieldRequest {
    pub fn new(model: &TurbineModel, site: GeoPoint, period: SimulationPeriod) -> Self {
        Self {
            cut_in: model.cut_in,
            rated: model.rated,
            cut_out: model.cut_out,
            rated_power: model.rated_power_kw,
            latitude: site.lat,
            longitude: site.lng,
            period,
        }
    }
}

/// Service payload of a successful yield simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldReport {
    pub daily_energies: Vec<DailyEnergy>,
    pub total_energy_mwh: Option<f64>,
}

/// Turns a site + turbine + period into hourly and daily energy output.
pub trait YieldService {
    /// # Errors
    ///
    /// Returns a [`ServiceError`] on transport failure, non-2xx status, or a
    /// body without the expected shape.
    fn simulate(&self, request: &YieldRequest) -> Result<YieldReport, ServiceError>;
}

/// Proposes turbine sites inside a bounding box.
pub trait PlacementGenerator {
    /// Requests `count` points inside `area`.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] on transport failure, non-2xx status, a
    /// malformed body, or a response whose status is not `"success"`.
    fn generate(&self, area: &GeoBox, count: u32) -> Result<Vec<GeoPoint>, ServiceError>;
}

impl<T: YieldService + ?Sized> YieldService for &T {
    fn simulate(&self, request: &YieldRequest) -> Result<YieldReport, ServiceError> {
        (**self).simulate(request)
    }
}

impl<T: PlacementGenerator + ?Sized> PlacementGenerator for &T {
    fn generate(&self, area: &GeoBox, count: u32) -> Result<Vec<GeoPoint>, ServiceError> {
        (**self).generate(area, count)
    }
}

/// Fills `area` with generated placements.
///
/// The request is all-or-nothing: on failure the store is left untouched.
/// Points within proximity tolerance of an existing placement are skipped.
///
/// # Arguments
///
/// * `generator` - Placement generation service
/// * `store` - Store receiving the new untyped placements
/// * `area` - Box the points must fall in
/// * `count` - Number of points to request (must be > 0)
///
/// # Returns
///
/// Ids of the placements actually added, in service order.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `count` is zero, or [`Error::Service`]
/// if the generator fails.
pub fn generate_placements<G: PlacementGenerator>(
    generator: &G,
    store: &mut PlacementStore,
    area: &GeoBox,
    count: u32,
) -> Result<Vec<PlacementId>> {
    if count == 0 {
        return Err(Error::Validation(
            "requested placement count must be > 0".to_string(),
        ));
    }

    info!(count, sw = ?area.sw(), ne = ?area.ne(), "requesting generated placements");
    let points = generator.generate(area, count).map_err(|err| {
        warn!(%err, "placement generation failed");
        Error::Service(err)
    })?;

    let added = store.add_points(&points);
    info!(
        returned = points.len(),
        added = added.len(),
        "generated placements added"
    );
    Ok(added)
}
