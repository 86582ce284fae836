//! Sequential per-placement yield simulation with failure isolation.

use tracing::{debug, info, warn};

use super::period::SimulationPeriod;
use super::types::{SimulationOutput, SimulationResult};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::placement::{Placement, PlacementId, PlacementStore};
use crate::service::{YieldRequest, YieldService};
use crate::turbine::{TurbineCatalog, TurbineModel};

/// Receives progress from an orchestrator run.
///
/// Both methods default to no-ops so callers only implement what they show.
pub trait RunObserver {
    /// Called once per placement whose simulation failed, with the
    /// human-readable message that was stored as its result.
    fn placement_failed(&mut self, _id: PlacementId, _message: &str) {}

    /// Called exactly once when the run finishes, with the updated
    /// placements. `present_results` is true if any call was attempted.
    fn run_completed(&mut self, _placements: &[Placement], _present_results: bool) {}
}

impl RunObserver for () {}

/// Summary of one orchestrator run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Number of service calls made.
    pub attempted: usize,
    /// Placements that received a successful result, in call order.
    pub succeeded: Vec<PlacementId>,
    /// Placements that received a failure result, with the message.
    pub failed: Vec<(PlacementId, String)>,
    /// Placements without a (known) turbine model; their results are untouched.
    pub skipped: Vec<PlacementId>,
}

impl RunOutcome {
    pub fn present_results(&self) -> bool {
        self.attempted > 0
    }

    /// [`Error::PartialFailure`] if some, but not all, attempted placements
    /// failed.
    pub fn partial_failure(&self) -> Option<Error> {
        if self.failed.is_empty() || self.succeeded.is_empty() {
            return None;
        }
        Some(Error::PartialFailure {
            failed: self.failed.clone(),
            attempted: self.attempted,
        })
    }
}

/// One eligible placement captured at run start.
struct PlannedCall {
    id: PlacementId,
    site: GeoPoint,
    model: TurbineModel,
}

/// Drives the yield service once per typed placement, in store order.
///
/// Calls are strictly sequential: the next placement is only attempted after
/// the previous call has settled. A failing call never aborts the run; its
/// error becomes that placement's result.
pub struct Orchestrator<S: YieldService> {
    service: S,
    catalog: TurbineCatalog,
}

impl<S: YieldService> Orchestrator<S> {
    pub fn new(service: S, catalog: TurbineCatalog) -> Self {
        Self { service, catalog }
    }

    pub fn catalog(&self) -> &TurbineCatalog {
        &self.catalog
    }

    /// Simulates every placement with an assigned turbine model.
    ///
    /// Eligible placements are snapshotted at run start and results are
    /// attached by id.
    ///
    /// # Arguments
    ///
    /// * `store` - Placements to simulate; results are written back here
    /// * `period` - Date range sent with every request
    /// * `observer` - Notified of each failure and of run completion
    ///
    /// # Returns
    ///
    /// Counts of attempted calls plus the skipped and failed placement ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `period` is invalid; no call is made
    /// in that case. Service failures are never returned from here.
    pub fn run<O>(
        &self,
        store: &mut PlacementStore,
        period: &SimulationPeriod,
        observer: &mut O,
    ) -> Result<RunOutcome>
    where
        O: RunObserver + ?Sized,
    {
        period.validate()?;

        let mut outcome = RunOutcome::default();
        let plan = self.plan(store, &mut outcome.skipped);
        info!(
            eligible = plan.len(),
            skipped = outcome.skipped.len(),
            days = period.num_days(),
            "starting simulation run"
        );

        for call in plan {
            let request = YieldRequest::new(&call.model, call.site, *period);
            debug!(
                id = %call.id,
                lat = call.site.lat,
                lng = call.site.lng,
                model = %call.model.key,
                "simulating placement"
            );
            outcome.attempted += 1;

            let result = match self.service.simulate(&request) {
                Ok(report) => SimulationResult::Success(SimulationOutput {
                    daily_energies: report.daily_energies,
                    total_energy_mwh: report.total_energy_mwh,
                    model: call.model,
                }),
                Err(err) => {
                    let message = err.to_string();
                    warn!(id = %call.id, %message, "simulation failed");
                    observer.placement_failed(call.id, &message);
                    SimulationResult::failure(message)
                }
            };

            let failure = result.error().map(str::to_string);
            if let Err(err) = store.attach_result(call.id, result) {
                warn!(%err, "placement vanished during run; result dropped");
                continue;
            }
            match failure {
                None => outcome.succeeded.push(call.id),
                Some(message) => outcome.failed.push((call.id, message)),
            }
        }

        info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "simulation run complete"
        );
        observer.run_completed(store.placements(), outcome.present_results());
        Ok(outcome)
    }

    fn plan(&self, store: &PlacementStore, skipped: &mut Vec<PlacementId>) -> Vec<PlannedCall> {
        let mut plan = Vec::new();
        for p in store.placements() {
            match p.turbine_type.as_deref().and_then(|key| self.catalog.get(key)) {
                Some(model) => plan.push(PlannedCall {
                    id: p.id,
                    site: p.point(),
                    model: model.clone(),
                }),
                None => skipped.push(p.id),
            }
        }
        plan
    }
}
