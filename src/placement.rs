//! The ordered, deduplicated collection of candidate turbine sites.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::sim::types::SimulationResult;

/// Per-axis distance (degrees, ~11 m) under which a click refers to an
/// existing placement.
pub const PROXIMITY_TOLERANCE_DEG: f64 = 0.0001;

/// Identifier unique for the lifetime of one [`PlacementStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlacementId(u64);

impl PlacementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A candidate turbine site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: PlacementId,
    pub lat: f64,
    pub lng: f64,
    /// Key into the turbine catalog; `None` until the user picks a model.
    pub turbine_type: Option<String>,
    /// Outcome of the most recent simulation run for this site.
    pub result: Option<SimulationResult>,
}

impl Placement {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Result of [`PlacementStore::toggle_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added(PlacementId),
    Removed(PlacementId),
}

/// Single source of truth for placements.
///
/// Callers mutate placements only through the store's operations, which keep
/// ids unique and keep any two placements at least `tolerance` apart on
/// some axis.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    placements: Vec<Placement>,
    next_id: u64,
    tolerance: f64,
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::with_tolerance(PROXIMITY_TOLERANCE_DEG)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            placements: Vec::new(),
            next_id: 1,
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Owned copy of the current placements for read-only consumers.
    pub fn snapshot(&self) -> Vec<Placement> {
        self.placements.clone()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// The first placement within tolerance of `point`.
    pub fn find_near(&self, point: &GeoPoint) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.point().within(point, self.tolerance))
    }

    /// Removes the placement near `point` if there is one, otherwise adds a
    /// new untyped placement there.
    ///
    /// # Returns
    ///
    /// `Toggle::Removed` with the matched id, or `Toggle::Added` with the
    /// new one.
    pub fn toggle_at(&mut self, point: GeoPoint) -> Toggle {
        if let Some(id) = self.find_near(&point).map(|p| p.id) {
            self.placements.retain(|p| p.id != id);
            return Toggle::Removed(id);
        }
        Toggle::Added(self.push(point))
    }

    /// Adds each point not within tolerance of an existing placement (or of
    /// an earlier point in the same batch). Returns the new ids in order.
    pub fn add_points(&mut self, points: &[GeoPoint]) -> Vec<PlacementId> {
        let mut added = Vec::with_capacity(points.len());
        for point in points {
            if self.find_near(point).is_none() {
                added.push(self.push(*point));
            }
        }
        added
    }

    /// Assigns (or clears, with `None`) the turbine model of a placement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not in the store.
    pub fn set_type(&mut self, id: PlacementId, turbine_type: Option<String>) -> Result<()> {
        self.get_mut(id)?.turbine_type = turbine_type.filter(|t| !t.is_empty());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not in the store.
    pub fn remove(&mut self, id: PlacementId) -> Result<Placement> {
        let idx = self
            .placements
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::NotFound(id))?;
        Ok(self.placements.remove(idx))
    }

    /// Replaces the placement's result with `result`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not in the store.
    pub fn attach_result(&mut self, id: PlacementId, result: SimulationResult) -> Result<()> {
        self.get_mut(id)?.result = Some(result);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    fn get_mut(&mut self, id: PlacementId) -> Result<&mut Placement> {
        self.placements
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn push(&mut self, point: GeoPoint) -> PlacementId {
        let id = PlacementId(self.next_id);
        self.next_id += 1;
        self.placements.push(Placement {
            id,
            lat: point.lat,
            lng: point.lng,
            turbine_type: None,
            result: None,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_empty_store() {
        let mut store = PlacementStore::new();
        let p = GeoPoint::new(45.0, -63.0);
        let first = store.toggle_at(p);
        assert!(matches!(first, Toggle::Added(_)));
        assert_eq!(store.len(), 1);

        let second = store.toggle_at(GeoPoint::new(45.00005, -63.00005));
        assert!(matches!(second, Toggle::Removed(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn click_at_tolerance_adds_a_second_placement() {
        let mut store = PlacementStore::new();
        store.toggle_at(GeoPoint::new(45.0, -63.0));
        let t = store.toggle_at(GeoPoint::new(45.0, -63.0 + 0.0002));
        assert!(matches!(t, Toggle::Added(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn click_exactly_one_tolerance_away_adds() {
        let origins = [(44.6, -63.5), (45.0, -63.0), (43.7, -61.3), (46.65, -59.51)];
        for (lat, lng) in origins {
            for (dlat, dlng) in [(0.0001, 0.0), (0.0, 0.0001), (-0.0001, 0.0), (0.0, -0.0001)] {
                let mut store = PlacementStore::new();
                store.toggle_at(GeoPoint::new(lat, lng));
                let t = store.toggle_at(GeoPoint::new(lat + dlat, lng + dlng));
                assert!(
                    matches!(t, Toggle::Added(_)),
                    "({lat}, {lng}) + ({dlat}, {dlng}) should add"
                );
            }
        }
    }

    #[test]
    fn toggle_removes_the_matching_placement_only() {
        let mut store = PlacementStore::new();
        let Toggle::Added(a) = store.toggle_at(GeoPoint::new(44.0, -63.0)) else {
            panic!("expected add");
        };
        let Toggle::Added(b) = store.toggle_at(GeoPoint::new(45.0, -63.0)) else {
            panic!("expected add");
        };
        assert_eq!(
            store.toggle_at(GeoPoint::new(44.0, -63.0)),
            Toggle::Removed(a)
        );
        assert_eq!(store.placements().len(), 1);
        assert_eq!(store.placements()[0].id, b);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = PlacementStore::new();
        let p = GeoPoint::new(45.0, -63.0);
        let Toggle::Added(first) = store.toggle_at(p) else {
            panic!("expected add");
        };
        store.toggle_at(p);
        let Toggle::Added(second) = store.toggle_at(p) else {
            panic!("expected add");
        };
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = PlacementStore::new();
        let missing = PlacementId::new(99);
        assert!(matches!(
            store.set_type(missing, Some("SWT-7.0-154".to_string())),
            Err(Error::NotFound(id)) if id == missing
        ));
        assert!(matches!(store.remove(missing), Err(Error::NotFound(_))));
        assert!(matches!(
            store.attach_result(missing, SimulationResult::failure("x")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn set_type_and_attach_result_mutate_in_place() {
        let mut store = PlacementStore::new();
        let Toggle::Added(id) = store.toggle_at(GeoPoint::new(45.0, -63.0)) else {
            panic!("expected add");
        };
        store
            .set_type(id, Some("SG 14-222 DD".to_string()))
            .expect("placement exists");
        store
            .attach_result(id, SimulationResult::failure("first"))
            .expect("placement exists");
        store
            .attach_result(id, SimulationResult::failure("second"))
            .expect("placement exists");

        let p = store.get(id).expect("placement exists");
        assert_eq!(p.turbine_type.as_deref(), Some("SG 14-222 DD"));
        assert_eq!(p.result, Some(SimulationResult::failure("second")));

        store.set_type(id, Some(String::new())).expect("placement exists");
        assert_eq!(store.get(id).and_then(|p| p.turbine_type.clone()), None);
    }

    #[test]
    fn add_points_skips_near_duplicates() {
        let mut store = PlacementStore::new();
        store.toggle_at(GeoPoint::new(45.0, -63.0));
        let added = store.add_points(&[
            GeoPoint::new(45.00001, -63.00001),
            GeoPoint::new(45.5, -62.5),
            GeoPoint::new(45.50001, -62.5),
        ]);
        assert_eq!(added.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = PlacementStore::new();
        store.toggle_at(GeoPoint::new(45.0, -63.0));
        store.toggle_at(GeoPoint::new(46.0, -63.0));
        store.clear();
        assert!(store.is_empty());
    }
}
