//! Map interaction session: clicks, area selection, and model assignment
//! routed into one placement store.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{AppConfig, ConfigError};
use crate::error::{Error, Result};
use crate::geo::{self, GeoBox, GeoPoint, ReferenceZone};
use crate::interaction::ClickTarget;
use crate::interaction::debounce::ClickDebouncer;
use crate::interaction::selector::{AreaSelector, SelectorEvent};
use crate::placement::{PlacementId, PlacementStore, Toggle};
use crate::service::{self, PlacementGenerator};
use crate::turbine::TurbineCatalog;

/// Outcome of a placement-mode map click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementClick {
    Debounced,
    /// Click fell outside the configured region and was dropped.
    OutsideRegion,
    Toggled(Toggle),
}

/// Owns the placement store and the click gates in front of it.
#[derive(Debug, Clone)]
pub struct MapSession {
    store: PlacementStore,
    placement_gate: ClickDebouncer,
    selector: AreaSelector,
    region: Option<GeoBox>,
    catalog: TurbineCatalog,
    zones: Vec<ReferenceZone>,
    /// Timestamp source for replayed clicks.
    replay_clock: Duration,
}

impl MapSession {
    /// Creates a session with an empty selection.
    ///
    /// # Arguments
    ///
    /// * `store` - Placement store, usually empty
    /// * `placement_debounce` - Minimum gap between admitted placement clicks
    /// * `area_debounce` - Minimum gap between admitted area corner clicks
    /// * `region` - Area placement clicks must land in; `None` accepts all
    /// * `catalog` - Models that may be assigned to placements
    pub fn new(
        store: PlacementStore,
        placement_debounce: Duration,
        area_debounce: Duration,
        region: Option<GeoBox>,
        catalog: TurbineCatalog,
    ) -> Self {
        Self {
            store,
            placement_gate: ClickDebouncer::new(placement_debounce),
            selector: AreaSelector::new(area_debounce),
            region,
            catalog,
            zones: geo::nova_scotia_banks(),
            replay_clock: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let i = &config.interaction;
        Self::new(
            PlacementStore::with_tolerance(i.proximity_tolerance_deg),
            i.placement_debounce(),
            i.area_debounce(),
            config.click_region(),
            config.catalog(),
        )
    }

    /// Replaces the reference zones used by [`MapSession::zones_at`].
    pub fn with_zones(mut self, zones: Vec<ReferenceZone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PlacementStore {
        &mut self.store
    }

    pub fn catalog(&self) -> &TurbineCatalog {
        &self.catalog
    }

    pub fn selector(&self) -> &AreaSelector {
        &self.selector
    }

    /// Placement-mode click at `now`: toggles a placement unless debounced
    /// or outside the region.
    pub fn click_placement(&mut self, point: GeoPoint, now: Duration) -> PlacementClick {
        if !self.placement_gate.admit(now) {
            debug!(?point, "placement click debounced");
            return PlacementClick::Debounced;
        }
        if self.region.is_some_and(|r| !r.contains(&point)) {
            debug!(?point, "placement click outside region");
            return PlacementClick::OutsideRegion;
        }
        PlacementClick::Toggled(self.store.toggle_at(point))
    }

    /// Area-mode click. Overlay clicks are left to [`MapSession::clear_area`].
    pub fn click_area(
        &mut self,
        target: ClickTarget,
        point: GeoPoint,
        now: Duration,
    ) -> SelectorEvent {
        let event = self.selector.click(target, point, now);
        if let SelectorEvent::Completed(area) = event {
            let estimate = area.approx_area_km2();
            info!(area_km2 = estimate.area_km2, "area selected");
        }
        event
    }

    /// Deletes the confirmed area.
    pub fn clear_area(&mut self) -> Option<GeoBox> {
        self.selector.clear_selection()
    }

    /// Assigns a catalog model to a placement, or clears it with `None`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a key the catalog does not know,
    /// [`Error::NotFound`] for an unknown placement.
    pub fn set_type(&mut self, id: PlacementId, key: Option<&str>) -> Result<()> {
        self.check_model(key)?;
        self.store.set_type(id, key.map(str::to_string))
    }

    fn check_model(&self, key: Option<&str>) -> Result<()> {
        match key.filter(|k| !self.catalog.contains(k)) {
            Some(key) => Err(Error::Validation(format!(
                "unknown turbine model \"{key}\""
            ))),
            None => Ok(()),
        }
    }

    /// Reference zones the placement lies in.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown placement.
    pub fn zones_at(&self, id: PlacementId) -> Result<Vec<&ReferenceZone>> {
        let placement = self.store.get(id).ok_or(Error::NotFound(id))?;
        Ok(geo::zones_containing(&placement.point(), &self.zones))
    }

    /// Fills the confirmed area with `count` generated placements, each
    /// assigned `model` when one is given.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] without a confirmed area, for `count == 0` or
    /// for a model the catalog does not know (checked before any request),
    /// [`Error::Service`] if generation fails (the store is left untouched).
    pub fn generate_in_selection<G: PlacementGenerator>(
        &mut self,
        generator: &G,
        count: u32,
        model: Option<&str>,
    ) -> Result<Vec<PlacementId>> {
        self.check_model(model)?;
        let area = self
            .selector
            .selection()
            .ok_or_else(|| Error::Validation("no area selected".to_string()))?;
        let added = service::generate_placements(generator, &mut self.store, &area, count)?;
        for &id in &added {
            self.store.set_type(id, model.map(str::to_string))?;
        }
        Ok(added)
    }

    /// Confirms `area` by replaying clicks on its two corners.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the clicks did not complete a box.
    pub fn select_area(&mut self, area: GeoBox) -> Result<GeoBox> {
        let now = self.tick();
        self.click_area(ClickTarget::BaseMap, area.sw(), now);
        let now = self.tick();
        match self.click_area(ClickTarget::BaseMap, area.ne(), now) {
            SelectorEvent::Completed(selected) => Ok(selected),
            other => Err(Error::Validation(format!(
                "area selection did not complete: {other:?}"
            ))),
        }
    }

    /// Next replay timestamp, spaced past both debounce windows.
    fn tick(&mut self) -> Duration {
        let now = self.replay_clock;
        self.replay_clock += self
            .placement_gate
            .window()
            .max(self.selector.debounce_window());
        now
    }

    /// Replays recorded site clicks, spacing them past the debounce window.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if a site names an unknown model.
    pub fn replay(&mut self, sites: &SiteList) -> Result<Vec<PlacementClick>> {
        let mut clicks = Vec::with_capacity(sites.sites.len());
        for site in &sites.sites {
            let now = self.tick();
            let click = self.click_placement(site.point(), now);
            if let PlacementClick::Toggled(Toggle::Added(id)) = click {
                self.set_type(id, site.model.as_deref())?;
            }
            clicks.push(click);
        }
        Ok(clicks)
    }
}

/// One recorded placement click.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Site {
    pub lat: f64,
    pub lng: f64,
    /// Turbine model key assigned after the click adds a placement.
    #[serde(default)]
    pub model: Option<String>,
}

impl Site {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Ordered list of recorded clicks, loaded from `[[sites]]` TOML tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteList {
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl SiteList {
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "sites".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "sites".to_string(),
            message: e.to_string(),
        })
    }
}
