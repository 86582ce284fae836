//! TOML-based application configuration, presets, and reference data loading.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::geo::{GeoBox, GeoPoint, NamedPlace};
use crate::placement::PROXIMITY_TOLERANCE_DEG;
use crate::sim::aggregate::DEFAULT_PRICE_PER_MWH;
use crate::turbine::{TurbineCatalog, TurbineModel};

pub const ENV_YIELD_URL: &str = "WINDLYTICS_YIELD_URL";
pub const ENV_GENERATION_URL: &str = "WINDLYTICS_GENERATION_URL";
pub const ENV_TIMEOUT_MS: &str = "WINDLYTICS_TIMEOUT_MS";

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `nova_scotia` preset. Load from
/// TOML with [`AppConfig::from_toml_file`] or pick a preset with
/// [`AppConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// External service endpoints.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Revenue pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Map interaction tuning.
    #[serde(default)]
    pub interaction: InteractionConfig,
    /// Whether map clicks are restricted to `region`.
    #[serde(default = "default_bounded")]
    pub bounded: bool,
    /// Area accepted for map clicks while `bounded` is set.
    #[serde(default = "nova_scotia_region")]
    pub region: GeoBox,
    /// Turbine model table; empty means the built-in catalog.
    #[serde(default)]
    pub turbines: Vec<TurbineModel>,
}

/// External service endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Yield simulation endpoint.
    pub yield_url: String,
    /// Placement generation endpoint.
    pub generation_url: String,
    /// Per-request timeout in milliseconds (must be > 0).
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            yield_url: "http://127.0.0.1:5000/generated-energy".to_string(),
            generation_url: "http://127.0.0.1:5000/generate-placements".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Revenue pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Sale price per MWh (must be >= 0).
    pub price_per_mwh: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_mwh: DEFAULT_PRICE_PER_MWH,
        }
    }
}

/// Map interaction tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Debounce window for placement clicks (ms).
    pub placement_debounce_ms: u64,
    /// Debounce window for area corner clicks (ms).
    pub area_debounce_ms: u64,
    /// Per-axis degrees within which a click toggles an existing placement.
    pub proximity_tolerance_deg: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            placement_debounce_ms: 200,
            area_debounce_ms: 300,
            proximity_tolerance_deg: PROXIMITY_TOLERANCE_DEG,
        }
    }
}

impl InteractionConfig {
    pub fn placement_debounce(&self) -> Duration {
        Duration::from_millis(self.placement_debounce_ms)
    }

    pub fn area_debounce(&self) -> Duration {
        Duration::from_millis(self.area_debounce_ms)
    }
}

fn default_bounded() -> bool {
    true
}

fn nova_scotia_region() -> GeoBox {
    GeoBox::from_corners(GeoPoint::new(43.3, -66.4), GeoPoint::new(47.1, -59.6))
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"service.timeout_ms"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::nova_scotia()
    }
}

impl AppConfig {
    /// Nova Scotia region, local services, built-in turbines.
    pub fn nova_scotia() -> Self {
        Self {
            service: ServiceConfig::default(),
            pricing: PricingConfig::default(),
            interaction: InteractionConfig::default(),
            bounded: true,
            region: nova_scotia_region(),
            turbines: Vec::new(),
        }
    }

    /// Same as `nova_scotia` but accepting clicks anywhere.
    pub fn unbounded() -> Self {
        Self {
            bounded: false,
            ..Self::nova_scotia()
        }
    }

    /// The area map clicks are restricted to, if any.
    pub fn click_region(&self) -> Option<GeoBox> {
        self.bounded.then_some(self.region)
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["nova_scotia", "unbounded"];

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "nova_scotia" => Ok(Self::nova_scotia()),
            "unbounded" => Ok(Self::unbounded()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Applies service endpoint overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a timeout override is not an integer.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_with(|key| std::env::var(key).ok())
    }

    fn apply_overrides_with<F>(&mut self, mut getter: F) -> Result<(), ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let non_empty = |v: String| if v.trim().is_empty() { None } else { Some(v) };
        if let Some(url) = getter(ENV_YIELD_URL).and_then(non_empty) {
            self.service.yield_url = url;
        }
        if let Some(url) = getter(ENV_GENERATION_URL).and_then(non_empty) {
            self.service.generation_url = url;
        }
        if let Some(value) = getter(ENV_TIMEOUT_MS).and_then(non_empty) {
            self.service.timeout_ms = value.trim().parse().map_err(|_| {
                ConfigError::new(ENV_TIMEOUT_MS, format!("invalid timeout value: {value}"))
            })?;
        }
        Ok(())
    }

    /// The configured turbine table, or the built-in one if none is given.
    pub fn catalog(&self) -> TurbineCatalog {
        if self.turbines.is_empty() {
            TurbineCatalog::builtin()
        } else {
            TurbineCatalog::new(self.turbines.clone())
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.service;
        if s.timeout_ms == 0 {
            errors.push(ConfigError::new("service.timeout_ms", "must be > 0"));
        }
        for (field, url) in [
            ("service.yield_url", &s.yield_url),
            ("service.generation_url", &s.generation_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(ConfigError::new(
                    field,
                    format!("must be an http(s) URL, got \"{url}\""),
                ));
            }
        }

        let price = self.pricing.price_per_mwh;
        if price.is_nan() || price < 0.0 {
            errors.push(ConfigError::new("pricing.price_per_mwh", "must be >= 0"));
        }

        let i = &self.interaction;
        if i.placement_debounce_ms == 0 {
            errors.push(ConfigError::new(
                "interaction.placement_debounce_ms",
                "must be > 0",
            ));
        }
        if i.area_debounce_ms == 0 {
            errors.push(ConfigError::new(
                "interaction.area_debounce_ms",
                "must be > 0",
            ));
        }
        let tolerance = i.proximity_tolerance_deg;
        if tolerance.is_nan() || tolerance <= 0.0 {
            errors.push(ConfigError::new(
                "interaction.proximity_tolerance_deg",
                "must be > 0",
            ));
        }

        let mut seen = HashSet::new();
        for (idx, t) in self.turbines.iter().enumerate() {
            let field = |name: &str| format!("turbines[{idx}].{name}");
            if t.key.trim().is_empty() {
                errors.push(ConfigError::new(field("key"), "must not be empty"));
            } else if !seen.insert(t.key.as_str()) {
                errors.push(ConfigError::new(
                    field("key"),
                    format!("duplicate turbine key \"{}\"", t.key),
                ));
            }
            if !(t.cut_in < t.rated && t.rated < t.cut_out) {
                errors.push(ConfigError::new(
                    field("rated"),
                    "must satisfy cut_in < rated < cut_out",
                ));
            }
            if t.rated_power_kw.is_nan() || t.rated_power_kw <= 0.0 {
                errors.push(ConfigError::new(field("rated_power_kw"), "must be > 0"));
            }
        }

        errors
    }
}

/// Loads the static named-place list from a JSON array of
/// `{ "name", "lat", "lng" }` objects.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or parsed.
pub fn load_places(path: &Path) -> Result<Vec<NamedPlace>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::new("places", format!("cannot read \"{}\": {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::new("places", e.to_string()))
}
