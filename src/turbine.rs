//! Static turbine model reference data.

use serde::{Deserialize, Serialize};

/// Manufacturer data for one turbine model.
///
/// Wind speeds are in m/s; power in kW; lengths in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurbineModel {
    /// Catalog key, e.g. `"SWT-7.0-154"`.
    pub key: String,
    pub company: String,
    pub message: String,
    /// Wind speed at which generation starts.
    pub cut_in: f64,
    /// Wind speed at which rated power is reached.
    pub rated: f64,
    /// Wind speed above which the turbine shuts down.
    pub cut_out: f64,
    pub rated_power_kw: f64,
    pub rotor_diameter_m: f64,
    pub tip_height_m: f64,
}

/// Immutable, ordered table of turbine models.
#[derive(Debug, Clone, PartialEq)]
pub struct TurbineCatalog {
    models: Vec<TurbineModel>,
}

impl Default for TurbineCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TurbineCatalog {
    pub fn new(models: Vec<TurbineModel>) -> Self {
        Self { models }
    }

    /// The four offshore reference models.
    pub fn builtin() -> Self {
        Self::new(vec![
            TurbineModel {
                key: "SWT-7.0-154".to_string(),
                company: "Siemens Gamesa Renewable Energy".to_string(),
                message: "Model with most units operational at sea".to_string(),
                cut_in: 3.0,
                rated: 13.0,
                cut_out: 25.0,
                rated_power_kw: 7000.0,
                rotor_diameter_m: 154.0,
                tip_height_m: 180.0,
            },
            TurbineModel {
                key: "GE Haliade-X 13 MW".to_string(),
                company: "GE Renewable Energy".to_string(),
                message: "Largest order to date: 277 units with a power output of 13 and 14 MW"
                    .to_string(),
                cut_in: 3.0,
                rated: 11.0,
                cut_out: 34.0,
                rated_power_kw: 13000.0,
                rotor_diameter_m: 220.0,
                tip_height_m: 260.0,
            },
            TurbineModel {
                key: "GE Haliade-X 14 MW".to_string(),
                company: "GE Renewable Energy".to_string(),
                message: "Largest order to date: 277 units with a power output of 13 and 14 MW"
                    .to_string(),
                cut_in: 3.0,
                rated: 11.0,
                cut_out: 34.0,
                rated_power_kw: 14000.0,
                rotor_diameter_m: 220.0,
                tip_height_m: 260.0,
            },
            TurbineModel {
                key: "SG 14-222 DD".to_string(),
                company: "Siemens Gamesa Renewable Energy".to_string(),
                message: "Largest turbine ordered".to_string(),
                cut_in: 3.0,
                rated: 12.0,
                cut_out: 32.0,
                rated_power_kw: 14000.0,
                rotor_diameter_m: 222.0,
                tip_height_m: 260.0,
            },
        ])
    }

    pub fn get(&self, key: &str) -> Option<&TurbineModel> {
        self.models.iter().find(|m| m.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.key.as_str())
    }

    pub fn models(&self) -> &[TurbineModel] {
        &self.models
    }
}
