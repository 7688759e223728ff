// Catalogue module - vehicle categories, road surfaces, reference constants
//
// The catalogue holds the static acoustic coefficient sets the emission
// engine computes against: per-category rolling/propulsion regressions,
// studded-tyre coefficients, gradient rule sets, acceleration coefficients,
// and per-surface correction tables. It is populated once (from the built-in
// defaults or a JSON file) and is read-only for the lifetime of every
// segment calculation that borrows it, so it can be shared freely across
// parallel calculators.
//
// Lookup misses are recoverable by design: callers get an Option, log the
// miss, and continue the batch with a default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::spectrum::BAND_COUNT;

pub mod defaults;

/// One branch of a gradient correction, evaluated against a signed gradient
///
/// The correction is `(min(12, s) + a1) / a2`, optionally scaled by the
/// speed factor `(v - a3) / 100`. With `apply` unset it is exactly 0 for
/// every gradient and speed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientRule {
    pub apply: bool,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub use_speed: bool,
}

impl GradientRule {
    /// Evaluate the rule for a signed gradient [%] at a speed [km/h]
    pub fn evaluate(&self, signed_gradient: f64, speed_kmh: f64) -> f64 {
        if !self.apply {
            return 0.0;
        }
        let first_factor = (signed_gradient.min(12.0) + self.a1) / self.a2;
        let speed_factor = if self.use_speed {
            (speed_kmh - self.a3) / 100.0
        } else {
            1.0
        };
        first_factor * speed_factor
    }
}

/// Gradient correction for one vehicle category
///
/// Below `low_bound` the low rule applies with the gradient sign flipped
/// (downhill slopes enter the rule as positive values); above `high_bound`
/// the high rule applies as-is; in between the correction is 0. The two
/// branches share no coefficients and are not symmetric unless the rules
/// happen to be equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradientCorrection {
    /// Gradient [%] below which the low rule applies
    pub low_bound: f64,
    /// Gradient [%] above which the high rule applies
    pub high_bound: f64,
    pub low: GradientRule,
    pub high: GradientRule,
}

impl GradientCorrection {
    /// Correction [dB] for a gradient [%] at a speed [km/h]
    pub fn evaluate(&self, gradient_pct: f64, speed_kmh: f64) -> f64 {
        if gradient_pct < self.low_bound {
            self.low.evaluate(-gradient_pct, speed_kmh)
        } else if gradient_pct > self.high_bound {
            self.high.evaluate(gradient_pct, speed_kmh)
        } else {
            0.0
        }
    }
}

/// Junction kinds recognized by the acceleration correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionType {
    /// Crossing with traffic lights
    Crossing,
    /// Roundabout
    Roundabout,
}

impl JunctionType {
    pub const COUNT: usize = 2;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            JunctionType::Crossing => 0,
            JunctionType::Roundabout => 1,
        }
    }
}

/// Acceleration/deceleration coefficients for one junction type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JunctionCoefficients {
    /// Coefficient applied to the rolling-noise term [dB]
    pub rolling: f64,
    /// Coefficient applied to the propulsion-noise term [dB]
    pub propulsion: f64,
}

/// Studded-tyre regression coefficients, present only on categories that
/// support studded tyres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StuddedCoefficients {
    pub a: [f64; BAND_COUNT],
    pub b: [f64; BAND_COUNT],
}

/// Static acoustic description of one traffic category
///
/// Created once when the catalogue is populated and immutable afterwards.
/// Regression coefficients follow the CNOSSOS-EU form: rolling noise is
/// logarithmic in speed, propulsion noise linear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCategory {
    pub id: String,
    pub description: String,
    /// Whether this category generates rolling noise at all
    pub rolling_noise: bool,
    /// Whether this category generates propulsion noise at all
    pub propulsion_noise: bool,
    /// Rolling-noise regression coefficients per band (alpha)
    pub rolling_a: [f64; BAND_COUNT],
    /// Rolling-noise regression coefficients per band (beta)
    pub rolling_b: [f64; BAND_COUNT],
    /// Propulsion-noise regression coefficients per band (alpha)
    pub propulsion_a: [f64; BAND_COUNT],
    /// Propulsion-noise regression coefficients per band (beta)
    pub propulsion_b: [f64; BAND_COUNT],
    /// Studded-tyre coefficients, absent for categories without them
    pub studded: Option<StuddedCoefficients>,
    /// Temperature sensitivity per band [dB/degC]
    pub temperature_k: [f64; BAND_COUNT],
    /// Acceleration coefficients indexed by JunctionType
    pub acceleration: [JunctionCoefficients; JunctionType::COUNT],
    pub gradient: GradientCorrection,
}

impl VehicleCategory {
    /// Default-initialized category: both noise sources enabled, all
    /// coefficients zero, no studded tyres, gradient rules disabled
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            rolling_noise: true,
            propulsion_noise: true,
            rolling_a: [0.0; BAND_COUNT],
            rolling_b: [0.0; BAND_COUNT],
            propulsion_a: [0.0; BAND_COUNT],
            propulsion_b: [0.0; BAND_COUNT],
            studded: None,
            temperature_k: [0.0; BAND_COUNT],
            acceleration: [JunctionCoefficients::default(); JunctionType::COUNT],
            gradient: GradientCorrection::default(),
        }
    }

    /// Acceleration coefficients for a junction type
    #[inline]
    pub fn junction_coefficients(&self, junction: JunctionType) -> JunctionCoefficients {
        self.acceleration[junction.index()]
    }
}

/// Surface correction coefficients for one vehicle category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCoefficients {
    /// Per-band spectral correction A [dB]
    pub a: [f64; BAND_COUNT],
    /// Scalar speed-term coefficient B
    pub b: f64,
}

impl Default for SurfaceCoefficients {
    fn default() -> Self {
        Self {
            a: [0.0; BAND_COUNT],
            b: 0.0,
        }
    }
}

/// Acoustic description of one road surface type
///
/// `coefficients` is parallel to the catalogue's category list; a missing
/// entry degrades to the zero (reference-surface) correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSurface {
    pub id: String,
    pub description: String,
    /// Lower bound of the validated speed range [km/h]
    pub v_min: f64,
    /// Upper bound of the validated speed range [km/h]
    pub v_max: f64,
    pub coefficients: Vec<SurfaceCoefficients>,
}

impl RoadSurface {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            v_min: 20.0,
            v_max: 130.0,
            coefficients: Vec::new(),
        }
    }

    /// Coefficients for a category index, zero correction if absent
    pub fn coefficients_for(&self, category_index: usize) -> SurfaceCoefficients {
        self.coefficients
            .get(category_index)
            .cloned()
            .unwrap_or_default()
    }
}

/// The complete road-noise catalogue
///
/// Owns every vehicle category and surface plus the reference constants.
/// Categories and surfaces keep insertion order; id lookup is a linear
/// scan with first-match-wins on duplicate ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNoiseCatalog {
    /// Reference speed the regressions are calibrated against [km/h]
    pub ref_speed_kmh: f64,
    /// Reference air temperature [degC]
    pub ref_temp_c: f64,
    /// Lowest speed the method is validated for [km/h]
    pub min_speed_kmh: f64,
    /// Equivalent line-source height above the road surface [m]
    pub src_height_m: f64,
    pub categories: Vec<VehicleCategory>,
    pub surfaces: Vec<RoadSurface>,
}

impl Default for RoadNoiseCatalog {
    fn default() -> Self {
        Self {
            ref_speed_kmh: 70.0,
            ref_temp_c: 20.0,
            min_speed_kmh: 20.0,
            src_height_m: 0.05,
            categories: Vec::new(),
            surfaces: Vec::new(),
        }
    }
}

impl RoadNoiseCatalog {
    /// Empty catalogue with the CNOSSOS reference constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default-initialized category and return it for population
    ///
    /// The category list grows as needed; there is no capacity bound.
    pub fn add_category(&mut self, id: &str) -> &mut VehicleCategory {
        self.categories.push(VehicleCategory::new(id));
        self.categories.last_mut().expect("just pushed")
    }

    /// Append a default-initialized surface and return it for population
    pub fn add_surface(&mut self, id: &str) -> &mut RoadSurface {
        self.surfaces.push(RoadSurface::new(id));
        self.surfaces.last_mut().expect("just pushed")
    }

    /// Index of a category by identifier (exact, case-sensitive match)
    pub fn index_of_category(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Category by identifier
    pub fn category(&self, id: &str) -> Option<&VehicleCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Category by insertion index
    pub fn category_at(&self, index: usize) -> Option<&VehicleCategory> {
        self.categories.get(index)
    }

    /// Index of a surface by identifier (exact, case-sensitive match)
    pub fn index_of_surface(&self, id: &str) -> Option<usize> {
        self.surfaces.iter().position(|s| s.id == id)
    }

    /// Surface by identifier
    pub fn surface(&self, id: &str) -> Option<&RoadSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// Load a catalogue from a JSON file, falling back to the built-in
    /// reference catalogue when the file is missing or malformed
    ///
    /// This is the permissive tool path: a degraded load is logged, never
    /// fatal. Use [`RoadNoiseCatalog::from_json_file`] when the caller must
    /// distinguish load failures.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_json_file(&path) {
            Ok(catalog) => {
                log::info!("[Catalog] Loaded catalogue from {:?}", path.as_ref());
                catalog
            }
            Err(err) => {
                log::warn!(
                    "[Catalog] {}. Using built-in reference catalogue.",
                    err
                );
                defaults::reference_catalog().clone()
            }
        }
    }

    /// Strict JSON load: read/parse failures are returned to the caller
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let display = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path).map_err(|err| CatalogError::ReadFailed {
            path: display.clone(),
            details: err.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|err| CatalogError::ParseFailed {
            path: display,
            details: err.to_string(),
        })
    }

    /// Write the catalogue as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        fs::write(path, json)
    }
}
