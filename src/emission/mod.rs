// Emission module - per-segment source-power calculation
//
// Orchestrates, for one road segment, the composition of rolling and
// propulsion noise per vehicle category and octave band: base levels,
// the applicable correction terms, the energetic combination per
// category, traffic-flow normalization to a line source, and the
// energetic summation across categories into the total spectrum.
//
// Policy: a calculation always completes. A category with no traffic
// contributes silence, a catalogue lookup miss degrades to a zero
// correction with a logged warning, and the warning count is carried in
// the result so auditing callers can tell a clean run from a degraded
// one. The only degenerate output is a -inf dB total on a segment with
// no present categories, asserted as such in tests.

use serde::{Deserialize, Serialize};

use crate::catalog::{JunctionType, RoadNoiseCatalog, RoadSurface};
use crate::corrections::{self, NoiseSource};
use crate::error::{log_catalog_miss, CatalogError};
use crate::spectrum::{db_to_linear, energetic_sum, linear_to_db, Spectrum, BAND_COUNT};

pub mod trace;

pub use trace::{CategoryTrace, EmissionTrace};

/// Traffic for one vehicle category on a segment
///
/// Flow 0 or speed 0 means the category is not present; it then
/// contributes exact silence, never a log(0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficFlow {
    /// Traffic volume [vehicles/hour]
    pub flow_veh_h: f64,
    /// Mean speed [km/h]
    pub speed_kmh: f64,
    /// Fraction of this category's vehicles running studded tyres [0..1]
    pub studded_fraction: f64,
}

impl TrafficFlow {
    /// Whether this category contributes to the segment at all
    #[inline]
    pub fn is_present(&self) -> bool {
        self.flow_veh_h > 0.0 && self.speed_kmh > 0.0
    }
}

/// Distance and kind of the nearest junction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationContext {
    /// Distance from the segment to the junction [m]
    pub distance_m: f64,
    pub junction: JunctionType,
}

/// Mutable per-calculation description of one road segment
///
/// Optional contexts follow presence semantics: a `Some` means "apply
/// this correction", `None` means the term is skipped entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Per-category traffic, parallel to the catalogue's category list
    pub traffic: Vec<TrafficFlow>,
    /// Months per year with studded tyres in use
    pub studded_months: f64,
    pub acceleration: Option<AccelerationContext>,
    /// Air temperature [degC]
    pub temperature_c: Option<f64>,
    /// Road gradient [%], positive uphill
    pub gradient_pct: Option<f64>,
    /// Selected surface identifier, resolved against the catalogue
    pub surface_id: Option<String>,
}

impl RoadSegment {
    /// Empty segment sized to the catalogue's category list
    pub fn for_catalog(catalog: &RoadNoiseCatalog) -> Self {
        Self {
            traffic: vec![TrafficFlow::default(); catalog.num_categories()],
            ..Self::default()
        }
    }

    /// Set flow and speed for a category index
    pub fn set_traffic(&mut self, category_index: usize, flow_veh_h: f64, speed_kmh: f64) {
        if let Some(slot) = self.traffic.get_mut(category_index) {
            slot.flow_veh_h = flow_veh_h;
            slot.speed_kmh = speed_kmh;
        }
    }
}

/// Result of one segment calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    /// Total sound power spectrum of the segment line source [dB]
    pub total: Spectrum,
    /// Equivalent line-source height [m], from the catalogue
    pub src_height_m: f64,
    /// Full intermediate tables for validation and debugging
    pub trace: EmissionTrace,
    /// Count of degraded steps (lookup misses, out-of-range speeds)
    pub warnings: u32,
}

/// Computes the emission of one segment against a read-only catalogue
///
/// Holds shared borrows only; any number of calculators may run against
/// the same catalogue concurrently. `calc` is pure: repeated calls on
/// unchanged inputs produce bit-identical results.
pub struct SegmentCalculator<'a> {
    catalog: &'a RoadNoiseCatalog,
    segment: &'a RoadSegment,
}

impl<'a> SegmentCalculator<'a> {
    pub fn new(catalog: &'a RoadNoiseCatalog, segment: &'a RoadSegment) -> Self {
        Self { catalog, segment }
    }

    /// Run the full calculation
    ///
    /// Never fails: missing data for one category yields a zero
    /// contribution for that category, and lookup misses degrade to zero
    /// corrections with a logged warning.
    pub fn calc(&self) -> EmissionResult {
        let mut warnings = 0u32;
        let surface = self.resolve_surface(&mut warnings);

        let ref_speed = self.catalog.ref_speed_kmh;
        let mut total_linear = [0.0f64; BAND_COUNT];
        let mut categories = Vec::with_capacity(self.catalog.num_categories());

        for (m, cat) in self.catalog.categories.iter().enumerate() {
            let flow = self.segment.traffic.get(m).copied().unwrap_or_default();
            let v = flow.speed_kmh;
            let mut tr = CategoryTrace::new(&cat.id);

            if flow.is_present() {
                self.check_surface_speed_range(surface, &cat.id, v, &mut warnings);
            }

            let surface_coeffs = surface.map(|s| s.coefficients_for(m));

            for i in 0..BAND_COUNT {
                // Propulsion side: base + surface cap + acceleration + gradient
                let mut propulsion = 0.0;
                if cat.propulsion_noise {
                    let base = corrections::propulsion_level(cat, i, v, ref_speed);
                    let surf = surface_coeffs
                        .as_ref()
                        .map(|c| corrections::surface_propulsion(c, i))
                        .unwrap_or(0.0);
                    let acc = self
                        .segment
                        .acceleration
                        .map(|ctx| {
                            corrections::acceleration(
                                cat,
                                ctx.junction,
                                ctx.distance_m,
                                NoiseSource::Propulsion,
                            )
                        })
                        .unwrap_or(0.0);
                    let grad = self
                        .segment
                        .gradient_pct
                        .map(|g| corrections::gradient(cat, g, v))
                        .unwrap_or(0.0);

                    *tr.propulsion_base.band_mut(i) = base;
                    *tr.surface_propulsion.band_mut(i) = surf;
                    *tr.acceleration_propulsion.band_mut(i) = acc;
                    *tr.gradient.band_mut(i) = grad;

                    propulsion = base + surf + acc + grad;
                    *tr.propulsion_total.band_mut(i) = propulsion;
                }

                // Rolling side: base + surface + studded + acceleration + temperature
                let mut rolling = 0.0;
                if cat.rolling_noise {
                    let base = corrections::rolling_level(cat, i, v, ref_speed);
                    let surf = surface_coeffs
                        .as_ref()
                        .map(|c| corrections::surface_rolling(c, i, v, ref_speed))
                        .unwrap_or(0.0);
                    let stud = corrections::studded_tyres(
                        cat,
                        i,
                        v,
                        ref_speed,
                        flow.studded_fraction,
                        self.segment.studded_months,
                    );
                    let acc = self
                        .segment
                        .acceleration
                        .map(|ctx| {
                            corrections::acceleration(
                                cat,
                                ctx.junction,
                                ctx.distance_m,
                                NoiseSource::Rolling,
                            )
                        })
                        .unwrap_or(0.0);
                    let temp = self
                        .segment
                        .temperature_c
                        .map(|t| corrections::temperature(cat, i, t, self.catalog.ref_temp_c))
                        .unwrap_or(0.0);

                    *tr.rolling_base.band_mut(i) = base;
                    *tr.surface_rolling.band_mut(i) = surf;
                    *tr.studded.band_mut(i) = stud;
                    *tr.acceleration_rolling.band_mut(i) = acc;
                    *tr.temperature.band_mut(i) = temp;

                    rolling = base + surf + stud + acc + temp;
                    *tr.rolling_total.band_mut(i) = rolling;
                }

                let lwim = match (cat.rolling_noise, cat.propulsion_noise) {
                    (true, true) => energetic_sum(&[rolling, propulsion]),
                    (true, false) => rolling,
                    (false, true) => propulsion,
                    (false, false) => 0.0,
                };
                *tr.combined.band_mut(i) = lwim;

                if flow.is_present() {
                    let norm = linear_to_db(flow.flow_veh_h / (1000.0 * v));
                    tr.traffic_norm = norm;
                    let level = lwim + norm;
                    *tr.spectrum.band_mut(i) = level;
                    total_linear[i] += db_to_linear(level);
                }
                // absent categories keep the exact-zero spectrum row
            }

            categories.push(tr);
        }

        let mut total = Spectrum::default();
        for (i, linear) in total_linear.iter().enumerate() {
            *total.band_mut(i) = linear_to_db(*linear);
        }

        let trace = EmissionTrace {
            categories,
            total,
        };

        EmissionResult {
            total,
            src_height_m: self.catalog.src_height_m,
            trace,
            warnings,
        }
    }

    /// Resolve the segment's surface id, degrading to "no surface" on a miss
    fn resolve_surface(&self, warnings: &mut u32) -> Option<&'a RoadSurface> {
        let id = self.segment.surface_id.as_deref()?;
        match self.catalog.surface(id) {
            Some(surface) => Some(surface),
            None => {
                log_catalog_miss(
                    &CatalogError::UnknownSurface { id: id.to_string() },
                    "SegmentCalculator::calc",
                );
                *warnings += 1;
                None
            }
        }
    }

    /// Warn when a present category drives outside the surface's validated
    /// speed range
    fn check_surface_speed_range(
        &self,
        surface: Option<&RoadSurface>,
        category_id: &str,
        speed_kmh: f64,
        warnings: &mut u32,
    ) {
        if let Some(surface) = surface {
            if speed_kmh < surface.v_min || speed_kmh > surface.v_max {
                log::warn!(
                    "Speed {} km/h for category {} outside validated range [{}, {}] of surface {}",
                    speed_kmh,
                    category_id,
                    surface.v_min,
                    surface.v_max,
                    surface.id
                );
                *warnings += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
