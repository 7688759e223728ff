// Correction model - per-term emission formulas
//
// Stateless functions computing each named term of the road-noise method
// for one category and one octave band. Every function is pure over its
// arguments; the segment calculator decides which terms apply and combines
// them.
//
// Degenerate-speed policy: rolling noise is logarithmic in speed, so the
// base level is guarded here and returns -inf dB for non-positive speeds
// instead of leaving the behavior to the math library. Speed-dependent
// correction terms return 0 for non-positive speeds so a gated-out
// category cannot poison the trace tables with NaN.

use crate::catalog::{JunctionType, SurfaceCoefficients, VehicleCategory};
use crate::spectrum::{db_to_linear, linear_to_db};

/// Which noise generator a correction applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseSource {
    Rolling,
    Propulsion,
}

/// Speed window the studded-tyre regression is defined over [km/h]
const STUDDED_SPEED_MIN: f64 = 50.0;
const STUDDED_SPEED_MAX: f64 = 90.0;

/// Distance over which a junction influences emission [m]
const JUNCTION_INFLUENCE_M: f64 = 100.0;

/// Rolling-noise base level [dB]
///
/// Formula: A_r + B_r * log10(v / v_ref)
///
/// Returns -inf for non-positive speeds (no rolling contribution).
pub fn rolling_level(
    cat: &VehicleCategory,
    band: usize,
    speed_kmh: f64,
    ref_speed_kmh: f64,
) -> f64 {
    if speed_kmh <= 0.0 {
        return f64::NEG_INFINITY;
    }
    cat.rolling_a[band] + cat.rolling_b[band] * (speed_kmh / ref_speed_kmh).log10()
}

/// Propulsion-noise base level [dB]
///
/// Formula: A_p + B_p * (v - v_ref) / v_ref  (linear in speed, unlike rolling)
pub fn propulsion_level(
    cat: &VehicleCategory,
    band: usize,
    speed_kmh: f64,
    ref_speed_kmh: f64,
) -> f64 {
    cat.propulsion_a[band] + cat.propulsion_b[band] * (speed_kmh - ref_speed_kmh) / ref_speed_kmh
}

/// Road-surface correction on the rolling term [dB]
///
/// Formula: A[band] + B * log10(v / v_ref)
pub fn surface_rolling(
    coeffs: &SurfaceCoefficients,
    band: usize,
    speed_kmh: f64,
    ref_speed_kmh: f64,
) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    coeffs.a[band] + coeffs.b * (speed_kmh / ref_speed_kmh).log10()
}

/// Road-surface correction on the propulsion term [dB]
///
/// Capped at 0: a surface may lower propulsion noise but never raise it,
/// asymmetric to the rolling-noise surface term.
pub fn surface_propulsion(coeffs: &SurfaceCoefficients, band: usize) -> f64 {
    coeffs.a[band].min(0.0)
}

/// Studded-tyre correction on the rolling term [dB]
///
/// Zero unless the category carries studded coefficients and the segment
/// reports studded months > 0. The speed enters the regression clamped to
/// [50, 90] km/h. The result is an energetic blend between "no correction"
/// and the full delta, weighted by the effective fraction of time studded
/// tyres are in use, so it always lies in [0, delta] for delta >= 0.
pub fn studded_tyres(
    cat: &VehicleCategory,
    band: usize,
    speed_kmh: f64,
    ref_speed_kmh: f64,
    studded_fraction: f64,
    months_per_year: f64,
) -> f64 {
    let coeffs = match &cat.studded {
        Some(coeffs) => coeffs,
        None => return 0.0,
    };
    if months_per_year <= 0.0 {
        return 0.0;
    }

    let v = speed_kmh.clamp(STUDDED_SPEED_MIN, STUDDED_SPEED_MAX);
    let delta = coeffs.a[band] + coeffs.b[band] * (v / ref_speed_kmh).log10();
    let ps = studded_fraction * months_per_year / 12.0;

    linear_to_db((1.0 - ps) + ps * db_to_linear(delta))
}

/// Air-temperature correction on the rolling term [dB]
///
/// Formula: K[band] * (T_ref - T). Genuinely per-band; K is a per-band
/// coefficient array on the category.
pub fn temperature(cat: &VehicleCategory, band: usize, temp_c: f64, ref_temp_c: f64) -> f64 {
    cat.temperature_k[band] * (ref_temp_c - temp_c)
}

/// Road-gradient correction [dB]
///
/// Delegates to the category's gradient rule set: the low rule below the
/// low bound (with the gradient sign flipped), the high rule above the
/// high bound, 0 in between.
pub fn gradient(cat: &VehicleCategory, gradient_pct: f64, speed_kmh: f64) -> f64 {
    cat.gradient.evaluate(gradient_pct, speed_kmh)
}

/// Acceleration/deceleration correction near a junction [dB]
///
/// Formula: C[junction][source] * max(1 - |x| / 100, 0), fading linearly
/// to zero at 100 m from the junction.
pub fn acceleration(
    cat: &VehicleCategory,
    junction: JunctionType,
    distance_m: f64,
    source: NoiseSource,
) -> f64 {
    let coeffs = cat.junction_coefficients(junction);
    let factor = match source {
        NoiseSource::Rolling => coeffs.rolling,
        NoiseSource::Propulsion => coeffs.propulsion,
    };
    factor * (1.0 - distance_m.abs() / JUNCTION_INFLUENCE_M).max(0.0)
}
