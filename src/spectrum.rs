// Spectrum module - octave-band levels and energetic dB arithmetic
//
// All per-band data in this crate uses the fixed CNOSSOS-EU octave-band
// table (63 Hz to 8 kHz, 8 bands) in ascending order. Levels are sound
// power levels in dB; combining sources means summing the linear
// (mean-square-pressure-proportional) quantities and converting back.
//
// Degenerate inputs follow IEEE semantics on purpose: an empty or silent
// linear sum converts to -inf dB. Callers assert on that value instead of
// guarding it away (see the emission tests).

use serde::{Deserialize, Serialize};

/// Number of octave bands used throughout the engine
pub const BAND_COUNT: usize = 8;

/// Octave-band center frequencies in Hz, ascending. Never reordered.
pub const OCTAVE_BANDS_HZ: [f64; BAND_COUNT] = [
    63.0, 125.0, 250.0, 500.0, 1_000.0, 2_000.0, 4_000.0, 8_000.0,
];

/// An 8-band spectrum of dB levels, indexed by octave band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spectrum(pub [f64; BAND_COUNT]);

impl Default for Spectrum {
    fn default() -> Self {
        Spectrum([0.0; BAND_COUNT])
    }
}

impl Spectrum {
    /// Spectrum with the same level in every band
    pub fn uniform(level_db: f64) -> Self {
        Spectrum([level_db; BAND_COUNT])
    }

    /// Level in the given band
    #[inline]
    pub fn band(&self, band: usize) -> f64 {
        self.0[band]
    }

    /// Mutable access to the given band
    #[inline]
    pub fn band_mut(&mut self, band: usize) -> &mut f64 {
        &mut self.0[band]
    }

    /// Iterate over (band index, level) pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Energetic (linear-domain) sum of this spectrum with another, per band
    pub fn energetic_add(&self, other: &Spectrum) -> Spectrum {
        let mut out = [0.0; BAND_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = energetic_sum(&[self.0[i], other.0[i]]);
        }
        Spectrum(out)
    }
}

impl std::ops::Index<usize> for Spectrum {
    type Output = f64;

    fn index(&self, band: usize) -> &f64 {
        &self.0[band]
    }
}

/// Convert a dB level to its linear (power-proportional) value
#[inline]
pub fn db_to_linear(level_db: f64) -> f64 {
    10f64.powf(level_db / 10.0)
}

/// Convert a linear (power-proportional) value to dB
///
/// A zero input yields -inf per IEEE rules; zero is the documented
/// "no contribution" degenerate and is asserted on in tests.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

/// Energetic summation of dB levels
///
/// Formula: 10 * log10(Σ 10^(L_k / 10))
///
/// Combining two equal levels L yields L + 10*log10(2) ≈ L + 3.01 dB.
/// An empty slice yields -inf (silence).
pub fn energetic_sum(levels_db: &[f64]) -> f64 {
    let linear: f64 = levels_db.iter().map(|&l| db_to_linear(l)).sum();
    linear_to_db(linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_table_is_fixed_and_ascending() {
        assert_eq!(OCTAVE_BANDS_HZ.len(), BAND_COUNT);
        assert_eq!(OCTAVE_BANDS_HZ[0], 63.0);
        assert_eq!(OCTAVE_BANDS_HZ[7], 8000.0);
        for pair in OCTAVE_BANDS_HZ.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn equal_levels_combine_to_plus_3_db() {
        let combined = energetic_sum(&[60.0, 60.0]);
        let expected = 60.0 + 10.0 * 2f64.log10();
        assert!((combined - expected).abs() < 1e-12);
    }

    #[test]
    fn energetic_sum_matches_linear_pressure_sum() {
        let levels = [55.0, 61.3, 48.9];
        let linear: f64 = levels.iter().map(|&l| db_to_linear(l)).sum();
        let combined = energetic_sum(&levels);
        assert!((db_to_linear(combined) - linear).abs() < 1e-9);
    }

    #[test]
    fn empty_sum_is_silence() {
        assert_eq!(energetic_sum(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn neg_infinity_contributes_nothing() {
        let combined = energetic_sum(&[70.0, f64::NEG_INFINITY]);
        assert!((combined - 70.0).abs() < 1e-12);
    }

    #[test]
    fn energetic_add_is_per_band() {
        let a = Spectrum::uniform(50.0);
        let b = Spectrum::uniform(50.0);
        let sum = a.energetic_add(&b);
        for (_, level) in sum.iter() {
            assert!((level - (50.0 + 10.0 * 2f64.log10())).abs() < 1e-12);
        }
    }

    #[test]
    fn serde_roundtrip() {
        let spec = Spectrum([63.1, 65.0, 67.2, 70.0, 71.5, 69.9, 64.0, 58.8]);
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: Spectrum = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
