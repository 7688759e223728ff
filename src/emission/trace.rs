// Emission trace - full intermediate tables from a segment calculation
//
// Every named term of the calculation is retained per category and band so
// results can be validated step by step against the reference method. The
// trace is part of the calculator's output, serializable for reporting
// collaborators and exportable as CSV for spreadsheet-style inspection.

use serde::{Deserialize, Serialize};

use crate::spectrum::{Spectrum, BAND_COUNT, OCTAVE_BANDS_HZ};

/// All intermediate tables for one vehicle category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrace {
    pub category_id: String,
    /// Rolling-noise base level per band
    pub rolling_base: Spectrum,
    /// Propulsion-noise base level per band
    pub propulsion_base: Spectrum,
    /// Surface correction applied to the rolling term
    pub surface_rolling: Spectrum,
    /// Surface correction applied to the propulsion term
    pub surface_propulsion: Spectrum,
    pub studded: Spectrum,
    pub temperature: Spectrum,
    pub gradient: Spectrum,
    pub acceleration_rolling: Spectrum,
    pub acceleration_propulsion: Spectrum,
    /// Corrected rolling level (base + corrections)
    pub rolling_total: Spectrum,
    /// Corrected propulsion level (base + corrections)
    pub propulsion_total: Spectrum,
    /// Energetic combination of rolling and propulsion per band
    pub combined: Spectrum,
    /// Traffic-flow normalization term 10*log10(Q / (1000 v)), 0 when the
    /// category is absent from the segment
    pub traffic_norm: f64,
    /// Final per-category line-source spectrum
    pub spectrum: Spectrum,
}

impl CategoryTrace {
    pub fn new(category_id: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            ..Self::default()
        }
    }
}

/// Complete calculation trace: one table set per category plus the total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionTrace {
    pub categories: Vec<CategoryTrace>,
    pub total: Spectrum,
}

impl EmissionTrace {
    /// Trace tables for a category by identifier
    pub fn category(&self, id: &str) -> Option<&CategoryTrace> {
        self.categories.iter().find(|c| c.category_id == id)
    }

    /// Render the full trace as CSV: one row per (category, term), one
    /// column per octave band, and a final total row
    pub fn to_csv(&self) -> String {
        let mut out = String::from("category,term");
        for hz in OCTAVE_BANDS_HZ {
            out.push_str(&format!(",{}", hz));
        }
        out.push('\n');

        for cat in &self.categories {
            let rows: [(&str, &Spectrum); 13] = [
                ("rolling_base", &cat.rolling_base),
                ("propulsion_base", &cat.propulsion_base),
                ("surface_rolling", &cat.surface_rolling),
                ("surface_propulsion", &cat.surface_propulsion),
                ("studded", &cat.studded),
                ("temperature", &cat.temperature),
                ("gradient", &cat.gradient),
                ("acceleration_rolling", &cat.acceleration_rolling),
                ("acceleration_propulsion", &cat.acceleration_propulsion),
                ("rolling_total", &cat.rolling_total),
                ("propulsion_total", &cat.propulsion_total),
                ("combined", &cat.combined),
                ("spectrum", &cat.spectrum),
            ];
            for (term, spectrum) in rows {
                push_row(&mut out, &cat.category_id, term, spectrum);
            }
            out.push_str(&format!(
                "{},traffic_norm,{:.4}\n",
                cat.category_id, cat.traffic_norm
            ));
        }

        push_row(&mut out, "total", "spectrum", &self.total);
        out
    }
}

fn push_row(out: &mut String, category: &str, term: &str, spectrum: &Spectrum) {
    out.push_str(category);
    out.push(',');
    out.push_str(term);
    for band in 0..BAND_COUNT {
        out.push_str(&format!(",{:.4}", spectrum.band(band)));
    }
    out.push('\n');
}
