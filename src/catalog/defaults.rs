// Built-in reference catalogue
//
// Coefficient tables in the shape of the CNOSSOS-EU road-noise annex:
// categories 1 (light), 2 (medium heavy), 3 (heavy), 4a/4b (two-wheelers,
// propulsion only), studded-tyre coefficients on category 1, per-category
// gradient rule sets, crossing/roundabout acceleration coefficients, and
// the virgin reference surface. Used as the fallback when no catalogue
// file is supplied.

use once_cell::sync::Lazy;

use super::{
    GradientCorrection, GradientRule, JunctionCoefficients, RoadNoiseCatalog, StuddedCoefficients,
    SurfaceCoefficients,
};
use crate::spectrum::BAND_COUNT;

static REFERENCE: Lazy<RoadNoiseCatalog> = Lazy::new(build_reference_catalog);

/// The shared built-in reference catalogue
pub fn reference_catalog() -> &'static RoadNoiseCatalog {
    &REFERENCE
}

fn build_reference_catalog() -> RoadNoiseCatalog {
    let mut catalog = RoadNoiseCatalog::new();

    {
        let cat = catalog.add_category("1");
        cat.description = "Light motor vehicles".to_string();
        cat.rolling_a = [79.7, 85.7, 84.5, 90.2, 97.3, 93.9, 84.1, 74.3];
        cat.rolling_b = [30.0, 41.5, 38.9, 25.7, 32.5, 37.2, 39.0, 40.0];
        cat.propulsion_a = [94.5, 89.2, 88.0, 85.9, 84.2, 86.9, 83.3, 76.1];
        cat.propulsion_b = [-1.3, 7.2, 7.7, 8.0, 8.0, 8.0, 8.0, 8.0];
        cat.studded = Some(StuddedCoefficients {
            a: [0.0, 2.6, 2.9, 1.5, 2.3, 9.2, 11.4, 12.4],
            b: [0.0, -3.1, -6.4, -14.0, -22.4, -11.4, -9.8, -11.6],
        });
        cat.temperature_k = [0.08; BAND_COUNT];
        cat.acceleration = [
            JunctionCoefficients {
                rolling: -4.5,
                propulsion: 5.5,
            },
            JunctionCoefficients {
                rolling: -4.4,
                propulsion: 3.1,
            },
        ];
        cat.gradient = GradientCorrection {
            low_bound: -6.0,
            high_bound: 2.0,
            low: GradientRule {
                apply: true,
                a1: -6.0,
                a2: 1.0,
                a3: 0.0,
                use_speed: false,
            },
            high: GradientRule {
                apply: true,
                a1: -2.0,
                a2: 1.5,
                a3: 0.0,
                use_speed: true,
            },
        };
    }

    {
        let cat = catalog.add_category("2");
        cat.description = "Medium heavy vehicles".to_string();
        cat.rolling_a = [84.0, 88.7, 91.5, 96.7, 97.4, 90.9, 83.8, 80.5];
        cat.rolling_b = [30.0, 35.8, 32.6, 23.8, 30.1, 36.2, 38.3, 40.1];
        cat.propulsion_a = [101.0, 96.5, 98.8, 96.8, 98.6, 95.2, 88.8, 82.7];
        cat.propulsion_b = [-1.9, 4.7, 6.4, 6.5, 6.5, 6.5, 6.5, 6.5];
        cat.temperature_k = [0.04; BAND_COUNT];
        cat.acceleration = [
            JunctionCoefficients {
                rolling: -4.0,
                propulsion: 9.0,
            },
            JunctionCoefficients {
                rolling: -2.3,
                propulsion: 6.7,
            },
        ];
        cat.gradient = GradientCorrection {
            low_bound: -4.0,
            high_bound: 0.0,
            low: GradientRule {
                apply: true,
                a1: -4.0,
                a2: 0.7,
                a3: 20.0,
                use_speed: true,
            },
            high: GradientRule {
                apply: true,
                a1: 0.0,
                a2: 1.0,
                a3: 0.0,
                use_speed: true,
            },
        };
    }

    {
        let cat = catalog.add_category("3");
        cat.description = "Heavy duty vehicles".to_string();
        cat.rolling_a = [87.0, 91.7, 94.1, 100.7, 100.8, 94.3, 87.1, 82.5];
        cat.rolling_b = [30.0, 33.5, 31.3, 25.4, 31.8, 37.1, 38.6, 40.6];
        cat.propulsion_a = [104.4, 100.6, 101.7, 101.0, 100.1, 95.9, 91.3, 85.3];
        cat.propulsion_b = [0.0, 3.0, 4.6, 5.0, 5.0, 5.0, 5.0, 5.0];
        cat.temperature_k = [0.04; BAND_COUNT];
        cat.acceleration = [
            JunctionCoefficients {
                rolling: -4.0,
                propulsion: 9.0,
            },
            JunctionCoefficients {
                rolling: -2.3,
                propulsion: 6.7,
            },
        ];
        cat.gradient = GradientCorrection {
            low_bound: -4.0,
            high_bound: 0.0,
            low: GradientRule {
                apply: true,
                a1: -4.0,
                a2: 0.5,
                a3: 10.0,
                use_speed: true,
            },
            high: GradientRule {
                apply: true,
                a1: 0.0,
                a2: 0.8,
                a3: 0.0,
                use_speed: true,
            },
        };
    }

    {
        // Two-wheelers have no rolling-noise contribution in the method
        let cat = catalog.add_category("4a");
        cat.description = "Mopeds and similar (<= 50 cc)".to_string();
        cat.rolling_noise = false;
        cat.propulsion_a = [88.0, 87.5, 89.5, 93.7, 96.6, 98.8, 93.9, 88.7];
        cat.propulsion_b = [4.2, 7.4, 9.8, 11.6, 15.7, 18.9, 20.3, 20.6];
    }

    {
        let cat = catalog.add_category("4b");
        cat.description = "Motorcycles (> 50 cc)".to_string();
        cat.rolling_noise = false;
        cat.propulsion_a = [95.0, 97.2, 92.7, 92.9, 94.7, 93.2, 90.1, 86.5];
        cat.propulsion_b = [3.2, 5.9, 11.9, 11.6, 11.5, 12.6, 11.1, 12.0];
    }

    let num_categories = catalog.num_categories();
    {
        let surface = catalog.add_surface("REF");
        surface.description = "Virgin reference surface (dense asphalt concrete)".to_string();
        surface.v_min = 20.0;
        surface.v_max = 130.0;
        surface.coefficients = vec![SurfaceCoefficients::default(); num_categories];
    }

    catalog
}
