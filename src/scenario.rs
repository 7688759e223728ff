// Scenario module - segment descriptions as handed in by callers
//
// A scenario is the serializable form of one road segment: per-category
// traffic keyed by category identifier, plus the optional correction
// contexts. Binding a scenario against a catalogue resolves the ids to
// category indices; unknown ids are logged and skipped so one bad entry
// never aborts a batch.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::RoadNoiseCatalog;
use crate::emission::{AccelerationContext, RoadSegment};
use crate::error::{log_catalog_miss, CatalogError, ScenarioError};

/// Traffic on the segment for one vehicle category, by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEntry {
    pub category: String,
    /// Traffic volume [vehicles/hour]
    pub flow_veh_h: f64,
    /// Mean speed [km/h]
    pub speed_kmh: f64,
    #[serde(default)]
    pub studded_fraction: f64,
}

/// Serializable description of one road segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub traffic: Vec<TrafficEntry>,
    #[serde(default)]
    pub studded_months: f64,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub gradient_pct: Option<f64>,
    #[serde(default)]
    pub acceleration: Option<AccelerationContext>,
    #[serde(default)]
    pub surface: Option<String>,
    /// Request the full trace dump alongside the result
    #[serde(default)]
    pub debug_output: bool,
}

impl Scenario {
    /// Strict JSON load
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let display = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path).map_err(|err| ScenarioError::ReadFailed {
            path: display.clone(),
            details: err.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|err| ScenarioError::ParseFailed {
            path: display,
            details: err.to_string(),
        })
    }

    /// Resolve this scenario against a catalogue into a calculable segment
    ///
    /// Unknown category ids are logged and skipped. Speeds below the
    /// catalogue's validated minimum are raised to it. Fails only when the
    /// scenario has traffic entries and none of them matched a category.
    pub fn bind(&self, catalog: &RoadNoiseCatalog) -> Result<RoadSegment, ScenarioError> {
        let mut segment = RoadSegment::for_catalog(catalog);
        segment.studded_months = self.studded_months;
        segment.temperature_c = self.temperature_c;
        segment.gradient_pct = self.gradient_pct;
        segment.acceleration = self.acceleration;
        segment.surface_id = self.surface.clone();

        let mut matched = 0usize;
        for entry in &self.traffic {
            match catalog.index_of_category(&entry.category) {
                Some(index) => {
                    let mut speed = entry.speed_kmh;
                    if entry.flow_veh_h > 0.0
                        && speed > 0.0
                        && speed < catalog.min_speed_kmh
                    {
                        debug!(
                            "Raising speed {} km/h for category {} to validated minimum {}",
                            speed, entry.category, catalog.min_speed_kmh
                        );
                        speed = catalog.min_speed_kmh;
                    }
                    segment.set_traffic(index, entry.flow_veh_h, speed);
                    segment.traffic[index].studded_fraction = entry.studded_fraction;
                    matched += 1;
                }
                None => {
                    log_catalog_miss(
                        &CatalogError::UnknownCategory {
                            id: entry.category.clone(),
                        },
                        "Scenario::bind",
                    );
                }
            }
        }

        if matched == 0 && !self.traffic.is_empty() {
            return Err(ScenarioError::NoKnownCategories);
        }
        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults;

    fn sample_scenario() -> Scenario {
        Scenario {
            name: "urban arterial".to_string(),
            traffic: vec![
                TrafficEntry {
                    category: "1".to_string(),
                    flow_veh_h: 1200.0,
                    speed_kmh: 50.0,
                    studded_fraction: 0.0,
                },
                TrafficEntry {
                    category: "3".to_string(),
                    flow_veh_h: 90.0,
                    speed_kmh: 45.0,
                    studded_fraction: 0.0,
                },
            ],
            surface: Some("REF".to_string()),
            ..Scenario::default()
        }
    }

    #[test]
    fn bind_maps_entries_to_category_indices() {
        let catalog = defaults::reference_catalog();
        let segment = sample_scenario().bind(catalog).unwrap();

        let light = catalog.index_of_category("1").unwrap();
        let heavy = catalog.index_of_category("3").unwrap();
        assert_eq!(segment.traffic[light].flow_veh_h, 1200.0);
        assert_eq!(segment.traffic[heavy].speed_kmh, 45.0);
        // untouched categories stay absent
        let moped = catalog.index_of_category("4a").unwrap();
        assert!(!segment.traffic[moped].is_present());
    }

    #[test]
    fn unknown_categories_are_skipped_not_fatal() {
        let catalog = defaults::reference_catalog();
        let mut scenario = sample_scenario();
        scenario.traffic.push(TrafficEntry {
            category: "tram".to_string(),
            flow_veh_h: 10.0,
            speed_kmh: 30.0,
            studded_fraction: 0.0,
        });

        let segment = scenario.bind(catalog).unwrap();
        assert_eq!(
            segment.traffic.iter().filter(|t| t.is_present()).count(),
            2
        );
    }

    #[test]
    fn all_unknown_categories_is_an_error() {
        let catalog = defaults::reference_catalog();
        let scenario = Scenario {
            traffic: vec![TrafficEntry {
                category: "tram".to_string(),
                flow_veh_h: 10.0,
                speed_kmh: 30.0,
                studded_fraction: 0.0,
            }],
            ..Scenario::default()
        };
        assert_eq!(
            scenario.bind(catalog).unwrap_err(),
            ScenarioError::NoKnownCategories
        );
    }

    #[test]
    fn empty_traffic_binds_to_a_silent_segment() {
        let catalog = defaults::reference_catalog();
        let segment = Scenario::default().bind(catalog).unwrap();
        assert!(segment.traffic.iter().all(|t| !t.is_present()));
    }

    #[test]
    fn slow_traffic_is_raised_to_the_validated_minimum() {
        let catalog = defaults::reference_catalog();
        let scenario = Scenario {
            traffic: vec![TrafficEntry {
                category: "1".to_string(),
                flow_veh_h: 300.0,
                speed_kmh: 12.0,
                studded_fraction: 0.0,
            }],
            ..Scenario::default()
        };

        let segment = scenario.bind(catalog).unwrap();
        let light = catalog.index_of_category("1").unwrap();
        assert_eq!(segment.traffic[light].speed_kmh, catalog.min_speed_kmh);
    }

    #[test]
    fn scenario_json_roundtrip() {
        let scenario = sample_scenario();
        let json = serde_json::to_string_pretty(&scenario).unwrap();
        let parsed: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scenario);
    }
}
