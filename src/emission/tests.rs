// Segment calculator tests
//
// Covers the end-to-end composition rules: base-level regressions,
// per-term corrections, energetic combination, traffic normalization,
// and the documented degenerate outputs.

use super::*;
use crate::catalog::defaults;

const PLUS_3_DB: f64 = 3.0102999566398119; // 10*log10(2)

/// Catalogue with a single rolling-only category: A_r = 50, B_r = 10
fn rolling_only_catalog() -> RoadNoiseCatalog {
    let mut catalog = RoadNoiseCatalog::new();
    let cat = catalog.add_category("1");
    cat.propulsion_noise = false;
    cat.rolling_a = [50.0; BAND_COUNT];
    cat.rolling_b = [10.0; BAND_COUNT];
    catalog
}

#[test]
fn rolling_only_at_reference_speed() {
    // LWR = 50 in every band (log10(1) = 0); the traffic term shifts it by
    // 10*log10(1000 / (1000 * 70)) = -10*log10(70)
    let catalog = rolling_only_catalog();
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1000.0, 70.0);

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    let expected = 50.0 - 10.0 * 70f64.log10();
    assert!((expected - 31.55).abs() < 0.01);

    for band in 0..BAND_COUNT {
        assert!((result.trace.categories[0].spectrum.band(band) - expected).abs() < 1e-12);
        assert!((result.total.band(band) - expected).abs() < 1e-12);
    }
    assert_eq!(result.warnings, 0);
}

#[test]
fn absent_category_yields_silent_total() {
    // Q = 0 for the only category: spectrum rows exactly 0, total -inf.
    // The degenerate -inf is the documented output, not a crash.
    let catalog = rolling_only_catalog();
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 0.0, 70.0);

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    for band in 0..BAND_COUNT {
        assert_eq!(result.trace.categories[0].spectrum.band(band), 0.0);
        assert_eq!(result.total.band(band), f64::NEG_INFINITY);
    }
}

#[test]
fn zero_contribution_guard_ignores_other_inputs() {
    // v = 0 with every optional context set must still produce exact zeros
    let mut catalog = rolling_only_catalog();
    catalog.add_surface("REF");
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 500.0, 0.0);
    segment.temperature_c = Some(-5.0);
    segment.gradient_pct = Some(8.0);
    segment.studded_months = 6.0;
    segment.surface_id = Some("REF".to_string());
    segment.acceleration = Some(AccelerationContext {
        distance_m: 10.0,
        junction: JunctionType::Crossing,
    });

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    for band in 0..BAND_COUNT {
        assert_eq!(result.trace.categories[0].spectrum.band(band), 0.0);
    }
}

#[test]
fn two_equal_categories_sum_to_plus_3_db() {
    let mut catalog = RoadNoiseCatalog::new();
    for id in ["a", "b"] {
        let cat = catalog.add_category(id);
        cat.propulsion_noise = false;
        cat.rolling_a = [50.0; BAND_COUNT];
        cat.rolling_b = [10.0; BAND_COUNT];
    }
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1000.0, 70.0);
    segment.set_traffic(1, 1000.0, 70.0);

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    let single = result.trace.categories[0].spectrum.band(0);
    for band in 0..BAND_COUNT {
        assert!((result.total.band(band) - (single + PLUS_3_DB)).abs() < 1e-12);
    }
}

#[test]
fn rolling_and_propulsion_combine_energetically() {
    // Equal rolling and propulsion levels combine to +3.01 dB
    let mut catalog = RoadNoiseCatalog::new();
    let cat = catalog.add_category("1");
    cat.rolling_a = [60.0; BAND_COUNT];
    cat.propulsion_a = [60.0; BAND_COUNT];
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1000.0, 70.0);

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    let tr = &result.trace.categories[0];
    for band in 0..BAND_COUNT {
        assert!((tr.combined.band(band) - (60.0 + PLUS_3_DB)).abs() < 1e-12);
    }
}

#[test]
fn propulsion_only_category_skips_rolling_terms() {
    let catalog = defaults::reference_catalog().clone();
    let mut segment = RoadSegment::for_catalog(&catalog);
    let idx = catalog.index_of_category("4b").unwrap();
    segment.set_traffic(idx, 120.0, 60.0);
    segment.temperature_c = Some(0.0);
    segment.studded_months = 6.0;

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    let tr = result.trace.category("4b").unwrap();
    for band in 0..BAND_COUNT {
        // rolling-side tables stay untouched for a propulsion-only category
        assert_eq!(tr.rolling_base.band(band), 0.0);
        assert_eq!(tr.studded.band(band), 0.0);
        assert_eq!(tr.temperature.band(band), 0.0);
        assert_eq!(tr.combined.band(band), tr.propulsion_total.band(band));
    }
}

#[test]
fn optional_contexts_gate_their_terms() {
    let catalog = defaults::reference_catalog().clone();
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 800.0, 70.0);

    let bare = SegmentCalculator::new(&catalog, &segment).calc();
    let tr = &bare.trace.categories[0];
    for band in 0..BAND_COUNT {
        assert_eq!(tr.temperature.band(band), 0.0);
        assert_eq!(tr.gradient.band(band), 0.0);
        assert_eq!(tr.acceleration_rolling.band(band), 0.0);
    }

    segment.temperature_c = Some(5.0);
    segment.gradient_pct = Some(6.0);
    let corrected = SegmentCalculator::new(&catalog, &segment).calc();
    let tr = &corrected.trace.categories[0];
    // K = 0.08, ref 20 degC: 0.08 * 15 = 1.2 dB in every band
    assert!((tr.temperature.band(0) - 1.2).abs() < 1e-12);
    // 6% uphill, light vehicles: (6 - 2) / 1.5 * (70 / 100)
    assert!((tr.gradient.band(0) - 4.0 / 1.5 * 0.7).abs() < 1e-12);
}

#[test]
fn gradient_correction_lands_on_the_propulsion_side() {
    let catalog = defaults::reference_catalog().clone();
    let mut flat_segment = RoadSegment::for_catalog(&catalog);
    flat_segment.set_traffic(0, 800.0, 70.0);

    let mut uphill_segment = flat_segment.clone();
    uphill_segment.gradient_pct = Some(6.0);

    let flat = SegmentCalculator::new(&catalog, &flat_segment).calc();
    let uphill = SegmentCalculator::new(&catalog, &uphill_segment).calc();

    let flat_tr = &flat.trace.categories[0];
    let up_tr = &uphill.trace.categories[0];
    for band in 0..BAND_COUNT {
        assert_eq!(flat_tr.rolling_total.band(band), up_tr.rolling_total.band(band));
        assert!(up_tr.propulsion_total.band(band) > flat_tr.propulsion_total.band(band));
    }
}

#[test]
fn unknown_surface_degrades_with_a_warning() {
    let catalog = rolling_only_catalog();
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1000.0, 70.0);
    segment.surface_id = Some("porous-xyz".to_string());

    let degraded = SegmentCalculator::new(&catalog, &segment).calc();
    assert_eq!(degraded.warnings, 1);

    segment.surface_id = None;
    let bare = SegmentCalculator::new(&catalog, &segment).calc();
    assert_eq!(degraded.total, bare.total);
}

#[test]
fn out_of_range_speed_counts_a_warning() {
    let mut catalog = rolling_only_catalog();
    {
        let surface = catalog.add_surface("REF");
        surface.v_min = 20.0;
        surface.v_max = 130.0;
    }
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1000.0, 150.0);
    segment.surface_id = Some("REF".to_string());

    let result = SegmentCalculator::new(&catalog, &segment).calc();
    assert_eq!(result.warnings, 1);
}

#[test]
fn calc_is_idempotent() {
    let catalog = defaults::reference_catalog().clone();
    let mut segment = RoadSegment::for_catalog(&catalog);
    segment.set_traffic(0, 1200.0, 80.0);
    segment.set_traffic(2, 150.0, 75.0);
    segment.traffic[0].studded_fraction = 0.3;
    segment.studded_months = 4.0;
    segment.temperature_c = Some(8.0);
    segment.gradient_pct = Some(-7.0);
    segment.surface_id = Some("REF".to_string());

    let calculator = SegmentCalculator::new(&catalog, &segment);
    let first = calculator.calc();
    let second = calculator.calc();
    assert_eq!(first, second);
}

#[test]
fn source_height_comes_from_the_catalog() {
    let catalog = defaults::reference_catalog().clone();
    let segment = RoadSegment::for_catalog(&catalog);
    let result = SegmentCalculator::new(&catalog, &segment).calc();
    assert_eq!(result.src_height_m, catalog.src_height_m);
}
