// CNOSSOS-EU road-traffic source-emission engine
// Per-octave-band sound power spectra from vehicle mixes, speeds, and
// segment conditions

// Module declarations
pub mod catalog;
pub mod corrections;
pub mod emission;
pub mod error;
pub mod scenario;
pub mod spectrum;

// Re-exports for convenience
pub use catalog::RoadNoiseCatalog;
pub use emission::{EmissionResult, RoadSegment, SegmentCalculator};
pub use scenario::Scenario;
pub use spectrum::{Spectrum, BAND_COUNT, OCTAVE_BANDS_HZ};

/// Initialize logging for binaries and tests
pub fn init_logging() {
    let _ = env_logger::builder().try_init();
}
