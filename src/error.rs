// Error types for the road-noise emission engine
//
// Catalogue lookup misses are recoverable: callers log them through the
// helpers below and keep processing the batch with a zero correction or a
// skipped category. Load errors are the fatal side of the channel and
// surface as Results from the strict loaders.

use log::warn;
use std::fmt;

/// Error codes for structured error reporting
///
/// Gives a numeric code and a human-readable message for every error type,
/// so reporting collaborators can switch on codes without string matching.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log a recoverable catalogue miss with context
///
/// Lookup misses never abort a calculation; the caller applies a default
/// (zero correction, skipped category) and continues.
pub fn log_catalog_miss(err: &CatalogError, context: &str) {
    warn!(
        "Catalog miss in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Catalogue-related errors
///
/// Error code range: 1001-1005
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No vehicle category with this identifier
    UnknownCategory { id: String },

    /// No road surface with this identifier
    UnknownSurface { id: String },

    /// Category index out of range
    IndexOutOfRange { index: usize, len: usize },

    /// Catalogue file could not be read
    ReadFailed { path: String, details: String },

    /// Catalogue file is not valid JSON
    ParseFailed { path: String, details: String },
}

impl ErrorCode for CatalogError {
    fn code(&self) -> i32 {
        match self {
            CatalogError::UnknownCategory { .. } => 1001,
            CatalogError::UnknownSurface { .. } => 1002,
            CatalogError::IndexOutOfRange { .. } => 1003,
            CatalogError::ReadFailed { .. } => 1004,
            CatalogError::ParseFailed { .. } => 1005,
        }
    }

    fn message(&self) -> String {
        match self {
            CatalogError::UnknownCategory { id } => {
                format!("Unknown vehicle category: {}", id)
            }
            CatalogError::UnknownSurface { id } => {
                format!("Unknown road surface: {}", id)
            }
            CatalogError::IndexOutOfRange { index, len } => {
                format!(
                    "Category index {} out of range (catalogue has {})",
                    index, len
                )
            }
            CatalogError::ReadFailed { path, details } => {
                format!("Failed to read catalogue {}: {}", path, details)
            }
            CatalogError::ParseFailed { path, details } => {
                format!("Failed to parse catalogue {}: {}", path, details)
            }
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CatalogError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for CatalogError {}

/// Scenario-related errors
///
/// These cover loading a segment description and binding it against a
/// catalogue.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// Scenario file could not be read
    ReadFailed { path: String, details: String },

    /// Scenario file is not valid JSON
    ParseFailed { path: String, details: String },

    /// Scenario references no category known to the catalogue
    NoKnownCategories,
}

impl ErrorCode for ScenarioError {
    fn code(&self) -> i32 {
        match self {
            ScenarioError::ReadFailed { .. } => 2001,
            ScenarioError::ParseFailed { .. } => 2002,
            ScenarioError::NoKnownCategories => 2003,
        }
    }

    fn message(&self) -> String {
        match self {
            ScenarioError::ReadFailed { path, details } => {
                format!("Failed to read scenario {}: {}", path, details)
            }
            ScenarioError::ParseFailed { path, details } => {
                format!("Failed to parse scenario {}: {}", path, details)
            }
            ScenarioError::NoKnownCategories => {
                "Scenario traffic matches no catalogue category".to_string()
            }
        }
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScenarioError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ScenarioError {}
