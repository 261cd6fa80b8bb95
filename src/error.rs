//! Error types for scene configuration and layout walking.
//!
//! The per-tick numeric path never produces errors: malformed length
//! strings degrade to a definite number (see `units`). Errors are
//! reserved for configuration-time validation and for the hardening
//! bound on the ancestor walk.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use thiserror::Error;

/// Result type alias for scene resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Scene configuration rejected at setup time
  #[error("Config error: {0}")]
  Config(#[from] ConfigError),

  /// Layout walk failure
  #[error("Layout error: {0}")]
  Layout(#[from] LayoutError),
}

/// Errors raised while validating scene configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
  /// A range name string matched none of the known names.
  #[error("unknown range name: '{name}'")]
  UnknownRangeName { name: String },

  /// A crossing range was used while the capability flag is off.
  #[error("range '{name}' requires the crossing-ranges capability")]
  CrossingRangeDisabled { name: &'static str },

  /// A scene declared a named range but no element to anchor it to.
  #[error("scene {index} uses a named range without a view source")]
  MissingViewSource { index: usize },
}

/// Errors raised by the sticky-aware layout walker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
  /// The offset-parent chain exceeded the configured depth bound.
  /// Chains deeper than this almost always indicate a cycle.
  #[error("offset-parent chain exceeded {max_depth} levels")]
  DepthExceeded { max_depth: usize },
}
