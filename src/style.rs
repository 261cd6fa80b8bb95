//! Computed-position facts read off elements during the layout walk.
//!
//! This is the slice of CSS positioning the walker cares about: the
//! `position` keyword plus the physical inset strings (`top`, `right`,
//! `bottom`, `left`) as they appear in computed style. Sticky inset
//! offsets are extracted per scroll axis with the rule that an
//! unparseable inset means "this edge has no sticky constraint", never
//! zero.
//!
//! Reference: CSS Positioned Layout Module Level 3
//! <https://www.w3.org/TR/css-position-3/>

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::geometry::ScrollAxis;
use crate::units::parse_leading_float;

/// CSS position property value.
///
/// # Examples
///
/// ```
/// use scrollscene::style::Position;
///
/// let pos = Position::parse("sticky").unwrap();
/// assert!(pos.is_sticky());
/// assert!(!pos.is_fixed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
  /// Normal flow, no positioning offset (default)
  #[default]
  Static,
  /// Normal flow, offset relative to itself
  Relative,
  /// Out-of-flow, positioned relative to containing block
  Absolute,
  /// Out-of-flow, positioned relative to the viewport
  Fixed,
  /// In flow until an inset threshold is crossed, then pinned
  Sticky,
}

impl Position {
  /// Returns true if the element is sticky positioned.
  pub fn is_sticky(self) -> bool {
    matches!(self, Position::Sticky)
  }

  /// Returns true if the element is fixed positioned.
  pub fn is_fixed(self) -> bool {
    matches!(self, Position::Fixed)
  }

  /// Parse a position value from a computed-style string.
  ///
  /// # Examples
  ///
  /// ```
  /// use scrollscene::style::Position;
  ///
  /// assert_eq!(Position::parse("static").unwrap(), Position::Static);
  /// assert_eq!(Position::parse(" STICKY ").unwrap(), Position::Sticky);
  /// assert!(Position::parse("inherit").is_err());
  /// ```
  pub fn parse(s: &str) -> Result<Self, PositionParseError> {
    match s.trim().to_ascii_lowercase().as_str() {
      "static" => Ok(Position::Static),
      "relative" => Ok(Position::Relative),
      "absolute" => Ok(Position::Absolute),
      "fixed" => Ok(Position::Fixed),
      "sticky" => Ok(Position::Sticky),
      other => Err(PositionParseError::InvalidValue(other.to_string())),
    }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Position::Static => "static",
      Position::Relative => "relative",
      Position::Absolute => "absolute",
      Position::Fixed => "fixed",
      Position::Sticky => "sticky",
    };
    write!(f, "{s}")
  }
}

/// Error when parsing a position value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionParseError {
  #[error("invalid position value: '{0}'")]
  InvalidValue(String),
}

/// The positioning slice of an element's computed style.
///
/// Inset fields carry the computed-style strings verbatim (`"0px"`,
/// `"auto"`, …); interpretation happens in [`StickyOffsets`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStyle {
  pub position: Position,
  pub top: Option<String>,
  pub right: Option<String>,
  pub bottom: Option<String>,
  pub left: Option<String>,
}

impl PositionStyle {
  /// A non-positioned style with no insets.
  pub fn statik() -> Self {
    Self::default()
  }

  /// Convenience constructor for sticky styles in fixtures and tests.
  pub fn sticky(top: Option<&str>, bottom: Option<&str>) -> Self {
    Self {
      position: Position::Sticky,
      top: top.map(str::to_owned),
      bottom: bottom.map(str::to_owned),
      ..Self::default()
    }
  }
}

/// Per-edge sticky pin offsets along one scroll axis, in pixels.
///
/// `start` is the leading-edge inset (`top` on the vertical axis,
/// `left` on the horizontal), `end` the trailing-edge inset. An edge
/// whose inset string has no leading number is absent, not zero: a
/// sticky element with `top: auto` has no start-edge constraint at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickyOffsets {
  pub start: Option<f32>,
  pub end: Option<f32>,
}

impl StickyOffsets {
  /// Extracts the sticky offsets a style contributes along `axis`, or
  /// `None` when the element is not sticky or no inset parses.
  pub fn from_style(style: &PositionStyle, axis: ScrollAxis) -> Option<Self> {
    if !style.position.is_sticky() {
      return None;
    }
    let (leading, trailing) = if axis.is_horizontal() {
      (style.left.as_deref(), style.right.as_deref())
    } else {
      (style.top.as_deref(), style.bottom.as_deref())
    };
    let offsets = StickyOffsets {
      start: leading.and_then(parse_leading_float),
      end: trailing.and_then(parse_leading_float),
    };
    if offsets.start.is_none() && offsets.end.is_none() {
      None
    } else {
      Some(offsets)
    }
  }

  /// True when only the trailing edge is constrained. Such elements are
  /// positioned relative to their end edge, so their own layout offset
  /// does not participate in leading-edge accumulation.
  pub fn is_end_only(self) -> bool {
    self.start.is_none() && self.end.is_some()
  }
}
