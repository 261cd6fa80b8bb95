//! Semantic view ranges and their pixel resolution.
//!
//! A range name denotes a phase of an element's passage through the
//! viewport along the scroll axis. Each name maps to a base interval
//! `[start_position, start_position + duration)` of scroll positions;
//! a percentage offset picks a point inside it. Dispatch is a closed
//! enum match so a name that resolves to no interval is
//! unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::geometry::AxisRect;
use crate::units::{resolve_absolute_offset, AbsoluteOffsetContext, ContainerSize};

/// Semantic phase of an element's passage through the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeName {
  /// The element enters from the trailing edge until fully revealed
  /// (or until it fills the viewport, whichever is shorter).
  Entry,
  /// The element's leading edge crosses the viewport's trailing edge
  /// across the element's full extent, regardless of viewport size.
  EntryCrossing,
  /// The element is fully contained by the viewport, or fully contains
  /// it; the absolute duration covers both the taller- and
  /// shorter-than-viewport cases.
  Contain,
  /// The element leaves through the leading edge.
  Exit,
  /// The element's trailing edge crosses the viewport's leading edge
  /// across the element's full extent.
  ExitCrossing,
  /// The element's entire visual presence, first partial overlap to
  /// last.
  Cover,
}

impl RangeName {
  /// Canonical keyword for this range.
  pub fn as_str(self) -> &'static str {
    match self {
      RangeName::Entry => "entry",
      RangeName::EntryCrossing => "entry-crossing",
      RangeName::Contain => "contain",
      RangeName::Exit => "exit",
      RangeName::ExitCrossing => "exit-crossing",
      RangeName::Cover => "cover",
    }
  }

  /// Parse a range keyword. Unknown names are rejected here, at
  /// configuration time, so the numeric path downstream never sees one.
  pub fn parse(s: &str) -> Result<Self, ConfigError> {
    match s.trim() {
      "entry" => Ok(RangeName::Entry),
      "entry-crossing" => Ok(RangeName::EntryCrossing),
      "contain" => Ok(RangeName::Contain),
      "exit" => Ok(RangeName::Exit),
      "exit-crossing" => Ok(RangeName::ExitCrossing),
      "cover" => Ok(RangeName::Cover),
      other => Err(ConfigError::UnknownRangeName {
        name: other.to_string(),
      }),
    }
  }

  /// True for the single-edge crossing variants, which are capability
  /// gated in controller configuration.
  pub fn is_crossing(self) -> bool {
    matches!(self, RangeName::EntryCrossing | RangeName::ExitCrossing)
  }

  /// The scroll-position interval over which this phase occurs, given
  /// the viewport extent and the element's absolute rectangle along
  /// the scroll axis.
  pub fn span(self, viewport_size: f32, rect: AxisRect) -> RangeSpan {
    let height = rect.size();
    let (start_position, duration) = match self {
      RangeName::Entry => (rect.start - viewport_size, viewport_size.min(height)),
      RangeName::EntryCrossing => (rect.start - viewport_size, height),
      RangeName::Contain => (
        (rect.end - viewport_size).min(rect.start),
        (viewport_size - height).abs(),
      ),
      RangeName::Exit => (
        rect.start.max(rect.end - viewport_size),
        viewport_size.min(height),
      ),
      RangeName::ExitCrossing => (rect.start, height),
      RangeName::Cover => (rect.start - viewport_size, height + viewport_size),
    };
    RangeSpan {
      start_position,
      duration,
    }
  }
}

impl fmt::Display for RangeName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A resolved range interval: `[start_position, start_position + duration)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpan {
  pub start_position: f32,
  pub duration: f32,
}

impl RangeSpan {
  /// The interval as a rect, edges floored to whole pixels.
  pub fn to_rect(self) -> AxisRect {
    AxisRect::new(
      self.start_position.floor(),
      (self.start_position + self.duration).floor(),
    )
  }
}

/// A point within a named range: the range keyword, a percentage into
/// it, and an optional absolute adjustment length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeOffset {
  pub name: RangeName,
  /// Percentage into the range, 0–100.
  #[serde(default)]
  pub offset: f32,
  /// Absolute adjustment, e.g. `"24px"`, `"-10vh"`, `"calc(5vh + 2px)"`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub add: Option<String>,
}

impl RangeOffset {
  /// A range offset with no percentage and no adjustment.
  pub fn new(name: RangeName) -> Self {
    Self {
      name,
      offset: 0.0,
      add: None,
    }
  }

  /// Sets the percentage offset.
  pub fn at(mut self, offset: f32) -> Self {
    self.offset = offset;
    self
  }

  /// Sets the absolute adjustment length.
  pub fn add(mut self, length: impl Into<String>) -> Self {
    self.add = Some(length.into());
    self
  }

  /// Resolves this offset's `add` term into pixels.
  pub fn resolve_add(
    &self,
    context: AbsoluteOffsetContext,
    container: Option<ContainerSize>,
  ) -> f32 {
    resolve_absolute_offset(self.add.as_deref(), context, container)
  }
}

/// Converts one range offset into a single absolute scroll position,
/// floored to a whole pixel. The `add` term is not applied here; it is
/// layered on after any sticky adjustment of the surrounding span.
pub fn range_to_position(range: &RangeOffset, viewport_size: f32, rect: AxisRect) -> f32 {
  let span = range.name.span(viewport_size, rect);
  (span.start_position + range.offset / 100.0 * span.duration).floor()
}
