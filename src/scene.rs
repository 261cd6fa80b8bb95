//! Scene model: declarative boundaries in, absolute pixel intervals out.
//!
//! A scene ties one effect callback to a scroll interval. Boundaries
//! are declared either as raw pixel numbers or as named view ranges
//! with percentage offsets; resolution (see `walk`) replaces them with
//! concrete numbers the tick loop divides through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::range::{RangeName, RangeOffset};

/// One boundary of a scene's active interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneBound {
  /// Already-absolute scroll position in pixels.
  Pixels(f32),
  /// A point within a named view range of the scene's subject element.
  Range(RangeOffset),
}

impl SceneBound {
  pub fn as_range(&self) -> Option<&RangeOffset> {
    match self {
      SceneBound::Range(range) => Some(range),
      SceneBound::Pixels(_) => None,
    }
  }
}

impl From<f32> for SceneBound {
  fn from(px: f32) -> Self {
    SceneBound::Pixels(px)
  }
}

impl From<RangeOffset> for SceneBound {
  fn from(range: RangeOffset) -> Self {
    SceneBound::Range(range)
  }
}

/// A scene's duration: a pixel length (`end = start + duration`) or a
/// range name whose full 0%–100% span becomes the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneDuration {
  Pixels(f32),
  Range(RangeName),
}

/// Effect callback: invoked with the resolved scene, the current
/// progress in `[0, 1]`, and the scroll velocity supplied by the
/// driving loop.
pub type EffectFn = Box<dyn FnMut(&ResolvedScene, f32, f32)>;

/// One configured scroll-driven effect.
///
/// `E` is the embedder's element handle type. Scenes without a
/// `view_source` must carry pixel bounds; named ranges need an element
/// to anchor to, which configuration validation enforces.
pub struct Scene<E> {
  pub effect: EffectFn,
  pub start: Option<SceneBound>,
  pub end: Option<SceneBound>,
  pub duration: Option<SceneDuration>,
  /// Element whose passage through the viewport defines named ranges.
  pub view_source: Option<E>,
  /// Scenes sharing a group id resolve against a single layout walk.
  pub group_id: Option<String>,
  /// Skips effect invocation while set; toggled externally from
  /// viewport-intersection observation.
  pub disabled: bool,
}

impl<E> Scene<E> {
  pub fn new(effect: EffectFn) -> Self {
    Self {
      effect,
      start: None,
      end: None,
      duration: None,
      view_source: None,
      group_id: None,
      disabled: false,
    }
  }

  pub fn with_start(mut self, start: impl Into<SceneBound>) -> Self {
    self.start = Some(start.into());
    self
  }

  pub fn with_end(mut self, end: impl Into<SceneBound>) -> Self {
    self.end = Some(end.into());
    self
  }

  pub fn with_duration(mut self, duration: SceneDuration) -> Self {
    self.duration = Some(duration);
    self
  }

  pub fn with_view_source(mut self, element: E) -> Self {
    self.view_source = Some(element);
    self
  }

  pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
    self.group_id = Some(group_id.into());
    self
  }
}

impl<E: fmt::Debug> fmt::Debug for Scene<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scene")
      .field("start", &self.start)
      .field("end", &self.end)
      .field("duration", &self.duration)
      .field("view_source", &self.view_source)
      .field("group_id", &self.group_id)
      .field("disabled", &self.disabled)
      .finish_non_exhaustive()
  }
}

/// A scene's boundaries after resolution: concrete pixels only.
///
/// `end >= start` is not guaranteed. An inverted or empty interval is
/// legal and produces step-function progress, which [`Self::progress`]
/// preserves rather than repairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedScene {
  /// Index of the originating scene in the configured scene list.
  pub index: usize,
  pub start: f32,
  pub end: f32,
  pub duration: f32,
  /// The subject element turned out to be viewport-fixed: the interval
  /// is degenerate and the scene applies once, then disables itself.
  pub is_fixed: bool,
}

impl ResolvedScene {
  /// Normalized progress of `scroll_pos` through this interval.
  ///
  /// Positions inside `[start, end]` divide through the duration;
  /// beyond the end is exactly 1, before the start exactly 0. A
  /// zero-length interval steps from 0 to 1 at its end; an inverted
  /// interval has an empty inside and steps at `end` the same way.
  pub fn progress(&self, scroll_pos: f32) -> f32 {
    if self.duration.abs() < f32::EPSILON {
      return if scroll_pos >= self.end { 1.0 } else { 0.0 };
    }
    if scroll_pos >= self.start && scroll_pos <= self.end {
      ((scroll_pos - self.start) / self.duration).clamp(0.0, 1.0)
    } else if scroll_pos > self.end {
      1.0
    } else {
      0.0
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolved(start: f32, end: f32) -> ResolvedScene {
    ResolvedScene {
      index: 0,
      start,
      end,
      duration: end - start,
      is_fixed: false,
    }
  }

  #[test]
  fn progress_interpolates_within_interval() {
    let scene = resolved(275.0, 325.0);
    assert_eq!(scene.progress(250.0), 0.0);
    assert_eq!(scene.progress(285.0), 0.2);
    assert_eq!(scene.progress(300.0), 0.5);
    assert_eq!(scene.progress(325.0), 1.0);
    assert_eq!(scene.progress(400.0), 1.0);
  }

  #[test]
  fn zero_duration_steps_at_end() {
    let scene = resolved(300.0, 300.0);
    assert_eq!(scene.progress(299.9), 0.0);
    assert_eq!(scene.progress(300.0), 1.0);
    assert_eq!(scene.progress(301.0), 1.0);
  }

  #[test]
  fn inverted_interval_keeps_step_semantics() {
    // end < start is legal; the inside of the interval is empty, so
    // progress is a step at the (numerically smaller) end boundary.
    let scene = resolved(400.0, 300.0);
    assert_eq!(scene.progress(250.0), 0.0);
    assert_eq!(scene.progress(350.0), 1.0);
    assert_eq!(scene.progress(450.0), 1.0);
  }

  #[test]
  fn bounds_deserialize_from_pixels_or_ranges() {
    let bound: SceneBound = serde_json::from_str("120.0").unwrap();
    assert_eq!(bound, SceneBound::Pixels(120.0));
    let bound: SceneBound = serde_json::from_str(r#"{"name":"entry","offset":40.0}"#).unwrap();
    let range = bound.as_range().unwrap();
    assert_eq!(range.name, RangeName::Entry);
    assert_eq!(range.offset, 40.0);
  }

  #[test]
  fn duration_deserializes_from_pixels_or_name() {
    let duration: SceneDuration = serde_json::from_str("250.0").unwrap();
    assert_eq!(duration, SceneDuration::Pixels(250.0));
    let duration: SceneDuration = serde_json::from_str("\"cover\"").unwrap();
    assert_eq!(duration, SceneDuration::Range(RangeName::Cover));
  }
}
