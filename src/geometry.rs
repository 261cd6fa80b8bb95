//! Scroll-axis geometry primitives.
//!
//! Scene resolution works along a single scroll axis at a time, so the
//! types here project two-dimensional layout onto one axis: a position
//! interval in absolute document pixels and a viewport with per-axis
//! extents. All units are CSS pixels.
//!
//! # Coordinate System
//!
//! The origin is the top-left corner of the document; positions grow
//! downward (vertical axis) or rightward (horizontal axis). A scroll
//! position of `p` means the viewport's leading edge sits at document
//! position `p` along the configured axis.

use serde::{Deserialize, Serialize};

/// The axis along which scroll progress is measured.
///
/// Vertical is the default; horizontal is opted into per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
  /// Progress along the Y axis (`offsetTop`/`offsetHeight` reads).
  #[default]
  Vertical,
  /// Progress along the X axis (`offsetLeft`/`offsetWidth` reads).
  Horizontal,
}

impl ScrollAxis {
  /// Returns true for the horizontal axis.
  pub fn is_horizontal(self) -> bool {
    matches!(self, ScrollAxis::Horizontal)
  }
}

/// An element's extent along the scroll axis, in absolute document pixels.
///
/// `start` is the leading edge (top or left), `end` the trailing edge.
///
/// # Examples
///
/// ```
/// use scrollscene::geometry::AxisRect;
///
/// let rect = AxisRect::new(300.0, 400.0);
/// assert_eq!(rect.size(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRect {
  /// Leading edge position along the scroll axis
  pub start: f32,
  /// Trailing edge position along the scroll axis
  pub end: f32,
}

impl AxisRect {
  /// Creates a rect from its leading and trailing edges.
  pub const fn new(start: f32, end: f32) -> Self {
    Self { start, end }
  }

  /// Creates a rect from a leading edge and an extent.
  pub const fn from_start_size(start: f32, size: f32) -> Self {
    Self {
      start,
      end: start + size,
    }
  }

  /// Extent along the axis. May be negative for inverted intervals;
  /// callers that need a magnitude take `abs()` themselves.
  pub fn size(self) -> f32 {
    self.end - self.start
  }

  /// Shifts both edges by `delta`.
  pub fn translate(self, delta: f32) -> Self {
    Self {
      start: self.start + delta,
      end: self.end + delta,
    }
  }
}

/// Viewport dimensions in CSS pixels.
///
/// # Examples
///
/// ```
/// use scrollscene::geometry::{ScrollAxis, Viewport};
///
/// let viewport = Viewport::new(1280.0, 720.0);
/// assert_eq!(viewport.extent(ScrollAxis::Vertical), 720.0);
/// assert_eq!(viewport.extent(ScrollAxis::Horizontal), 1280.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
  pub width: f32,
  pub height: f32,
}

impl Viewport {
  /// Creates a viewport from its width and height.
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// The viewport extent along the given scroll axis.
  pub fn extent(self, axis: ScrollAxis) -> f32 {
    if axis.is_horizontal() {
      self.width
    } else {
      self.height
    }
  }
}
