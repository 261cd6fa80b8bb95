//! The layout query surface scenes are resolved against.
//!
//! The walker does not own an element tree; embedders supply one
//! through [`LayoutElement`]. The trait mirrors the offset model of a
//! DOM: every element has an offset parent, a layout offset and extent
//! along each axis, and a computed position style. Handles are expected
//! to be cheap to clone (reference-like).
//!
//! Reading the layout offset of a sticky element requires forcing its
//! position to `static` first, because a pinned element reports its
//! pinned offset rather than its flow position. That override is
//! visible layout state, so it is modeled as a guard that restores the
//! prior inline declaration on every exit path.

use crate::geometry::ScrollAxis;
use crate::style::{Position, PositionStyle};

/// Stable identity for an element handle.
///
/// Used to key the controller's resize registry and to recognize the
/// scroll root during the ancestor walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// A handle onto one element of the embedder's layout tree.
pub trait LayoutElement: Clone {
  /// Stable identity of this element.
  fn id(&self) -> ElementId;

  /// The next ancestor in the offset chain, or `None` at the top of
  /// the document.
  fn offset_parent(&self) -> Option<Self>;

  /// Layout offset relative to the offset parent along `axis`
  /// (`offsetTop` / `offsetLeft`).
  fn offset_start(&self, axis: ScrollAxis) -> f32;

  /// Border-box extent along `axis` (`offsetHeight` / `offsetWidth`).
  fn extent(&self, axis: ScrollAxis) -> f32;

  /// The positioning slice of this element's computed style.
  fn position_style(&self) -> PositionStyle;

  /// The element's inline position declaration, if any. Distinct from
  /// the computed position: the override below must restore exactly
  /// what was inline before, which is usually nothing.
  fn inline_position(&self) -> Option<Position>;

  /// Replaces the inline position declaration; `None` clears it.
  /// Changes visible layout, so callers must scope it (see
  /// [`UnstuckGuard`]).
  fn set_inline_position(&self, position: Option<Position>);
}

/// Forces an element's position to `static` for the guard's lifetime,
/// restoring the prior inline declaration on drop. Restoration also
/// runs during unwinding, so a panicking measurement cannot leave the
/// override applied.
pub struct UnstuckGuard<'a, E: LayoutElement> {
  element: &'a E,
  prior: Option<Position>,
}

impl<'a, E: LayoutElement> UnstuckGuard<'a, E> {
  pub fn new(element: &'a E) -> Self {
    let prior = element.inline_position();
    element.set_inline_position(Some(Position::Static));
    Self { element, prior }
  }
}

impl<E: LayoutElement> Drop for UnstuckGuard<'_, E> {
  fn drop(&mut self) {
    self.element.set_inline_position(self.prior);
  }
}

/// Runs `read` with the element's position forced to `static`.
///
/// No other layout read may be interleaved between the override and
/// its restoration; the closure runs synchronously under the guard.
pub fn measure_unstuck<E: LayoutElement, T>(element: &E, read: impl FnOnce(&E) -> T) -> T {
  let _guard = UnstuckGuard::new(element);
  read(element)
}
