//! Sticky-aware layout walking.
//!
//! Resolving a named range needs the subject element's absolute
//! position along the scroll axis, which is the sum of layout offsets
//! up its offset-parent chain, plus a correction for every sticky
//! ancestor, because pixels scrolled while an ancestor is pinned do not
//! advance the subject's visual position. The walk records one
//! [`OffsetTreeNode`] per ancestor; stickiness propagation then
//! stretches or shifts the working range by each ancestor's stuck
//! travel.

use tracing::{trace, warn};

use crate::dom::{measure_unstuck, LayoutElement};
use crate::error::{LayoutError, Result};
use crate::geometry::{AxisRect, ScrollAxis, Viewport};
use crate::range::{RangeName, RangeOffset};
use crate::scene::{ResolvedScene, Scene, SceneBound, SceneDuration};
use crate::style::{Position, StickyOffsets};
use crate::units::{AbsoluteOffsetContext, ContainerSize};

/// Inputs shared by every transform in one controller instance.
#[derive(Clone)]
pub struct WalkContext<'a, E> {
  /// Scroll root; the walk stops when its offset parent is this
  /// element. `None` walks to the top of the document.
  pub root: Option<&'a E>,
  pub viewport: Viewport,
  pub axis: ScrollAxis,
  /// Hard bound on ancestor-chain length; exceeding it is reported as
  /// a configuration error instead of walking a cycle forever.
  pub max_depth: usize,
  pub offset_context: AbsoluteOffsetContext,
  /// Nearest size container for `cq*` units in `add` terms.
  pub container: Option<ContainerSize>,
}

/// One ancestor (or the subject itself) visited during the walk.
#[derive(Debug, Clone)]
pub struct OffsetTreeNode<E> {
  pub element: E,
  /// Raw layout offset relative to the offset parent, measured un-stuck.
  pub offset: f32,
  pub sticky: Option<StickyOffsets>,
  pub position: Position,
}

/// The walk's result: nodes in root-first order plus the subject's
/// accumulated rectangle inputs.
#[derive(Debug, Clone)]
pub struct OffsetTree<E> {
  pub nodes: Vec<OffsetTreeNode<E>>,
  /// Accumulated leading-edge position of the subject in document
  /// coordinates (scroll-root relative when a root is configured).
  pub subject_start: f32,
  pub subject_size: f32,
  /// The chain ended at a viewport-fixed ancestor: the subject never
  /// moves with scroll.
  pub is_fixed: bool,
}

impl<E: LayoutElement> OffsetTree<E> {
  /// The subject's absolute rectangle along the scroll axis.
  pub fn subject_rect(&self) -> AxisRect {
    AxisRect::from_start_size(self.subject_start, self.subject_size)
  }
}

/// Walks the offset-parent chain from `subject` up to the configured
/// scroll root (exclusive) or the top of the document.
///
/// Sticky elements are measured with their position forced to `static`
/// so the offset read is the flow position, not the pinned one. A
/// sticky element constrained only on its trailing edge is positioned
/// relative to that edge, so its own offset is left out of the
/// leading-edge accumulation.
pub fn build_offset_tree<E: LayoutElement>(
  subject: &E,
  ctx: &WalkContext<'_, E>,
) -> Result<OffsetTree<E>> {
  let axis = ctx.axis;
  let mut nodes: Vec<OffsetTreeNode<E>> = Vec::new();
  let mut accumulated = 0.0;
  let mut is_fixed = false;
  let mut current = subject.clone();

  loop {
    if nodes.len() >= ctx.max_depth {
      warn!(
        max_depth = ctx.max_depth,
        "offset-parent chain exceeded depth bound; likely a cycle"
      );
      return Err(
        LayoutError::DepthExceeded {
          max_depth: ctx.max_depth,
        }
        .into(),
      );
    }

    let style = current.position_style();
    let sticky = StickyOffsets::from_style(&style, axis);
    let offset = if style.position.is_sticky() {
      measure_unstuck(&current, |el| el.offset_start(axis))
    } else {
      current.offset_start(axis)
    };
    if !sticky.is_some_and(StickyOffsets::is_end_only) {
      accumulated += offset;
    }
    nodes.push(OffsetTreeNode {
      element: current.clone(),
      offset,
      sticky,
      position: style.position,
    });

    match current.offset_parent() {
      Some(parent) => {
        if ctx.root.is_some_and(|root| root.id() == parent.id()) {
          // Terminal placeholder: the root's own offset is not part of
          // the subject's position within the scroll container.
          nodes.push(OffsetTreeNode {
            element: parent,
            offset: 0.0,
            sticky: None,
            position: Position::Static,
          });
          break;
        }
        current = parent;
      }
      None => {
        if style.position.is_fixed() {
          is_fixed = true;
        }
        break;
      }
    }
  }

  nodes.reverse();
  Ok(OffsetTree {
    nodes,
    subject_start: accumulated,
    subject_size: subject.extent(axis),
    is_fixed,
  })
}

/// Stretches `range` by the stuck travel of every sticky node in the
/// tree.
///
/// A node's stickiness is evaluated against its parent node's box, so
/// the outermost node never adjusts anything. A leading-edge pin point
/// at or inside the range stretches the range end by the node's free
/// travel within its parent; a pin point strictly before the range
/// start shifts the start by the same amount (the whole stuck dwell is
/// spent before the range begins). Trailing-edge pins mirror this with
/// the un-pin point located from the viewport's far edge and the node's
/// own offset as the travel. Both edges of one node apply
/// independently.
pub fn compute_stickiness_into_full_range<E: LayoutElement>(
  tree: &OffsetTree<E>,
  range: AxisRect,
  viewport_size: f32,
  axis: ScrollAxis,
) -> AxisRect {
  let mut adjusted = range;
  let mut accumulated = 0.0;

  for (index, node) in tree.nodes.iter().enumerate() {
    let parent_origin = accumulated;
    if !node.sticky.is_some_and(StickyOffsets::is_end_only) {
      accumulated += node.offset;
    }
    if index == 0 {
      continue;
    }
    let Some(sticky) = node.sticky else {
      continue;
    };

    let absolute_start = parent_origin + node.offset;
    let node_size = node.element.extent(axis);

    if let Some(inset) = sticky.start {
      let stuck_start = absolute_start - inset;
      let parent_size = tree.nodes[index - 1].element.extent(axis);
      let travel = parent_size - (node.offset + node_size);
      adjusted = apply_stuck_travel(adjusted, stuck_start, travel);
    }
    if let Some(inset) = sticky.end {
      let offset_from_view_end = node_size + inset - viewport_size;
      let unpin = absolute_start + offset_from_view_end;
      adjusted = apply_stuck_travel(adjusted, unpin, node.offset);
    }
  }

  adjusted
}

fn apply_stuck_travel(range: AxisRect, pin: f32, travel: f32) -> AxisRect {
  let mut out = range;
  if pin < range.end {
    out.end += travel;
    if pin < range.start {
      out.start += travel;
    }
  }
  out
}

/// Full 0%–100% span of a named range, sticky-adjusted.
///
/// Stickiness is not percentage-linear, so percentage interpolation
/// must happen inside the adjusted span, never before adjustment.
fn adjusted_range_span<E: LayoutElement>(
  name: RangeName,
  tree: &OffsetTree<E>,
  viewport_size: f32,
  axis: ScrollAxis,
) -> AxisRect {
  let raw = name.span(viewport_size, tree.subject_rect()).to_rect();
  compute_stickiness_into_full_range(tree, raw, viewport_size, axis)
}

fn resolve_bound<E: LayoutElement>(
  range: &RangeOffset,
  tree: &OffsetTree<E>,
  ctx: &WalkContext<'_, E>,
) -> f32 {
  let viewport_size = ctx.viewport.extent(ctx.axis);
  let span = adjusted_range_span(range.name, tree, viewport_size, ctx.axis);
  let interpolated = (span.start + range.offset / 100.0 * span.size()).floor();
  interpolated + range.resolve_add(ctx.offset_context, ctx.container)
}

fn resolve_with_tree<E: LayoutElement>(
  index: usize,
  scene: &Scene<E>,
  tree: &OffsetTree<E>,
  ctx: &WalkContext<'_, E>,
) -> ResolvedScene {
  let viewport_size = ctx.viewport.extent(ctx.axis);

  let mut start = None;
  let mut end = None;
  let mut duration_override = None;

  if let Some(SceneDuration::Range(name)) = scene.duration {
    // The whole named span becomes the interval, adjusted as one unit.
    let span = adjusted_range_span(name, tree, viewport_size, ctx.axis);
    start = Some(span.start);
    end = Some(span.end);
    duration_override = Some(span.size());
  } else {
    match &scene.start {
      Some(SceneBound::Pixels(px)) => start = Some(*px),
      Some(SceneBound::Range(range)) => start = Some(resolve_bound(range, tree, ctx)),
      None => {}
    }
    match &scene.end {
      Some(SceneBound::Pixels(px)) => end = Some(*px),
      Some(SceneBound::Range(range)) => end = Some(resolve_bound(range, tree, ctx)),
      None => {}
    }
    if end.is_none() {
      if let (Some(s), Some(SceneDuration::Pixels(d))) = (start, scene.duration) {
        end = Some(s + d);
      }
    }
  }

  let start = start.unwrap_or(0.0);
  let end = end.unwrap_or(start);
  let mut resolved = ResolvedScene {
    index,
    start,
    end,
    duration: duration_override.unwrap_or(end - start),
    is_fixed: tree.is_fixed,
  };
  if resolved.is_fixed {
    // A fixed subject never moves with scroll; the interval collapses
    // to a point and the scene applies once.
    resolved.end = resolved.start;
    resolved.duration = 0.0;
  }
  resolved
}

/// Resolves a scene that has no view source: its bounds are already
/// absolute pixel numbers.
pub fn resolve_absolute_scene<E>(index: usize, scene: &Scene<E>) -> ResolvedScene {
  let start = match scene.start {
    Some(SceneBound::Pixels(px)) => px,
    _ => 0.0,
  };
  let end = match (scene.end.as_ref(), scene.duration) {
    (Some(SceneBound::Pixels(px)), _) => *px,
    (_, Some(SceneDuration::Pixels(d))) => start + d,
    _ => start,
  };
  ResolvedScene {
    index,
    start,
    end,
    duration: end - start,
    is_fixed: false,
  }
}

/// Resolves every scene of a group against a single walk of the shared
/// subject element.
pub fn transform_scene_group<E: LayoutElement>(
  subject: &E,
  scenes: &[(usize, &Scene<E>)],
  ctx: &WalkContext<'_, E>,
) -> Result<Vec<ResolvedScene>> {
  let tree = build_offset_tree(subject, ctx)?;
  trace!(
    subject = subject.id().0,
    scenes = scenes.len(),
    depth = tree.nodes.len(),
    fixed = tree.is_fixed,
    "resolved scene group"
  );
  Ok(
    scenes
      .iter()
      .map(|&(index, scene)| resolve_with_tree(index, scene, &tree, ctx))
      .collect(),
  )
}

/// Resolves a single scene: the group transform for its own subject, or
/// the absolute path when no view source is configured.
pub fn transform_scene<E: LayoutElement>(
  index: usize,
  scene: &Scene<E>,
  ctx: &WalkContext<'_, E>,
) -> Result<ResolvedScene> {
  match scene.view_source.as_ref() {
    Some(subject) => {
      let resolved = transform_scene_group(subject, &[(index, scene)], ctx)?;
      Ok(resolved[0])
    }
    None => Ok(resolve_absolute_scene(index, scene)),
  }
}
