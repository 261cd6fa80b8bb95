//! Scroll-driven scene progress.
//!
//! Scenes declare their active scroll interval semantically, as named
//! view ranges (`entry`, `contain`, `exit`, `cover`, and the crossing
//! variants) with percentage offsets and absolute adjustments. This
//! crate resolves them to absolute pixel intervals against the
//! embedder's layout tree, accounting for sticky-positioned ancestors
//! whose stuck dwell stretches or shifts the effective range. A thin
//! controller computes per-tick progress and invokes scene effects; all
//! scheduling (scroll listening, frame throttling, observers) stays
//! with the embedder.

pub mod controller;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod range;
pub mod scene;
pub mod style;
pub mod units;
pub mod walk;

pub use controller::{ControllerConfig, Environment, SceneController};
pub use dom::{measure_unstuck, ElementId, LayoutElement, UnstuckGuard};
pub use error::{ConfigError, Error, LayoutError, Result};
pub use geometry::{AxisRect, ScrollAxis, Viewport};
pub use range::{range_to_position, RangeName, RangeOffset, RangeSpan};
pub use scene::{EffectFn, ResolvedScene, Scene, SceneBound, SceneDuration};
pub use style::{Position, PositionStyle, StickyOffsets};
pub use units::{resolve_absolute_offset, AbsoluteOffsetContext, ContainerSize};
pub use walk::{
  build_offset_tree, compute_stickiness_into_full_range, transform_scene, transform_scene_group,
  OffsetTree, OffsetTreeNode, WalkContext,
};
