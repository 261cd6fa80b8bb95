//! Scene controller: configuration, the element→scene registry, and
//! the per-tick progress loop.
//!
//! The controller owns everything derived from the configured scenes.
//! Resize notifications arrive keyed by element; the registry maps an
//! element's identity to the scene indices that depend on it, so a
//! resize re-transforms exactly those scenes in place. The registry is
//! per-instance state: independent controllers never interfere.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dom::{ElementId, LayoutElement};
use crate::error::{ConfigError, Result};
use crate::geometry::{ScrollAxis, Viewport};
use crate::scene::{ResolvedScene, Scene, SceneBound, SceneDuration};
use crate::units::{AbsoluteOffsetContext, ContainerSize};
use crate::walk::{resolve_absolute_scene, transform_scene_group, WalkContext};

/// Controller configuration with explicit defaults, merged by plain
/// field-by-field overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
  /// Measure progress along the horizontal axis instead of the
  /// vertical one. Default: `false`.
  pub horizontal: bool,
  /// Hard bound on the ancestor walk. Default: `64`.
  pub max_walk_depth: usize,
  /// Whether the `entry-crossing`/`exit-crossing` range names are
  /// accepted. Default: `true`.
  pub crossing_ranges: bool,
}

impl Default for ControllerConfig {
  fn default() -> Self {
    Self {
      horizontal: false,
      max_walk_depth: 64,
      crossing_ranges: true,
    }
  }
}

impl ControllerConfig {
  pub fn horizontal(mut self, on: bool) -> Self {
    self.horizontal = on;
    self
  }

  pub fn max_walk_depth(mut self, depth: usize) -> Self {
    self.max_walk_depth = depth;
    self
  }

  pub fn crossing_ranges(mut self, on: bool) -> Self {
    self.crossing_ranges = on;
    self
  }

  pub fn axis(&self) -> ScrollAxis {
    if self.horizontal {
      ScrollAxis::Horizontal
    } else {
      ScrollAxis::Vertical
    }
  }
}

/// The measured surroundings scenes are resolved in: viewport extents,
/// the scroll root (if any), and the nearest size container for `cq*`
/// units.
#[derive(Debug, Clone)]
pub struct Environment<E> {
  pub viewport: Viewport,
  pub root: Option<E>,
  pub container: Option<ContainerSize>,
}

impl<E> Environment<E> {
  pub fn new(viewport: Viewport) -> Self {
    Self {
      viewport,
      root: None,
      container: None,
    }
  }

  pub fn with_root(mut self, root: E) -> Self {
    self.root = Some(root);
    self
  }

  pub fn with_container(mut self, container: ContainerSize) -> Self {
    self.container = Some(container);
    self
  }
}

struct SceneSlot<E> {
  scene: Scene<E>,
  resolved: ResolvedScene,
  last_progress: Option<f32>,
}

/// Owns configured scenes and their resolved pixel intervals.
pub struct SceneController<E: LayoutElement> {
  config: ControllerConfig,
  environment: Environment<E>,
  slots: Vec<SceneSlot<E>>,
  registry: FxHashMap<ElementId, Vec<usize>>,
}

impl<E: LayoutElement> std::fmt::Debug for SceneController<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SceneController")
      .field("config", &self.config)
      .field("slots", &self.slots.len())
      .field("registry", &self.registry.len())
      .finish()
  }
}

impl<E: LayoutElement> SceneController<E> {
  /// Validates the scene list, resolves every scene group, and builds
  /// the resize registry.
  pub fn new(
    config: ControllerConfig,
    environment: Environment<E>,
    scenes: Vec<Scene<E>>,
  ) -> Result<Self> {
    validate_scenes(&config, &scenes)?;

    let mut controller = Self {
      config,
      environment,
      slots: scenes
        .into_iter()
        .enumerate()
        .map(|(index, scene)| SceneSlot {
          scene,
          resolved: ResolvedScene {
            index,
            start: 0.0,
            end: 0.0,
            duration: 0.0,
            is_fixed: false,
          },
          last_progress: None,
        })
        .collect(),
      registry: FxHashMap::default(),
    };
    let all: Vec<usize> = (0..controller.slots.len()).collect();
    controller.resolve_indices(&all)?;
    Ok(controller)
  }

  fn walk_context(&self) -> WalkContext<'_, E> {
    WalkContext {
      root: self.environment.root.as_ref(),
      viewport: self.environment.viewport,
      axis: self.config.axis(),
      max_depth: self.config.max_walk_depth,
      offset_context: AbsoluteOffsetContext::new(
        self.environment.viewport.width,
        self.environment.viewport.height,
      ),
      container: self.environment.container,
    }
  }

  /// Re-resolves the given scene indices, one layout walk per scene
  /// group, and rebuilds their registry entries.
  fn resolve_indices(&mut self, indices: &[usize]) -> Result<()> {
    // Scenes sharing a group id resolve against one walk of the
    // group's subject; ungrouped scenes walk their own subject.
    let mut groups: Vec<(Option<String>, Vec<usize>)> = Vec::new();
    for &index in indices {
      let group_id = self.slots[index].scene.group_id.clone();
      match group_id {
        Some(id) => {
          if let Some(entry) = groups
            .iter_mut()
            .find(|(key, _)| key.as_deref() == Some(id.as_str()))
          {
            entry.1.push(index);
          } else {
            groups.push((Some(id), vec![index]));
          }
        }
        None => groups.push((None, vec![index])),
      }
    }

    let ctx = self.walk_context();
    let mut updates: Vec<(ResolvedScene, Option<ElementId>)> = Vec::new();
    for (_, members) in &groups {
      let subject = members
        .iter()
        .find_map(|&i| self.slots[i].scene.view_source.clone());
      match subject {
        Some(subject) => {
          let pairs: Vec<(usize, &Scene<E>)> = members
            .iter()
            .map(|&i| (i, &self.slots[i].scene))
            .collect();
          let resolved = transform_scene_group(&subject, &pairs, &ctx)?;
          let subject_id = subject.id();
          updates.extend(resolved.into_iter().map(|r| (r, Some(subject_id))));
        }
        None => {
          for &i in members {
            updates.push((resolve_absolute_scene(i, &self.slots[i].scene), None));
          }
        }
      }
    }

    for index in indices {
      for ids in self.registry.values_mut() {
        ids.retain(|i| i != index);
      }
    }
    for (resolved, subject_id) in updates {
      let index = resolved.index;
      self.slots[index].resolved = resolved;
      self.slots[index].last_progress = None;
      if let Some(id) = subject_id {
        self.registry.entry(id).or_default().push(index);
      }
    }
    self.registry.retain(|_, ids| !ids.is_empty());
    Ok(())
  }

  /// Re-transforms the scenes depending on the given element. Called
  /// from the embedder's resize observation.
  pub fn element_resized(&mut self, id: ElementId) -> Result<()> {
    let Some(indices) = self.registry.get(&id).cloned() else {
      return Ok(());
    };
    trace!(element = id.0, scenes = indices.len(), "element resize re-transform");
    self.resolve_indices(&indices)
  }

  /// Re-transforms every scene against new viewport extents.
  pub fn viewport_resized(&mut self, viewport: Viewport) -> Result<()> {
    self.environment.viewport = viewport;
    trace!(
      width = viewport.width,
      height = viewport.height,
      "viewport resize re-transform"
    );
    let all: Vec<usize> = (0..self.slots.len()).collect();
    self.resolve_indices(&all)
  }

  /// Computes progress for every enabled scene at the given scroll
  /// position and invokes its effect. The effect fires when progress
  /// changed since the last tick or while the position is inside the
  /// scene's interval; fixed scenes fire once and disable themselves.
  pub fn tick(&mut self, scroll_pos: f32, velocity: f32) {
    for slot in &mut self.slots {
      if slot.scene.disabled {
        continue;
      }
      let resolved = slot.resolved;
      let progress = resolved.progress(scroll_pos);
      let active = scroll_pos >= resolved.start.min(resolved.end)
        && scroll_pos <= resolved.start.max(resolved.end);
      if active || slot.last_progress != Some(progress) {
        (slot.scene.effect)(&resolved, progress, velocity);
        slot.last_progress = Some(progress);
        if resolved.is_fixed {
          slot.scene.disabled = true;
        }
      }
    }
  }

  /// Enables or disables one scene; out-of-range indices are ignored.
  /// Wired to viewport-intersection observation by the embedder.
  pub fn set_disabled(&mut self, index: usize, disabled: bool) {
    if let Some(slot) = self.slots.get_mut(index) {
      slot.scene.disabled = disabled;
    }
  }

  /// The resolved interval of one scene.
  pub fn resolved(&self, index: usize) -> Option<ResolvedScene> {
    self.slots.get(index).map(|slot| slot.resolved)
  }

  /// Number of configured scenes.
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  /// True when no scenes are configured.
  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn config(&self) -> &ControllerConfig {
    &self.config
  }
}

fn validate_scenes<E>(config: &ControllerConfig, scenes: &[Scene<E>]) -> Result<()> {
  for (index, scene) in scenes.iter().enumerate() {
    let mut names = Vec::new();
    if let Some(range) = scene.start.as_ref().and_then(SceneBound::as_range) {
      names.push(range.name);
    }
    if let Some(range) = scene.end.as_ref().and_then(SceneBound::as_range) {
      names.push(range.name);
    }
    if let Some(SceneDuration::Range(name)) = scene.duration {
      names.push(name);
    }

    if !names.is_empty() && scene.view_source.is_none() && scene.group_id.is_none() {
      return Err(ConfigError::MissingViewSource { index }.into());
    }
    if !config.crossing_ranges {
      if let Some(name) = names.iter().find(|name| name.is_crossing()) {
        return Err(
          ConfigError::CrossingRangeDisabled {
            name: name.as_str(),
          }
          .into(),
        );
      }
    }
  }
  Ok(())
}
