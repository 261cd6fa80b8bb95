//! End-to-end scene resolution against a fake layout tree.

use std::cell::RefCell;
use std::rc::Rc;

use scrollscene::{
  ControllerConfig, ElementId, Environment, LayoutElement, Position, PositionStyle, RangeName,
  RangeOffset, Scene, SceneController, SceneDuration, ScrollAxis, Viewport,
};

#[derive(Clone)]
struct FakeElement(Rc<Inner>);

struct Inner {
  id: u64,
  offsets: RefCell<(f32, f32)>,
  extents: RefCell<(f32, f32)>,
  style: RefCell<PositionStyle>,
  inline: RefCell<Option<Position>>,
  parent: RefCell<Option<FakeElement>>,
}

impl FakeElement {
  fn new(id: u64, offset_top: f32, height: f32) -> Self {
    FakeElement(Rc::new(Inner {
      id,
      offsets: RefCell::new((0.0, offset_top)),
      extents: RefCell::new((0.0, height)),
      style: RefCell::new(PositionStyle::statik()),
      inline: RefCell::new(None),
      parent: RefCell::new(None),
    }))
  }

  fn horizontal(id: u64, offset_left: f32, width: f32) -> Self {
    let el = Self::new(id, 0.0, 0.0);
    *el.0.offsets.borrow_mut() = (offset_left, 0.0);
    *el.0.extents.borrow_mut() = (width, 0.0);
    el
  }

  fn styled(self, style: PositionStyle) -> Self {
    *self.0.style.borrow_mut() = style;
    self
  }

  fn child_of(self, parent: &FakeElement) -> Self {
    *self.0.parent.borrow_mut() = Some(parent.clone());
    self
  }

  fn set_offset_top(&self, offset: f32) {
    self.0.offsets.borrow_mut().1 = offset;
  }
}

impl LayoutElement for FakeElement {
  fn id(&self) -> ElementId {
    ElementId(self.0.id)
  }

  fn offset_parent(&self) -> Option<Self> {
    self.0.parent.borrow().clone()
  }

  fn offset_start(&self, axis: ScrollAxis) -> f32 {
    let (left, top) = *self.0.offsets.borrow();
    if axis.is_horizontal() {
      left
    } else {
      top
    }
  }

  fn extent(&self, axis: ScrollAxis) -> f32 {
    let (width, height) = *self.0.extents.borrow();
    if axis.is_horizontal() {
      width
    } else {
      height
    }
  }

  fn position_style(&self) -> PositionStyle {
    self.0.style.borrow().clone()
  }

  fn inline_position(&self) -> Option<Position> {
    *self.0.inline.borrow()
  }

  fn set_inline_position(&self, position: Option<Position>) {
    *self.0.inline.borrow_mut() = position;
  }
}

fn init_tracing() {
  static INIT: std::sync::Once = std::sync::Once::new();
  INIT.call_once(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
  });
}

fn progress_log() -> (Rc<RefCell<Vec<f32>>>, scrollscene::EffectFn) {
  let log = Rc::new(RefCell::new(Vec::new()));
  let sink = log.clone();
  let effect: scrollscene::EffectFn = Box::new(move |_, progress, _| {
    sink.borrow_mut().push(progress);
  });
  (log, effect)
}

/// Subject 100px tall at offset 100 inside a parent at offset 200:
/// absolute rect {300, 400}.
fn three_level_tree() -> (FakeElement, FakeElement) {
  let root = FakeElement::new(1, 0.0, 2000.0);
  let parent = FakeElement::new(2, 200.0, 800.0).child_of(&root);
  let subject = FakeElement::new(3, 100.0, 100.0).child_of(&parent);
  (root, subject)
}

#[test]
fn scene_progress_tracks_scroll_through_named_ranges() {
  init_tracing();
  let (_root, subject) = three_level_tree();
  let (log, effect) = progress_log();

  let scene = Scene::new(effect)
    .with_start(RangeOffset::new(RangeName::Entry).at(50.0))
    .with_end(RangeOffset::new(RangeName::Contain).at(50.0))
    .with_view_source(subject);

  let mut controller = SceneController::new(
    ControllerConfig::default(),
    Environment::new(Viewport::new(800.0, 50.0)),
    vec![scene],
  )
  .unwrap();

  let resolved = controller.resolved(0).unwrap();
  assert_eq!(resolved.start, 275.0);
  assert_eq!(resolved.end, 325.0);

  for pos in [250.0, 285.0, 300.0, 325.0] {
    controller.tick(pos, 0.0);
  }
  assert_eq!(*log.borrow(), vec![0.0, 0.2, 0.5, 1.0]);
}

#[test]
fn resolution_is_idempotent_for_unchanged_geometry() {
  let (_root, subject) = three_level_tree();

  let build = |subject: FakeElement| {
    let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
      .with_start(RangeOffset::new(RangeName::Entry).at(25.0).add("12px"))
      .with_end(RangeOffset::new(RangeName::Exit).at(75.0))
      .with_view_source(subject);
    SceneController::new(
      ControllerConfig::default(),
      Environment::new(Viewport::new(800.0, 200.0)),
      vec![scene],
    )
    .unwrap()
  };

  let first = build(subject.clone()).resolved(0).unwrap();
  let second = build(subject).resolved(0).unwrap();
  assert_eq!(first, second);
}

#[test]
fn sticky_subject_dwell_lengthens_contain() {
  // Same geometry twice; one subject pinned with sticky top 0.
  let root = FakeElement::new(1, 0.0, 4000.0);
  let parent = FakeElement::new(2, 250.0, 400.0).child_of(&root);
  let plain = FakeElement::new(3, 50.0, 100.0).child_of(&parent);
  let pinned = FakeElement::new(4, 50.0, 100.0)
    .styled(PositionStyle::sticky(Some("0px"), None))
    .child_of(&parent);

  let resolve = |subject: FakeElement| {
    let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
      .with_duration(SceneDuration::Range(RangeName::Contain))
      .with_view_source(subject);
    SceneController::new(
      ControllerConfig::default(),
      Environment::new(Viewport::new(800.0, 50.0)),
      vec![scene],
    )
    .unwrap()
    .resolved(0)
    .unwrap()
  };

  let unstuck = resolve(plain);
  let stuck = resolve(pinned);
  assert_eq!(unstuck.duration, 50.0);
  assert!(
    stuck.duration > unstuck.duration,
    "stuck dwell must lengthen the active interval: {} vs {}",
    stuck.duration,
    unstuck.duration
  );
  assert_eq!(stuck.start, unstuck.start, "pin begins at the range start");
}

#[test]
fn calc_add_terms_resolve_against_the_viewport() {
  let (_root, subject) = three_level_tree();

  let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
    .with_start(RangeOffset::new(RangeName::Entry).add("calc(10vh + 5px)"))
    .with_end(RangeOffset::new(RangeName::Exit))
    .with_view_source(subject);

  let controller = SceneController::new(
    ControllerConfig::default(),
    Environment::new(Viewport::new(800.0, 200.0)),
    vec![scene],
  )
  .unwrap();

  // entry 0% is 100; calc(10vh + 5px) against a 200px viewport is 25.
  assert_eq!(controller.resolved(0).unwrap().start, 125.0);
}

#[test]
fn horizontal_axis_reads_left_offsets_and_widths() {
  let root = FakeElement::horizontal(1, 0.0, 5000.0);
  let subject = FakeElement::horizontal(2, 900.0, 300.0).child_of(&root);

  let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
    .with_duration(SceneDuration::Range(RangeName::Cover))
    .with_view_source(subject);

  let controller = SceneController::new(
    ControllerConfig::default().horizontal(true),
    Environment::new(Viewport::new(600.0, 800.0)),
    vec![scene],
  )
  .unwrap();

  let resolved = controller.resolved(0).unwrap();
  // cover spans [start - viewport width, end): [300, 1200).
  assert_eq!(resolved.start, 300.0);
  assert_eq!(resolved.end, 1200.0);
}

#[test]
fn scroll_root_bounds_the_walk() {
  let document = FakeElement::new(1, 0.0, 10_000.0);
  let scroller = FakeElement::new(2, 700.0, 1000.0).child_of(&document);
  let subject = FakeElement::new(3, 300.0, 100.0).child_of(&scroller);

  let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
    .with_start(RangeOffset::new(RangeName::Entry))
    .with_end(RangeOffset::new(RangeName::Exit).at(100.0))
    .with_view_source(subject);

  let controller = SceneController::new(
    ControllerConfig::default(),
    Environment::new(Viewport::new(800.0, 200.0)).with_root(scroller),
    vec![scene],
  )
  .unwrap();

  // The scroller's own 700px offset must not shift the interval.
  let resolved = controller.resolved(0).unwrap();
  assert_eq!(resolved.start, 100.0);
  assert_eq!(resolved.end, 400.0);
}

#[test]
fn scene_descriptors_deserialize_from_json() {
  let bound: scrollscene::SceneBound =
    serde_json::from_str(r#"{"name":"entry","offset":40.0,"add":"calc(10vh + 2px)"}"#).unwrap();
  let range = bound.as_range().unwrap();
  assert_eq!(range.name, RangeName::Entry);
  assert_eq!(range.offset, 40.0);

  let config: ControllerConfig =
    serde_json::from_str(r#"{"horizontal":true,"crossing_ranges":false}"#).unwrap();
  assert!(config.horizontal);
  assert!(!config.crossing_ranges);
  assert_eq!(config.max_walk_depth, 64, "omitted fields keep defaults");

  let (_root, subject) = three_level_tree();
  let scene = Scene::new(Box::new(|_: &scrollscene::ResolvedScene, _: f32, _: f32| {}) as scrollscene::EffectFn)
    .with_start(bound)
    .with_end(RangeOffset::new(RangeName::Exit))
    .with_view_source(subject);
  let controller = SceneController::new(
    ControllerConfig::default(),
    Environment::new(Viewport::new(800.0, 200.0)),
    vec![scene],
  )
  .unwrap();
  // entry 40% of [100, 200) is 140; the add term contributes 22.
  assert_eq!(controller.resolved(0).unwrap().start, 162.0);
}

#[test]
fn resize_flow_keeps_scenes_current() {
  init_tracing();
  let (_root, subject) = three_level_tree();
  let (log, effect) = progress_log();

  let scene = Scene::new(effect)
    .with_start(RangeOffset::new(RangeName::Entry))
    .with_end(RangeOffset::new(RangeName::Exit).at(100.0))
    .with_view_source(subject.clone());

  let mut controller = SceneController::new(
    ControllerConfig::default(),
    Environment::new(Viewport::new(800.0, 200.0)),
    vec![scene],
  )
  .unwrap();
  assert_eq!(controller.resolved(0).unwrap().start, 100.0);

  // The subject moves 100px further down the page.
  subject.set_offset_top(200.0);
  controller.element_resized(subject.id()).unwrap();
  let resolved = controller.resolved(0).unwrap();
  assert_eq!(resolved.start, 200.0);
  assert_eq!(resolved.end, 500.0);

  controller.tick(350.0, 0.0);
  assert_eq!(*log.borrow(), vec![0.5]);
}
