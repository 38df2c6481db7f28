mod editing;
mod pointer;

use image::RgbaImage;

use crate::config::EngineConfig;
use crate::events::{EngineEvent, EventBus, SubscriptionId};
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{GestureController, GestureEffects, GestureState};
use crate::history::UndoLog;
use crate::mapping::{aspect_fit, CoordinateMapper, VerticalAxis};
use crate::region::{Region, RegionKind, RegionStore};
use crate::render::CompositingPipeline;

const SELECTION_FRAME_OUTSET: f64 = 2.0;

pub struct Engine {
    store: RegionStore,
    history: UndoLog,
    gesture: GestureController,
    active_kind: RegionKind,
    source: Option<RgbaImage>,
    view_bounds: Option<Rect>,
    view_axis: VerticalAxis,
    display_override: Option<Rect>,
    pipeline: CompositingPipeline,
    rendered: Option<RgbaImage>,
    dirty: bool,
    render_count: u64,
    update_depth: usize,
    events: EventBus,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(&EngineConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            store: RegionStore::new(),
            history: UndoLog::with_limit(config.history_limit),
            gesture: GestureController::new(),
            active_kind: config.default_kind,
            source: None,
            view_bounds: None,
            view_axis: config.view_axis,
            display_override: None,
            pipeline: CompositingPipeline::new(config.filter_strength),
            rendered: None,
            dirty: true,
            render_count: 0,
            update_depth: 0,
            events: EventBus::default(),
        }
    }

    pub fn set_image(&mut self, image: Option<RgbaImage>) {
        self.begin_update();
        self.gesture.reset();
        let had_regions = !self.store.is_empty();
        let had_selection = self.store.selection_count() > 0;
        self.store.clear();
        self.history.clear();

        match &image {
            Some(image) => tracing::info!(
                width = image.width(),
                height = image.height(),
                "source image set"
            ),
            None => tracing::info!("source image cleared"),
        }
        self.source = image;
        self.display_override = None;
        self.rendered = None;
        self.dirty = true;

        let loaded = self.source.is_some();
        self.notify(EngineEvent::ImageChanged { loaded });
        if had_regions {
            self.notify(EngineEvent::RegionsChanged { count: 0 });
        }
        if had_selection {
            self.notify(EngineEvent::SelectionChanged { count: 0 });
        }
        self.commit_update();
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    fn image_size(&self) -> Option<Size> {
        self.source
            .as_ref()
            .map(|image| Size::new(f64::from(image.width()), f64::from(image.height())))
    }

    pub fn set_view(&mut self, bounds: Rect, axis: VerticalAxis) {
        self.view_bounds = Some(bounds);
        self.view_axis = axis;
    }

    pub fn set_display_rect(&mut self, rect: Option<Rect>) {
        self.display_override = rect;
    }

    /// Mapper for the current view, or `None` without an image or with an
    /// empty display rect. A host that never called [`Engine::set_view`]
    /// gets a view of the image's pixel extent.
    pub fn mapper(&self) -> Option<CoordinateMapper> {
        let image_size = self.image_size()?;
        let view = self
            .view_bounds
            .unwrap_or_else(|| Rect::from_size(image_size));
        let display = match self.display_override {
            Some(rect) => rect,
            None => aspect_fit(image_size, view)?,
        };
        CoordinateMapper::new(view, display, self.view_axis)
    }

    pub fn active_kind(&self) -> RegionKind {
        self.active_kind
    }

    pub fn set_active_kind(&mut self, kind: RegionKind) {
        if self.active_kind == kind {
            return;
        }
        tracing::debug!(from = %self.active_kind, to = %kind, "active kind changed");
        self.active_kind = kind;
        self.notify(EngineEvent::ModeChanged { kind });
    }

    pub fn regions(&self) -> &[Region] {
        self.store.regions()
    }

    pub fn selection_count(&self) -> usize {
        self.store.selection_count()
    }

    pub fn selected_regions(&self) -> Vec<&Region> {
        self.store.selected_regions()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.store.is_selected(id)
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gesture.state()
    }

    pub fn hit_test(&self, unit_point: Point) -> Option<&Region> {
        self.source.as_ref()?;
        self.store.hit_test(unit_point)
    }

    pub fn selection_frames(&self) -> Vec<Rect> {
        let Some(mapper) = self.mapper() else {
            return Vec::new();
        };
        self.store
            .selected_regions()
            .into_iter()
            .map(|region| {
                mapper
                    .rect_to_view(region.rect)
                    .outset(SELECTION_FRAME_OUTSET, SELECTION_FRAME_OUTSET)
            })
            .collect()
    }

    pub fn rendered_image(&mut self) -> Option<&RgbaImage> {
        let source = self.source.as_ref()?;
        if self.dirty || self.rendered.is_none() {
            self.rendered = Some(self.pipeline.render(source, self.store.regions()));
            self.dirty = false;
            self.render_count += 1;
            tracing::debug!(
                renders = self.render_count,
                regions = self.store.len(),
                "re-rendered output"
            );
        }
        self.rendered.as_ref()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Opens an update scope. Scopes nest; notifications are held until the
    /// outermost [`Engine::commit_update`].
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    pub fn commit_update(&mut self) {
        if self.update_depth == 0 {
            tracing::warn!("commit_update without matching begin_update");
            return;
        }
        self.update_depth -= 1;
        if self.update_depth == 0 {
            self.events.flush();
        }
    }

    fn notify(&mut self, event: EngineEvent) {
        self.events.queue(event);
        if self.update_depth == 0 {
            self.events.flush();
        }
    }

    fn mark_regions_changed(&mut self) {
        self.dirty = true;
        self.notify(EngineEvent::RegionsChanged {
            count: self.store.len(),
        });
    }

    fn mark_selection_changed(&mut self) {
        self.notify(EngineEvent::SelectionChanged {
            count: self.store.selection_count(),
        });
    }

    fn apply_effects(&mut self, effects: GestureEffects) {
        if effects.regions_changed {
            self.mark_regions_changed();
        }
        if effects.selection_changed {
            self.mark_selection_changed();
        }
    }
}
