use super::*;
use crate::gesture::{DragPhase, GestureContext};

impl Engine {
    pub fn tap(&mut self, view_point: Point, exclusive: bool) {
        let Some(mapper) = self.mapper() else {
            return;
        };
        self.tap_unit(mapper.to_unit(view_point), exclusive);
    }

    pub fn drag(&mut self, view_point: Point, phase: DragPhase) {
        let Some(mapper) = self.mapper() else {
            return;
        };
        self.drag_unit(mapper.to_unit(view_point), phase);
    }

    pub fn tap_unit(&mut self, unit_point: Point, exclusive: bool) {
        if self.source.is_none() {
            return;
        }
        self.begin_update();
        let ctx = GestureContext {
            store: &mut self.store,
            history: &mut self.history,
            kind: self.active_kind,
        };
        let effects = self.gesture.tap(ctx, unit_point, exclusive);
        self.apply_effects(effects);
        self.commit_update();
    }

    pub fn drag_unit(&mut self, unit_point: Point, phase: DragPhase) {
        if self.source.is_none() {
            return;
        }
        self.begin_update();
        let ctx = GestureContext {
            store: &mut self.store,
            history: &mut self.history,
            kind: self.active_kind,
        };
        let effects = self.gesture.drag(ctx, unit_point, phase);
        self.apply_effects(effects);
        self.commit_update();
    }

    pub fn cancel_gesture(&mut self) {
        self.begin_update();
        let ctx = GestureContext {
            store: &mut self.store,
            history: &mut self.history,
            kind: self.active_kind,
        };
        let effects = self.gesture.cancel(ctx);
        self.apply_effects(effects);
        self.commit_update();
    }
}
