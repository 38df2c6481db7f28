use std::collections::VecDeque;

use super::{DragPhase, GestureState, GestureTransition};
use crate::geometry::{Point, Rect};
use crate::history::UndoLog;
use crate::region::{Region, RegionKind, RegionStore};

const TRANSITION_HISTORY_LIMIT: usize = 32;

pub struct GestureContext<'a> {
    pub store: &'a mut RegionStore,
    pub history: &'a mut UndoLog,
    pub kind: RegionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureEffects {
    pub selection_changed: bool,
    pub regions_changed: bool,
}

#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
    transition_history: VecDeque<GestureTransition>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Toggles the hit region's selection (clearing others first when
    /// `exclusive`), or clears the selection on a miss.
    pub fn tap(&self, ctx: GestureContext<'_>, point: Point, exclusive: bool) -> GestureEffects {
        let store = ctx.store;
        let mut effects = GestureEffects::default();
        let hit_id = store.hit_test(point).map(|region| region.id().to_string());
        match hit_id {
            Some(id) if store.is_selected(&id) => {
                effects.selection_changed |= store.deselect(&id);
            }
            Some(id) => {
                if exclusive {
                    effects.selection_changed |= store.deselect_all();
                }
                effects.selection_changed |= store.select(&id);
            }
            None => {
                effects.selection_changed |= store.deselect_all();
            }
        }
        tracing::debug!(x = point.x, y = point.y, exclusive, ?effects, "tap");
        effects
    }

    pub fn drag(&mut self, ctx: GestureContext<'_>, point: Point, phase: DragPhase) -> GestureEffects {
        let GestureContext {
            store,
            history,
            kind,
        } = ctx;
        let mut effects = GestureEffects::default();

        if phase == DragPhase::Began {
            if !self.state.is_idle() {
                tracing::warn!(state = ?self.state, "drag began before previous gesture ended");
                self.finish(store, history, DragPhase::Cancelled, &mut effects);
            }
            self.begin(store, history, kind, point, &mut effects);
        }

        if phase != DragPhase::Cancelled {
            self.update(store, point, &mut effects);
        }

        if matches!(phase, DragPhase::Ended | DragPhase::Cancelled) {
            self.finish(store, history, phase, &mut effects);
        }
        effects
    }

    /// Ends an in-progress gesture where it stands, as if the pointer was released.
    pub fn cancel(&mut self, ctx: GestureContext<'_>) -> GestureEffects {
        let mut effects = GestureEffects::default();
        if !self.state.is_idle() {
            self.finish(ctx.store, ctx.history, DragPhase::Cancelled, &mut effects);
        }
        effects
    }

    fn begin(
        &mut self,
        store: &mut RegionStore,
        history: &mut UndoLog,
        kind: RegionKind,
        point: Point,
        effects: &mut GestureEffects,
    ) {
        effects.selection_changed |= store.deselect_all();

        let hit = store
            .hit_test(point)
            .map(|region| (region.id().to_string(), region.rect));
        let next = match hit {
            Some((id, original)) => {
                effects.selection_changed |= store.select(&id);
                GestureState::Moving {
                    id,
                    original,
                    anchor: point,
                }
            }
            None => {
                let region = Region::new(kind, Rect::new(point.x, point.y, 0.0, 0.0));
                let id = region.id().to_string();
                history.record_insert(std::slice::from_ref(&region));
                store.insert([region]);
                effects.regions_changed = true;
                effects.selection_changed |= store.select(&id);
                GestureState::Creating { id }
            }
        };
        self.transition(DragPhase::Began, next);
    }

    fn update(&mut self, store: &mut RegionStore, point: Point, effects: &mut GestureEffects) {
        let (id, rect) = match &self.state {
            GestureState::Idle => return,
            GestureState::Creating { id } => {
                let Some(region) = store.get(id) else {
                    return;
                };
                (id.as_str(), Rect::spanning(region.rect.origin(), point))
            }
            GestureState::Moving {
                id,
                original,
                anchor,
            } => (
                id.as_str(),
                original.translated(point.x - anchor.x, point.y - anchor.y),
            ),
        };
        effects.regions_changed |= store.set_rect(id, rect);
    }

    fn finish(
        &mut self,
        store: &mut RegionStore,
        history: &mut UndoLog,
        phase: DragPhase,
        effects: &mut GestureEffects,
    ) {
        if let GestureState::Creating { id } = &self.state {
            // Re-append the finished region so the undo entry carries its final rect.
            if let Some(region) = store.detach(id) {
                history.amend_insert(&region);
                store.insert([region]);
                effects.regions_changed = true;
            }
        }
        self.transition(phase, GestureState::Idle);
    }

    fn transition(&mut self, phase: DragPhase, next: GestureState) {
        let record = GestureTransition::new(&self.state, phase, &next);
        tracing::debug!(from = record.from, ?phase, to = record.to, "gesture transition");
        self.state = next;
        self.transition_history.push_back(record);
        if self.transition_history.len() > TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.transition_history.clear();
    }
}

#[cfg(test)]
impl GestureController {
    fn history(&self) -> Vec<GestureTransition> {
        self.transition_history.iter().copied().collect()
    }
}
