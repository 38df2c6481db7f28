use super::*;
use crate::history::UndoTarget;

impl Engine {
    pub fn insert_regions(&mut self, regions: Vec<Region>) {
        if regions.is_empty() {
            return;
        }
        self.begin_update();
        self.history.record_insert(&regions);
        self.store.insert(regions);
        self.mark_regions_changed();
        self.commit_update();
    }

    pub fn remove_regions<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Region> {
        let selected_before = self.store.selection_count();
        let removed = self.store.remove(ids);
        if removed.is_empty() {
            return removed;
        }
        self.begin_update();
        self.history.record_remove(&removed);
        self.mark_regions_changed();
        if self.store.selection_count() != selected_before {
            self.mark_selection_changed();
        }
        self.commit_update();
        removed
    }

    pub fn delete_selected(&mut self) -> usize {
        let ids = self.store.selected_ids();
        self.remove_regions(ids.as_slice()).len()
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.store.select_all();
        if changed {
            self.mark_selection_changed();
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = self.store.deselect_all();
        if changed {
            self.mark_selection_changed();
        }
        changed
    }

    pub fn undo(&mut self) -> Option<String> {
        let pending = self.history.begin_undo()?;
        self.begin_update();
        let counter = pending.command().apply(self);
        let name = self.history.finish_replay(pending, counter);
        self.commit_update();
        Some(name)
    }

    pub fn redo(&mut self) -> Option<String> {
        let pending = self.history.begin_redo()?;
        self.begin_update();
        let counter = pending.command().apply(self);
        let name = self.history.finish_replay(pending, counter);
        self.commit_update();
        Some(name)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.history.undo_name()
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.history.redo_name()
    }
}

// Replays run through the same paths as user edits; the log suppresses
// the recordings they would make.
impl UndoTarget for Engine {
    fn insert_regions(&mut self, regions: Vec<Region>) {
        Engine::insert_regions(self, regions);
    }

    fn remove_regions(&mut self, ids: &[String]) -> Vec<Region> {
        Engine::remove_regions(self, ids)
    }
}
