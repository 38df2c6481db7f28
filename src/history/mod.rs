mod command;

use std::collections::VecDeque;

use crate::region::Region;

pub use command::{RegionCommand, UndoTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub name: String,
    pub command: RegionCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    Undo,
    Redo,
}

#[derive(Debug)]
pub struct PendingReplay {
    direction: Replay,
    entry: UndoEntry,
}

impl PendingReplay {
    pub fn command(&self) -> &RegionCommand {
        &self.entry.command
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

#[derive(Debug, Default)]
pub struct UndoLog {
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: VecDeque<UndoEntry>,
    limit: Option<usize>,
    replaying: bool,
}

pub fn action_name(verb: &str, count: usize) -> String {
    if count == 1 {
        format!("{verb} Region")
    } else {
        format!("{verb} Regions")
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn record_insert(&mut self, regions: &[Region]) -> bool {
        self.record(UndoEntry {
            name: action_name("Insert", regions.len()),
            command: RegionCommand::remove(regions),
        })
    }

    pub fn record_remove(&mut self, regions: &[Region]) -> bool {
        self.record(UndoEntry {
            name: action_name("Delete", regions.len()),
            command: RegionCommand::insert(regions),
        })
    }

    /// Refreshes the snapshot of the latest insert of `region`, so the entry
    /// holds its final state. Records a fresh insert if the top entry is
    /// about something else.
    pub fn amend_insert(&mut self, region: &Region) -> bool {
        if self.replaying {
            return false;
        }
        if let Some(UndoEntry {
            command: RegionCommand::Remove(snapshots),
            ..
        }) = self.undo_stack.back_mut()
        {
            if let [snapshot] = snapshots.as_mut_slice() {
                if snapshot.id == region.id() {
                    *snapshot = region.snapshot();
                    return true;
                }
            }
        }
        self.record_insert(std::slice::from_ref(region))
    }

    fn record(&mut self, entry: UndoEntry) -> bool {
        if self.replaying {
            tracing::trace!(name = %entry.name, "suppressing undo record during replay");
            return false;
        }
        if entry.command.snapshots().is_empty() {
            return false;
        }
        tracing::debug!(name = %entry.name, "record undo entry");
        self.undo_stack.push_back(entry);
        self.redo_stack.clear();
        self.prune();
        true
    }

    fn prune(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.undo_stack.len() > limit {
            self.undo_stack.pop_front();
        }
    }

    pub fn begin_undo(&mut self) -> Option<PendingReplay> {
        self.begin(Replay::Undo)
    }

    pub fn begin_redo(&mut self) -> Option<PendingReplay> {
        self.begin(Replay::Redo)
    }

    fn begin(&mut self, direction: Replay) -> Option<PendingReplay> {
        if self.replaying {
            return None;
        }
        let entry = match direction {
            Replay::Undo => self.undo_stack.pop_back(),
            Replay::Redo => self.redo_stack.pop_back(),
        }?;
        self.replaying = true;
        Some(PendingReplay { direction, entry })
    }

    /// Closes a replay, pushing `counter` (the command that reverts what was
    /// just replayed) onto the opposite stack. Returns the action name.
    pub fn finish_replay(&mut self, pending: PendingReplay, counter: RegionCommand) -> String {
        self.replaying = false;
        let PendingReplay { direction, entry } = pending;
        let name = entry.name;
        let counter_entry = UndoEntry {
            name: name.clone(),
            command: counter,
        };
        match direction {
            Replay::Undo => self.redo_stack.push_back(counter_entry),
            Replay::Redo => {
                self.undo_stack.push_back(counter_entry);
                self.prune();
            }
        }
        tracing::debug!(%name, ?direction, "replayed undo entry");
        name
    }

    pub fn undo<T: UndoTarget + ?Sized>(&mut self, target: &mut T) -> Option<String> {
        let pending = self.begin_undo()?;
        let counter = pending.command().apply(target);
        Some(self.finish_replay(pending, counter))
    }

    pub fn redo<T: UndoTarget + ?Sized>(&mut self, target: &mut T) -> Option<String> {
        let pending = self.begin_redo()?;
        let counter = pending.command().apply(target);
        Some(self.finish_replay(pending, counter))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(|entry| entry.name.as_str())
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.back().map(|entry| entry.name.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::region::{RegionKind, RegionSnapshot, RegionStore};

    fn regions(count: usize) -> Vec<Region> {
        (0..count)
            .map(|index| {
                let offset = index as f64 * 0.1;
                Region::with_id(
                    format!("r{index}"),
                    RegionKind::ALL[index % 3],
                    Rect::new(offset, offset, 0.2, 0.3),
                )
            })
            .collect()
    }

    fn insert_recorded(store: &mut RegionStore, log: &mut UndoLog, batch: &[Region]) {
        store.insert(batch.to_vec());
        log.record_insert(batch);
    }

    #[test]
    fn action_names_pluralize_by_count() {
        assert_eq!(action_name("Insert", 1), "Insert Region");
        assert_eq!(action_name("Insert", 3), "Insert Regions");
        assert_eq!(action_name("Delete", 0), "Delete Regions");
    }

    #[test]
    fn undo_of_insert_removes_exactly_those_regions_and_redo_restores() {
        let mut store = RegionStore::new();
        let mut log = UndoLog::new();
        let existing = Region::with_id("keep", RegionKind::Blur, Rect::unit());
        store.insert([existing.clone()]);

        let batch = regions(3);
        insert_recorded(&mut store, &mut log, &batch);
        assert_eq!(log.undo_name(), Some("Insert Regions"));

        assert_eq!(log.undo(&mut store).as_deref(), Some("Insert Regions"));
        assert_eq!(store.regions(), &[existing.clone()]);
        assert_eq!(log.redo_name(), Some("Insert Regions"));

        assert_eq!(log.redo(&mut store).as_deref(), Some("Insert Regions"));
        assert_eq!(store.len(), 4);
        assert_eq!(&store.regions()[1..], batch.as_slice());
    }

    #[test]
    fn undo_of_remove_reinserts_snapshots() {
        let mut store = RegionStore::new();
        let mut log = UndoLog::new();
        let batch = regions(1);
        store.insert(batch.clone());

        let removed = store.remove(&["r0"]);
        log.record_remove(&removed);
        assert_eq!(log.undo_name(), Some("Delete Region"));
        assert!(store.is_empty());

        log.undo(&mut store);
        assert_eq!(store.regions(), batch.as_slice());
        log.redo(&mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut store = RegionStore::new();
        let mut log = UndoLog::new();
        insert_recorded(&mut store, &mut log, &regions(1));
        log.undo(&mut store);
        assert!(log.can_redo());

        insert_recorded(&mut store, &mut log, &regions(2)[1..]);
        assert!(!log.can_redo());
        assert_eq!(log.undo_count(), 1);
    }

    #[test]
    fn records_are_suppressed_while_replaying() {
        let mut log = UndoLog::new();
        log.record_insert(&regions(1));

        let pending = log.begin_undo().expect("entry should be pending");
        assert!(log.is_replaying());
        assert!(!log.record_insert(&regions(2)));
        assert!(log.begin_redo().is_none());

        let counter = RegionCommand::insert(&regions(1));
        log.finish_replay(pending, counter);
        assert!(!log.is_replaying());
        assert_eq!(log.undo_count(), 0);
        assert_eq!(log.redo_count(), 1);
    }

    #[test]
    fn empty_batches_are_not_recorded() {
        let mut log = UndoLog::new();
        assert!(!log.record_remove(&[]));
        assert!(!log.can_undo());
    }

    #[test]
    fn amend_insert_replaces_matching_top_snapshot() {
        let mut log = UndoLog::new();
        let mut region = Region::with_id("drag", RegionKind::Pixelate, Rect::new(0.1, 0.1, 0.0, 0.0));
        log.record_insert(std::slice::from_ref(&region));

        region.rect = Rect::new(0.1, 0.1, 0.2, 0.2);
        assert!(log.amend_insert(&region));
        assert_eq!(log.undo_count(), 1);

        let mut store = RegionStore::new();
        store.insert([region.clone()]);
        log.undo(&mut store);
        log.redo(&mut store);
        assert_eq!(store.regions(), &[region]);
    }

    #[test]
    fn amend_insert_records_fresh_entry_when_top_differs() {
        let mut log = UndoLog::new();
        log.record_insert(&regions(2));
        let other = Region::with_id("other", RegionKind::Blur, Rect::unit());
        assert!(log.amend_insert(&other));
        assert_eq!(log.undo_count(), 2);
        assert_eq!(log.undo_name(), Some("Insert Region"));
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut log = UndoLog::with_limit(Some(2));
        for region in regions(4) {
            log.record_insert(&[region]);
        }
        assert_eq!(log.undo_count(), 2);

        let mut store = RegionStore::new();
        store.insert(regions(4));
        log.undo(&mut store);
        log.undo(&mut store);
        assert!(log.undo(&mut store).is_none());
        let ids = store.regions().iter().map(Region::id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["r0", "r1"]);
    }

    #[test]
    fn replay_skips_malformed_entries_but_applies_the_rest() {
        let mut store = RegionStore::new();
        let mut log = UndoLog::new();
        let good = regions(1);
        log.record(UndoEntry {
            name: action_name("Delete", 2),
            command: RegionCommand::Insert(vec![
                good[0].snapshot(),
                RegionSnapshot {
                    id: "broken".to_string(),
                    kind: 0,
                    rect: "{{oops}}".to_string(),
                },
            ]),
        });

        log.undo(&mut store);
        assert_eq!(store.regions(), good.as_slice());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut store = RegionStore::new();
        let mut log = UndoLog::new();
        insert_recorded(&mut store, &mut log, &regions(2));
        log.undo(&mut store);
        insert_recorded(&mut store, &mut log, &regions(1));
        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}
