use std::collections::HashSet;

use super::Region;
use crate::geometry::Rect;

#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    pub(super) regions: Vec<Region>,
    pub(super) selected_ids: HashSet<String>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub(super) fn index_of(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|region| region.id() == id)
    }

    pub fn insert(&mut self, regions: impl IntoIterator<Item = Region>) {
        self.regions.extend(regions);
    }

    /// Deselects and deletes each known id. Unknown ids are skipped.
    /// Returns the removed regions as they were at removal time.
    pub fn remove<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<Region> {
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let Some(index) = self.index_of(id) else {
                continue;
            };
            self.selected_ids.remove(id);
            removed.push(self.regions.remove(index));
        }
        removed
    }

    pub fn detach(&mut self, id: &str) -> Option<Region> {
        let index = self.index_of(id)?;
        Some(self.regions.remove(index))
    }

    pub fn set_rect(&mut self, id: &str, rect: Rect) -> bool {
        match self.regions.iter_mut().find(|region| region.id() == id) {
            Some(region) => {
                region.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.selected_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionKind;

    fn region(id: &str, rect: Rect) -> Region {
        Region::with_id(id, RegionKind::Pixelate, rect)
    }

    #[test]
    fn insert_appends_in_order() {
        let mut store = RegionStore::new();
        store.insert(vec![region("a", Rect::unit()), region("b", Rect::unit())]);
        store.insert([region("c", Rect::unit())]);
        let ids = store.regions().iter().map(Region::id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_then_remove_restores_previous_state() {
        let mut store = RegionStore::new();
        store.insert([region("base", Rect::new(0.0, 0.0, 0.5, 0.5))]);
        store.select("base");
        let regions_before = store.regions().to_vec();
        let selection_before = store.selected_ids.clone();

        let added = region("added", Rect::new(0.2, 0.2, 0.1, 0.1));
        store.insert([added.clone()]);
        store.select("added");
        let removed = store.remove(&["added"]);

        assert_eq!(removed, vec![added]);
        assert_eq!(store.regions(), regions_before.as_slice());
        assert_eq!(store.selected_ids, selection_before);
    }

    #[test]
    fn remove_deselects_and_skips_unknown_ids() {
        let mut store = RegionStore::new();
        store.insert([region("a", Rect::unit()), region("b", Rect::unit())]);
        store.select_all();

        let removed = store.remove(&["missing", "a"]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), "a");
        assert!(!store.is_selected("a"));
        assert_eq!(store.selection_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn detach_keeps_selection_entry() {
        let mut store = RegionStore::new();
        store.insert([region("a", Rect::unit())]);
        store.select("a");

        let detached = store.detach("a").expect("region should detach");
        store.insert([detached]);
        assert!(store.is_selected("a"));
        assert!(store.detach("missing").is_none());
    }

    #[test]
    fn set_rect_reports_unknown_ids() {
        let mut store = RegionStore::new();
        store.insert([region("a", Rect::unit())]);
        assert!(store.set_rect("a", Rect::new(0.1, 0.1, 0.2, 0.2)));
        assert_eq!(store.get("a").map(|r| r.rect), Some(Rect::new(0.1, 0.1, 0.2, 0.2)));
        assert!(!store.set_rect("b", Rect::unit()));
    }
}
