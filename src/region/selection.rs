use super::*;

impl RegionStore {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.contains(id)
    }

    pub fn selection_count(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn selected_regions(&self) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|region| self.is_selected(region.id()))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected_regions()
            .into_iter()
            .map(|region| region.id().to_string())
            .collect()
    }

    pub fn select(&mut self, id: &str) -> bool {
        if self.is_selected(id) || !self.contains_id(id) {
            return false;
        }
        self.selected_ids.insert(id.to_string())
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.selected_ids.remove(id)
    }

    pub fn select_all(&mut self) -> bool {
        let before = self.selected_ids.len();
        self.selected_ids
            .extend(self.regions.iter().map(|region| region.id().to_string()));
        self.selected_ids.len() != before
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = !self.selected_ids.is_empty();
        self.selected_ids.clear();
        changed
    }
}
