use super::*;
use crate::geometry::Point;

impl RegionStore {
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id() == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn hit_test(&self, point: Point) -> Option<&Region> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.rect.contains(point))
    }
}
