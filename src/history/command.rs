use crate::region::{decode_batch, Region, RegionSnapshot, RegionStore};

pub trait UndoTarget {
    fn insert_regions(&mut self, regions: Vec<Region>);
    fn remove_regions(&mut self, ids: &[String]) -> Vec<Region>;
}

impl UndoTarget for RegionStore {
    fn insert_regions(&mut self, regions: Vec<Region>) {
        self.insert(regions);
    }

    fn remove_regions(&mut self, ids: &[String]) -> Vec<Region> {
        self.remove(ids)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionCommand {
    Insert(Vec<RegionSnapshot>),
    Remove(Vec<RegionSnapshot>),
}

impl RegionCommand {
    pub fn insert(regions: &[Region]) -> Self {
        Self::Insert(regions.iter().map(Region::snapshot).collect())
    }

    pub fn remove(regions: &[Region]) -> Self {
        Self::Remove(regions.iter().map(Region::snapshot).collect())
    }

    pub fn snapshots(&self) -> &[RegionSnapshot] {
        match self {
            Self::Insert(snapshots) | Self::Remove(snapshots) => snapshots,
        }
    }

    /// Runs the command and returns the command that reverts it.
    /// Malformed snapshots are skipped; the rest of the batch still applies.
    pub fn apply<T: UndoTarget + ?Sized>(&self, target: &mut T) -> RegionCommand {
        match self {
            Self::Insert(snapshots) => {
                let regions = decode_batch(snapshots);
                let counter = Self::remove(&regions);
                target.insert_regions(regions);
                counter
            }
            Self::Remove(snapshots) => {
                let ids = decode_batch(snapshots)
                    .into_iter()
                    .map(|region| region.id().to_string())
                    .collect::<Vec<_>>();
                let removed = target.remove_regions(&ids);
                Self::insert(&removed)
            }
        }
    }
}
