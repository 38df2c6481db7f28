mod query;
mod selection;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Rect, RectParseError};

pub use store::RegionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    #[default]
    Pixelate,
    Blur,
    BlackBar,
}

impl RegionKind {
    pub const ALL: [Self; 3] = [Self::Pixelate, Self::Blur, Self::BlackBar];

    pub const fn code(self) -> u8 {
        match self {
            Self::Pixelate => 0,
            Self::Blur => 1,
            Self::BlackBar => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pixelate),
            1 => Some(Self::Blur),
            2 => Some(Self::BlackBar),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pixelate => "Pixelate",
            Self::Blur => "Blur",
            Self::BlackBar => "Black Bar",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: String,
    kind: RegionKind,
    pub rect: Rect,
}

impl Region {
    pub fn new(kind: RegionKind, rect: Rect) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), kind, rect)
    }

    pub fn with_id(id: impl Into<String>, kind: RegionKind, rect: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            rect,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            id: self.id.clone(),
            kind: self.kind.code(),
            rect: self.rect.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub id: String,
    pub kind: u8,
    pub rect: String,
}

#[derive(Debug, Error)]
pub enum RegionDecodeError {
    #[error("unknown region kind code {0}")]
    UnknownKind(u8),
    #[error(transparent)]
    Rect(#[from] RectParseError),
    #[error("snapshot is not a valid region object: {0}")]
    Json(#[from] serde_json::Error),
}

impl TryFrom<&RegionSnapshot> for Region {
    type Error = RegionDecodeError;

    fn try_from(snapshot: &RegionSnapshot) -> Result<Self, Self::Error> {
        let kind = RegionKind::from_code(snapshot.kind)
            .ok_or(RegionDecodeError::UnknownKind(snapshot.kind))?;
        let rect = snapshot.rect.parse::<Rect>()?;
        Ok(Self::with_id(snapshot.id.clone(), kind, rect))
    }
}

pub fn decode_batch(snapshots: &[RegionSnapshot]) -> Vec<Region> {
    snapshots
        .iter()
        .filter_map(|snapshot| match Region::try_from(snapshot) {
            Ok(region) => Some(region),
            Err(err) => {
                tracing::warn!(id = %snapshot.id, %err, "dropping malformed region snapshot");
                None
            }
        })
        .collect()
}

/// Parses a JSON array of snapshots. Entries that are not snapshot objects
/// or do not decode are skipped; only a non-array document is an error.
pub fn decode_snapshots(json: &str) -> Result<Vec<Region>, RegionDecodeError> {
    let entries = serde_json::from_str::<Vec<serde_json::Value>>(json)?;
    let regions = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let decoded = serde_json::from_value::<RegionSnapshot>(entry)
                .map_err(RegionDecodeError::from)
                .and_then(|snapshot| Region::try_from(&snapshot));
            match decoded {
                Ok(region) => Some(region),
                Err(err) => {
                    tracing::warn!(index, %err, "skipping malformed region entry");
                    None
                }
            }
        })
        .collect();
    Ok(regions)
}

pub fn encode_snapshots(regions: &[Region]) -> Result<String, RegionDecodeError> {
    let snapshots = regions.iter().map(Region::snapshot).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&snapshots)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(RegionKind::Pixelate.code(), 0);
        assert_eq!(RegionKind::Blur.code(), 1);
        assert_eq!(RegionKind::BlackBar.code(), 2);
        for kind in RegionKind::ALL {
            assert_eq!(RegionKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(RegionKind::from_code(3), None);
    }

    #[test]
    fn new_regions_get_distinct_ids() {
        let a = Region::new(RegionKind::Blur, Rect::unit());
        let b = Region::new(RegionKind::Blur, Rect::unit());
        assert_ne!(a.id(), b.id());
        assert!(!a.id().is_empty());
    }

    #[test]
    fn snapshot_carries_code_and_encoded_rect() {
        let region = Region::with_id("r1", RegionKind::BlackBar, Rect::new(0.1, 0.2, 0.3, 0.4));
        let snapshot = region.snapshot();
        assert_eq!(snapshot.id, "r1");
        assert_eq!(snapshot.kind, 2);
        assert_eq!(snapshot.rect, "{{0.1,0.2},{0.3,0.4}}");

        let restored = Region::try_from(&snapshot).expect("snapshot should decode");
        assert_eq!(restored, region);
    }

    #[test]
    fn snapshot_decode_rejects_unknown_kind_and_bad_rect() {
        let bad_kind = RegionSnapshot {
            id: "a".to_string(),
            kind: 9,
            rect: "{{0,0},{1,1}}".to_string(),
        };
        assert!(matches!(
            Region::try_from(&bad_kind),
            Err(RegionDecodeError::UnknownKind(9))
        ));

        let bad_rect = RegionSnapshot {
            id: "b".to_string(),
            kind: 0,
            rect: "not a rect".to_string(),
        };
        assert!(matches!(
            Region::try_from(&bad_rect),
            Err(RegionDecodeError::Rect(_))
        ));
    }

    #[test]
    fn snapshot_with_empty_id_round_trips() {
        let region = Region::with_id("", RegionKind::Pixelate, Rect::new(0.2, 0.2, 0.1, 0.1));
        let restored = Region::try_from(&region.snapshot()).expect("snapshot should decode");
        assert_eq!(restored, region);
    }

    #[test]
    fn decode_batch_keeps_well_formed_entries() {
        let good = Region::with_id("good", RegionKind::Blur, Rect::new(0.0, 0.0, 0.5, 0.5));
        let batch = vec![
            RegionSnapshot {
                id: "broken".to_string(),
                kind: 0,
                rect: "{{0,0}".to_string(),
            },
            good.snapshot(),
        ];
        assert_eq!(decode_batch(&batch), vec![good]);
    }

    #[test]
    fn decode_snapshots_skips_entries_with_wrong_shape() {
        let json = r#"[
            {"id": "a", "kind": 0, "rect": "{{0.1,0.1},{0.2,0.2}}"},
            {"id": "b", "kind": "blur", "rect": "{{0,0},{1,1}}"},
            42,
            {"id": "c", "kind": 2, "rect": "{{0,0},{1,1}}"}
        ]"#;
        let regions = decode_snapshots(json).expect("array document should parse");
        let ids = regions.iter().map(Region::id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(regions[1].kind(), RegionKind::BlackBar);
    }

    #[test]
    fn decode_snapshots_rejects_non_array_document() {
        assert!(decode_snapshots(r#"{"id": "a"}"#).is_err());
    }

    #[test]
    fn encoded_snapshots_decode_back() {
        let regions = vec![
            Region::with_id("x", RegionKind::Pixelate, Rect::new(0.25, 0.5, -0.125, 0.75)),
            Region::with_id("y", RegionKind::Blur, Rect::unit()),
        ];
        let json = encode_snapshots(&regions).expect("snapshots should encode");
        assert_eq!(decode_snapshots(&json).expect("should decode"), regions);
    }
}
