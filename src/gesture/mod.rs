mod machine;

pub use machine::{GestureContext, GestureController, GestureEffects};

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Creating {
        id: String,
    },
    Moving {
        id: String,
        original: Rect,
        anchor: Point,
    },
}

impl GestureState {
    pub fn region_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Creating { id } | Self::Moving { id, .. } => Some(id),
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Creating { .. } => "creating",
            Self::Moving { .. } => "moving",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTransition {
    pub from: &'static str,
    pub phase: DragPhase,
    pub to: &'static str,
}

impl GestureTransition {
    fn new(from: &GestureState, phase: DragPhase, to: &GestureState) -> Self {
        Self {
            from: from.label(),
            phase,
            to: to.label(),
        }
    }
}
