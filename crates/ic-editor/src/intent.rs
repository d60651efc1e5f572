//! Intents: what the canvas asks the outside world to do.
//!
//! The controller never mutates resource data. It emits intents, and the
//! host (or [`crate::session::DiagramSession`] as an optimistic echo) turns
//! them into persisted changes.

use ic_core::{Point, ResourceId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    Select {
        id: ResourceId,
    },
    ClearSelection,
    /// New top-left of `id`: relative to its (new) parent, or a world
    /// position for roots.
    Move {
        id: ResourceId,
        position: Point,
    },
    Reparent {
        id: ResourceId,
        new_parent: ResourceId,
    },
    CreateUnderParent {
        parent: ResourceId,
        resource_type: String,
    },
    CreateAtRoot {
        resource_type: String,
        position: Point,
    },
    /// The container a drop would land in changed; `None` clears it.
    DropTargetChanged {
        target: Option<ResourceId>,
    },
    /// The add-child band of `parent` was pressed.
    AddChildRequested {
        parent: ResourceId,
    },
}

impl Intent {
    /// Whether applying this intent changes resource data.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Move { .. }
                | Self::Reparent { .. }
                | Self::CreateUnderParent { .. }
                | Self::CreateAtRoot { .. }
        )
    }
}

/// Intents emitted by one input event. Rarely more than two.
pub type Intents = SmallVec<[Intent; 2]>;
