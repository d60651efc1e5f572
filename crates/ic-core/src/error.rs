use crate::id::ResourceId;
use thiserror::Error;

/// Errors that abort a layout pass.
///
/// Expected user-driven outcomes (invalid drops, orphan references) are not
/// errors; only input that cannot be laid out at all, or a broken internal
/// invariant, ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The parent links contain a cycle through `id`.
    #[error("circular parent-child relationship detected at {id}")]
    Cycle { id: ResourceId },

    /// A scene node lists a child that was not produced in the same pass.
    #[error("scene node {parent} references missing child {child}")]
    DanglingChild {
        parent: ResourceId,
        child: ResourceId,
    },
}

/// Why a proposed reparent was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReparentError {
    #[error("unknown resource {0}")]
    UnknownResource(ResourceId),

    #[error("{0} cannot be its own parent")]
    SelfParent(ResourceId),

    #[error("moving {node} under {new_parent} would create a cycle")]
    Cycle {
        node: ResourceId,
        new_parent: ResourceId,
    },

    #[error("{parent_type} cannot contain {child_type}")]
    NotAllowed {
        parent_type: String,
        child_type: String,
    },
}
