pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod id;
pub mod layout;
pub mod model;
pub mod rules;
pub mod scene;

pub use error::{LayoutError, ReparentError};
pub use geometry::{MAX_ZOOM, MIN_ZOOM, Point, Rect, Size, Transform};
pub use hierarchy::{Hierarchy, would_create_cycle};
pub use id::ResourceId;
pub use layout::{LayoutConfig, RankDirection, layout};
pub use model::*;
pub use rules::{ContainmentRules, RuleTable};
pub use scene::{DropCandidate, SceneEdge, SceneGraph, SceneNode};
