//! Resource records as handed to the core by the persistence layer.
//!
//! A resource is plain data: a type tag, an optional parent reference and an
//! opaque configuration map. Geometry never lives here; it is derived fresh
//! on every layout pass (see [`crate::scene::SceneGraph`]).

use crate::geometry::{Point, Size};
use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deployment status reported for a resource. Drives the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Unknown,
    Planning,
    Applying,
    Created,
    Updating,
    Error,
    Destroyed,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Planning => "planning",
            Self::Applying => "applying",
            Self::Created => "created",
            Self::Updating => "updating",
            Self::Error => "error",
            Self::Destroyed => "destroyed",
        }
    }

    /// Statuses that represent an operation still running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Planning | Self::Applying | Self::Updating)
    }
}

/// One infrastructure resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourceId>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub configuration: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub status: ResourceStatus,
    /// Pinned world position. Honoured for root resources only; nested
    /// resources are always placed on their container's grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl ResourceNode {
    pub fn new(id: &str, kind: &str) -> Self {
        Self {
            id: ResourceId::intern(id),
            kind: kind.to_string(),
            parent: None,
            label: id.to_string(),
            configuration: serde_json::Map::new(),
            status: ResourceStatus::Unknown,
            position: None,
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(ResourceId::intern(parent));
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn pinned_at(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// The label, or the id when the label is blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }
}

/// How a dependency between two resources was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Inferred from attribute references.
    #[default]
    Implicit,
    /// Declared via `depends_on`.
    Explicit,
    /// Data source lookup.
    Data,
}

/// `from` depends on `to`. Influences root ordering and is drawn as a
/// connector; it never affects containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: ResourceId,
    pub to: ResourceId,
    #[serde(default)]
    pub kind: DependencyKind,
}

impl DependencyEdge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: ResourceId::intern(from),
            to: ResourceId::intern(to),
            kind: DependencyKind::Implicit,
        }
    }
}

// ─── Type catalog ────────────────────────────────────────────────────────

/// Default inner padding for containers whose metrics do not set one.
pub const DEFAULT_PADDING: f32 = 16.0;

/// Sizing metadata for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetrics {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub padding: Option<f32>,
    #[serde(default)]
    pub min_width: Option<f32>,
    #[serde(default)]
    pub min_height: Option<f32>,
    /// Container types reserve header/footer bands even when empty.
    #[serde(default)]
    pub container: bool,
}

impl TypeMetrics {
    pub const fn leaf(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            padding: None,
            min_width: None,
            min_height: None,
            container: false,
        }
    }

    pub const fn container(min_width: f32, min_height: f32) -> Self {
        Self {
            width: min_width,
            height: min_height,
            padding: None,
            min_width: Some(min_width),
            min_height: Some(min_height),
            container: true,
        }
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn base_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Minimum size; falls back to the base size.
    pub fn min_size(&self) -> Size {
        Size::new(
            self.min_width.unwrap_or(self.width),
            self.min_height.unwrap_or(self.height),
        )
    }

    /// Inner padding; unset, negative or non-finite values use the default.
    pub fn padding(&self) -> f32 {
        self.padding
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(DEFAULT_PADDING)
    }
}

impl Default for TypeMetrics {
    fn default() -> Self {
        Self::leaf(160.0, 64.0)
    }
}

/// Per-type sizing table with a mandatory fallback entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    #[serde(default)]
    pub default: TypeMetrics,
    #[serde(default)]
    pub types: HashMap<String, TypeMetrics>,
}

impl TypeCatalog {
    pub fn new(default: TypeMetrics) -> Self {
        Self {
            default,
            types: HashMap::new(),
        }
    }

    pub fn insert(&mut self, kind: &str, metrics: TypeMetrics) -> &mut Self {
        self.types.insert(kind.to_string(), metrics);
        self
    }

    pub fn with(mut self, kind: &str, metrics: TypeMetrics) -> Self {
        self.insert(kind, metrics);
        self
    }

    /// Metrics for `kind`, or the default entry for unknown types.
    pub fn metrics(&self, kind: &str) -> &TypeMetrics {
        self.types.get(kind).unwrap_or(&self.default)
    }
}
