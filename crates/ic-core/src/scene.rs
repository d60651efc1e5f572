//! The per-frame scene graph: positioned nodes plus hit-testing.
//!
//! A `SceneGraph` is produced by [`crate::layout::layout`] and never patched
//! afterwards; any change to the resources produces a fresh one. Nodes are
//! stored in paint order (parents before children, siblings in input order).
//!
//! Hit-testing walks nodes by descending depth so that a point over a child
//! resolves to the child even though it is also inside every ancestor.

use crate::error::LayoutError;
use crate::geometry::{Point, Rect};
use crate::hierarchy;
use crate::id::ResourceId;
use crate::model::{DependencyKind, ResourceStatus};
use crate::rules::ContainmentRules;
use smallvec::SmallVec;
use std::collections::HashMap;

/// A positioned resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: ResourceId,
    /// Resource type tag.
    pub kind: String,
    pub label: String,
    pub status: ResourceStatus,
    /// Absolute world-space bounds.
    pub bounds: Rect,
    /// Offset from the parent's top-left; world position for roots.
    pub relative: Point,
    pub is_container: bool,
    pub padding: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub children: SmallVec<[ResourceId; 4]>,
    /// Nesting level, used as z-index. Roots are 0.
    pub depth: usize,
    pub parent: Option<ResourceId>,
}

impl SceneNode {
    /// Label band at the top of a container.
    pub fn header_band(&self) -> Option<Rect> {
        self.is_container.then(|| {
            Rect::new(
                self.bounds.x,
                self.bounds.y,
                self.bounds.width,
                self.header_height,
            )
        })
    }

    /// The add-child band at the bottom of a container.
    pub fn footer_band(&self) -> Option<Rect> {
        self.is_container.then(|| {
            Rect::new(
                self.bounds.x,
                self.bounds.bottom() - self.footer_height,
                self.bounds.width,
                self.footer_height,
            )
        })
    }
}

/// A dependency connector between two laid-out resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEdge {
    pub from: ResourceId,
    pub to: ResourceId,
    pub kind: DependencyKind,
}

/// The deepest node under a point, and whether it accepts the dragged type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropCandidate {
    pub id: ResourceId,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    index: HashMap<ResourceId, usize>,
    /// Node indices by descending depth, topmost sibling first.
    hit_order: Vec<usize>,
    edges: Vec<SceneEdge>,
}

impl SceneGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index freshly laid-out nodes. Fails if any node names a child that
    /// is not part of the same pass.
    pub(crate) fn assemble(nodes: Vec<SceneNode>, edges: Vec<SceneEdge>) -> Result<Self, LayoutError> {
        let index: HashMap<ResourceId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        for node in &nodes {
            if let Some(missing) = node.children.iter().find(|c| !index.contains_key(c)) {
                return Err(LayoutError::DanglingChild {
                    parent: node.id,
                    child: *missing,
                });
            }
        }

        let mut hit_order: Vec<usize> = (0..nodes.len()).collect();
        hit_order.sort_by(|&a, &b| nodes[b].depth.cmp(&nodes[a].depth).then(b.cmp(&a)));

        Ok(Self {
            nodes,
            index,
            hit_order,
            edges,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ResourceId) -> Option<&SceneNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Nodes in paint order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SceneEdge] {
        &self.edges
    }

    pub fn roots(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| n.parent.is_none())
    }

    /// The deepest node whose bounds contain `p`.
    pub fn hit_test(&self, p: Point) -> Option<ResourceId> {
        self.hit_order
            .iter()
            .map(|&i| &self.nodes[i])
            .find(|n| n.bounds.contains(p))
            .map(|n| n.id)
    }

    /// The deepest node under `p` outside the subtree of `ignore`, tagged
    /// with whether it may contain `dragged_type`.
    pub fn drop_candidate(
        &self,
        p: Point,
        dragged_type: &str,
        rules: &dyn ContainmentRules,
        ignore: Option<ResourceId>,
    ) -> Option<DropCandidate> {
        let node = self
            .hit_order
            .iter()
            .map(|&i| &self.nodes[i])
            .filter(|n| ignore.is_none_or(|skip| !self.is_within(n.id, skip)))
            .find(|n| n.bounds.contains(p))?;
        Some(DropCandidate {
            id: node.id,
            valid: node.is_container && rules.can_contain(&node.kind, dragged_type),
        })
    }

    /// The container a `dragged_type` would be dropped into at `p`, if the
    /// deepest node there accepts it. There is no fallback to an ancestor.
    pub fn resolve_drop_target(
        &self,
        p: Point,
        dragged_type: &str,
        rules: &dyn ContainmentRules,
    ) -> Option<ResourceId> {
        self.drop_candidate(p, dragged_type, rules, None)
            .filter(|c| c.valid)
            .map(|c| c.id)
    }

    /// Whether `id` is `ancestor` or nested anywhere below it.
    pub fn is_within(&self, id: ResourceId, ancestor: ResourceId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get(c).and_then(|n| n.parent);
        }
        false
    }

    pub fn would_create_cycle(&self, node: ResourceId, new_parent: ResourceId) -> bool {
        hierarchy::would_create_cycle(node, new_parent, |id| self.get(id).and_then(|n| n.parent))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            out.push(p);
            current = self.get(p).and_then(|n| n.parent);
        }
        out
    }

    /// Everything nested under `id`, pre-order.
    pub fn descendants(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let Some(node) = self.get(id) else {
            return out;
        };
        let mut stack: Vec<ResourceId> = node.children.iter().rev().copied().collect();
        while let Some(c) = stack.pop() {
            out.push(c);
            if let Some(n) = self.get(c) {
                stack.extend(n.children.iter().rev());
            }
        }
        out
    }

    /// Ids back to front, the order the renderer draws them in.
    pub fn paint_order(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Labels from the root down to `id`, joined by `" > "`.
    pub fn hierarchy_path(&self, id: ResourceId) -> Option<String> {
        let node = self.get(id)?;
        let mut labels: Vec<&str> = self
            .ancestors(id)
            .iter()
            .rev()
            .filter_map(|a| self.get(*a).map(|n| n.label.as_str()))
            .collect();
        labels.push(&node.label);
        Some(labels.join(" > "))
    }

    /// Union of all root bounds.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.roots()
            .map(|n| n.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// The add-child band of container `id`.
    pub fn footer_band(&self, id: ResourceId) -> Option<Rect> {
        self.get(id)?.footer_band()
    }
}
