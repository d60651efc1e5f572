//! The containment tree induced by `ResourceNode::parent`.
//!
//! Building a [`Hierarchy`] is where malformed input is triaged: duplicate
//! ids keep their first record, dangling parent references become roots,
//! and any parent cycle rejects the whole input before layout starts.

use crate::error::{LayoutError, ReparentError};
use crate::id::ResourceId;
use crate::model::ResourceNode;
use crate::rules::ContainmentRules;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Whether making `new_parent` the parent of `node` would close a cycle.
///
/// Walks the ancestor chain starting at `new_parent` using `parent_of`; a
/// cycle exists if the walk reaches `node`. A chain that loops back on itself
/// without reaching `node` is treated as a cycle too.
pub fn would_create_cycle<F>(node: ResourceId, new_parent: ResourceId, parent_of: F) -> bool
where
    F: Fn(ResourceId) -> Option<ResourceId>,
{
    let mut visited = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(id) = current {
        if id == node || !visited.insert(id) {
            return true;
        }
        current = parent_of(id);
    }
    false
}

#[derive(Debug)]
pub struct Hierarchy<'a> {
    records: Vec<&'a ResourceNode>,
    index: HashMap<ResourceId, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<SmallVec<[usize; 4]>>,
    roots: Vec<usize>,
}

impl<'a> Hierarchy<'a> {
    /// Index `resources` and validate their parent links.
    pub fn build(resources: &'a [ResourceNode]) -> Result<Self, LayoutError> {
        let mut records: Vec<&ResourceNode> = Vec::with_capacity(resources.len());
        let mut index = HashMap::with_capacity(resources.len());
        for resource in resources {
            if index.contains_key(&resource.id) {
                log::warn!("duplicate resource id {}; keeping the first record", resource.id);
                continue;
            }
            index.insert(resource.id, records.len());
            records.push(resource);
        }

        let parents: Vec<Option<usize>> = records
            .iter()
            .map(|r| {
                let parent = r.parent?;
                match index.get(&parent) {
                    Some(&p) => Some(p),
                    None => {
                        log::warn!(
                            "resource {} references missing parent {}; laying it out as a root",
                            r.id,
                            parent
                        );
                        None
                    }
                }
            })
            .collect();

        detect_cycle(&records, &parents)?;

        let mut children: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); records.len()];
        let mut roots = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        Ok(Self {
            records,
            index,
            parents,
            children,
            roots,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: ResourceId) -> Option<&'a ResourceNode> {
        self.index.get(&id).map(|&i| self.records[i])
    }

    /// Effective parent: `None` for roots and for orphaned references.
    pub fn parent(&self, id: ResourceId) -> Option<ResourceId> {
        let i = *self.index.get(&id)?;
        self.parents[i].map(|p| self.records[p].id)
    }

    /// Children of `id` in input order.
    pub fn children(&self, id: ResourceId) -> Vec<ResourceId> {
        self.index
            .get(&id)
            .map(|&i| self.children[i].iter().map(|&c| self.records[c].id).collect())
            .unwrap_or_default()
    }

    /// Root resources in input order.
    pub fn roots(&self) -> impl Iterator<Item = &'a ResourceNode> + '_ {
        self.roots.iter().map(|&i| self.records[i])
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// All resources nested under `id`, pre-order.
    pub fn descendants(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let Some(&start) = self.index.get(&id) else {
            return out;
        };
        let mut stack: Vec<usize> = self.children[start].iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(self.records[i].id);
            stack.extend(self.children[i].iter().rev());
        }
        out
    }

    /// Nesting depth; roots are 0.
    pub fn depth(&self, id: ResourceId) -> usize {
        self.ancestors(id).len()
    }

    /// Labels from the root down to `id`, e.g. `main > private-a > web`.
    pub fn hierarchy_path(&self, id: ResourceId) -> Option<String> {
        let node = self.get(id)?;
        let mut labels: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .filter_map(|a| self.get(a).map(|r| r.display_label()))
            .collect();
        labels.push(node.display_label());
        Some(labels.join(" > "))
    }

    /// Validate moving `node` under `new_parent`: both must exist, the
    /// containment rules must allow it, and no cycle may result.
    pub fn check_reparent(
        &self,
        node: ResourceId,
        new_parent: ResourceId,
        rules: &dyn ContainmentRules,
    ) -> Result<(), ReparentError> {
        let child = self.get(node).ok_or(ReparentError::UnknownResource(node))?;
        let parent = self
            .get(new_parent)
            .ok_or(ReparentError::UnknownResource(new_parent))?;
        if node == new_parent {
            return Err(ReparentError::SelfParent(node));
        }
        if would_create_cycle(node, new_parent, |id| self.parent(id)) {
            return Err(ReparentError::Cycle { node, new_parent });
        }
        if !rules.can_contain(&parent.kind, &child.kind) {
            return Err(ReparentError::NotAllowed {
                parent_type: parent.kind.clone(),
                child_type: child.kind.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn index_of(&self, id: ResourceId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn record(&self, i: usize) -> &'a ResourceNode {
        self.records[i]
    }

    pub(crate) fn parent_index(&self, i: usize) -> Option<usize> {
        self.parents[i]
    }

    pub(crate) fn child_indices(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }
}

/// Tri-colour walk up every parent chain.
fn detect_cycle(records: &[&ResourceNode], parents: &[Option<usize>]) -> Result<(), LayoutError> {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; records.len()];
    let mut path = Vec::new();
    for start in 0..records.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                DONE => break,
                ON_PATH => return Err(LayoutError::Cycle { id: records[i].id }),
                _ => {
                    state[i] = ON_PATH;
                    path.push(i);
                    current = parents[i];
                }
            }
        }
        for i in path.drain(..) {
            state[i] = DONE;
        }
    }
    Ok(())
}
