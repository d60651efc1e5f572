//! Diagram session: resources, layout and interaction in one place.
//!
//! The session holds the current resource snapshot and the scene graph laid
//! out from it, and routes input through the [`InteractionController`].
//!
//! - **Input → intents**: [`DiagramSession::handle`] resolves an event
//!   against the current scene and returns what the host should persist.
//! - **Intents → snapshot**: [`DiagramSession::apply_intent`] optionally
//!   echoes an intent locally before the host confirms it, so the canvas does
//!   not wait on a round trip. The host's next `set_resources` call replaces
//!   the echo with the authoritative state.
//!
//! Every change to the snapshot produces a fresh scene graph; geometry is
//! never patched in place.

use crate::controller::InteractionController;
use crate::input::InputEvent;
use crate::intent::{Intent, Intents};
use ic_core::{
    ContainmentRules, DependencyEdge, Hierarchy, LayoutConfig, LayoutError, ReparentError,
    ResourceId, ResourceNode, RuleTable, SceneGraph, Size, TypeCatalog, layout,
};
use ic_render::{CanvasTheme, DisplayList, Overlay, build_display_list};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Reparent(#[from] ReparentError),

    #[error("{0} must be created inside a container")]
    RequiresParent(String),
}

pub struct DiagramSession {
    resources: Vec<ResourceNode>,
    edges: Vec<DependencyEdge>,
    catalog: TypeCatalog,
    config: LayoutConfig,
    rules: Box<dyn ContainmentRules>,
    scene: SceneGraph,
    controller: InteractionController,
}

impl Default for DiagramSession {
    fn default() -> Self {
        Self::new(RuleTable::new())
    }
}

impl DiagramSession {
    pub fn new(rules: impl ContainmentRules + 'static) -> Self {
        Self {
            resources: Vec::new(),
            edges: Vec::new(),
            catalog: TypeCatalog::default(),
            config: LayoutConfig::default(),
            rules: Box::new(rules),
            scene: SceneGraph::empty(),
            controller: InteractionController::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    pub fn resource(&self, id: ResourceId) -> Option<&ResourceNode> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn rules(&self) -> &dyn ContainmentRules {
        self.rules.as_ref()
    }

    pub fn selected(&self) -> Option<ResourceId> {
        self.controller.selected()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.controller.set_viewport(viewport);
    }

    pub fn overlay(&self) -> Overlay {
        self.controller.overlay(&self.scene)
    }

    /// Draw commands for the current frame.
    pub fn display_list(&self, theme: &CanvasTheme) -> DisplayList {
        build_display_list(
            &self.scene,
            self.controller.transform(),
            &self.overlay(),
            theme,
            self.controller.viewport(),
        )
    }

    // ─── Inputs from the host ────────────────────────────────────────────

    /// Replace the resource snapshot and lay it out. On error the previous
    /// snapshot and scene stay in place. Any gesture in progress is dropped
    /// either way.
    pub fn set_resources(&mut self, resources: Vec<ResourceNode>) -> Result<(), LayoutError> {
        self.controller.cancel();
        let scene = layout(&resources, &self.catalog, &self.edges, &self.config).inspect_err(|e| {
            log::warn!("keeping previous scene: {e}");
        })?;
        self.resources = resources;
        self.commit(scene);
        Ok(())
    }

    pub fn set_edges(&mut self, edges: Vec<DependencyEdge>) -> Result<(), LayoutError> {
        let scene = layout(&self.resources, &self.catalog, &edges, &self.config)?;
        self.edges = edges;
        self.commit(scene);
        Ok(())
    }

    pub fn set_catalog(&mut self, catalog: TypeCatalog) -> Result<(), LayoutError> {
        let scene = layout(&self.resources, &catalog, &self.edges, &self.config)?;
        self.catalog = catalog;
        self.commit(scene);
        Ok(())
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), LayoutError> {
        let scene = layout(&self.resources, &self.catalog, &self.edges, &config)?;
        self.config = config;
        self.commit(scene);
        Ok(())
    }

    pub fn set_rules(&mut self, rules: impl ContainmentRules + 'static) {
        self.controller.cancel();
        self.rules = Box::new(rules);
    }

    // ─── Interaction ─────────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> Intents {
        self.controller
            .handle(event, &self.scene, self.rules.as_ref())
    }

    /// Echo `intent` into the local snapshot and relayout. Returns the id of
    /// a resource the intent created. Intents that carry no data change are
    /// accepted and ignored.
    pub fn apply_intent(&mut self, intent: &Intent) -> Result<Option<ResourceId>, SessionError> {
        match intent {
            Intent::Move { id, position } => {
                let Some(resource) = self.resources.iter_mut().find(|r| r.id == *id) else {
                    return Err(ReparentError::UnknownResource(*id).into());
                };
                // Nested resources sit on their container's grid.
                if resource.parent.is_none() || self.scene.get(*id).is_some_and(|n| n.parent.is_none()) {
                    resource.position = Some(*position);
                    self.relayout()?;
                }
                Ok(None)
            }
            Intent::Reparent { id, new_parent } => {
                self.request_reparent(*id, *new_parent)?;
                Ok(None)
            }
            Intent::CreateUnderParent {
                parent,
                resource_type,
            } => {
                let parent_type = self
                    .resource(*parent)
                    .map(|p| p.kind.clone())
                    .ok_or(ReparentError::UnknownResource(*parent))?;
                if !self.rules.can_contain(&parent_type, resource_type) {
                    return Err(ReparentError::NotAllowed {
                        parent_type,
                        child_type: resource_type.clone(),
                    }
                    .into());
                }
                let mut node = new_resource(resource_type);
                node.parent = Some(*parent);
                self.insert(node).map(Some)
            }
            Intent::CreateAtRoot {
                resource_type,
                position,
            } => {
                if self.rules.requires_parent(resource_type) {
                    return Err(SessionError::RequiresParent(resource_type.clone()));
                }
                let mut node = new_resource(resource_type);
                node.position = Some(*position);
                self.insert(node).map(Some)
            }
            Intent::Select { .. }
            | Intent::ClearSelection
            | Intent::DropTargetChanged { .. }
            | Intent::AddChildRequested { .. } => Ok(None),
        }
    }

    /// Move `id` under `new_parent` after checking existence, containment
    /// rules and cycles. A refused reparent leaves everything untouched.
    pub fn request_reparent(
        &mut self,
        id: ResourceId,
        new_parent: ResourceId,
    ) -> Result<(), SessionError> {
        {
            let hierarchy = Hierarchy::build(&self.resources)?;
            hierarchy
                .check_reparent(id, new_parent, self.rules.as_ref())
                .inspect_err(|e| log::debug!("reparent refused: {e}"))?;
        }

        let Some(resource) = self.resources.iter_mut().find(|r| r.id == id) else {
            return Err(ReparentError::UnknownResource(id).into());
        };
        let previous = (resource.parent, resource.position);
        resource.parent = Some(new_parent);
        resource.position = None;

        if let Err(e) = self.relayout() {
            if let Some(resource) = self.resources.iter_mut().find(|r| r.id == id) {
                (resource.parent, resource.position) = previous;
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Labels from the root down to `id`.
    pub fn hierarchy_path(&self, id: ResourceId) -> Option<String> {
        self.scene.hierarchy_path(id)
    }

    fn insert(&mut self, node: ResourceNode) -> Result<ResourceId, SessionError> {
        let id = node.id;
        self.resources.push(node);
        if let Err(e) = self.relayout() {
            self.resources.pop();
            return Err(e.into());
        }
        Ok(id)
    }

    fn relayout(&mut self) -> Result<(), LayoutError> {
        let scene = layout(&self.resources, &self.catalog, &self.edges, &self.config)?;
        self.commit(scene);
        Ok(())
    }

    fn commit(&mut self, scene: SceneGraph) {
        self.controller.cancel();
        if self
            .controller
            .selected()
            .is_some_and(|id| scene.get(id).is_none())
        {
            self.controller.select(None);
        }
        self.scene = scene;
    }
}

/// A fresh resource with a generated id, labelled after its id.
fn new_resource(resource_type: &str) -> ResourceNode {
    let prefix: String = resource_type
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let id = ResourceId::with_prefix(&prefix);
    ResourceNode::new(id.as_str(), resource_type)
}
