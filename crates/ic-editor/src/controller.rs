//! Pointer interaction state machine.
//!
//! Owns the view transform and the in-flight gesture. Every input event is
//! resolved against the current [`SceneGraph`] by explicit depth-ordered
//! hit-testing and may emit [`Intent`]s; resource data is never touched here.
//!
//! ```text
//!            ┌──── primary down on background / middle down ────► Panning
//!   Idle ────┼──── primary down on node ─────────────────────────► DraggingNode
//!            └──── drag enter (palette item) ────────────────────► DraggingExternal
//! ```
//!
//! Each gesture returns to `Idle` on pointer-up (or drop / drag-leave),
//! Escape, pointer-cancel, or a relayout.

use crate::input::{InputEvent, PointerButton};
use crate::intent::{Intent, Intents};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use ic_core::{
    ContainmentRules, DropCandidate, Point, Rect, ResourceId, SceneGraph, Size, Transform,
};
use ic_render::{Ghost, Overlay};
use smallvec::smallvec;

/// Zoom multiplier per wheel notch or zoom shortcut.
pub const ZOOM_STEP: f32 = 1.1;
/// Screen margin kept around the content on zoom-to-fit.
pub const FIT_MARGIN: f32 = 40.0;
/// Screen distance a pressed pointer must travel before a drag counts.
pub const DRAG_THRESHOLD: f32 = 3.0;
/// Ghost size for palette items, which have no laid-out bounds yet.
const PALETTE_GHOST: Size = Size::new(120.0, 48.0);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        /// Last pointer position, screen space.
        last: Point,
    },
    DraggingNode {
        id: ResourceId,
        kind: String,
        /// Pointer minus node top-left at press time, world space.
        grab: Point,
        /// Press position, screen space.
        press: Point,
        /// Current pointer, world space.
        pointer: Point,
        moved: bool,
        candidate: Option<DropCandidate>,
        target: Option<ResourceId>,
    },
    DraggingExternal {
        resource_type: String,
        pointer: Point,
        candidate: Option<DropCandidate>,
        target: Option<ResourceId>,
    },
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::DraggingNode { .. } | Self::DraggingExternal { .. }
        )
    }

    fn target(&self) -> Option<ResourceId> {
        match self {
            Self::DraggingNode { target, .. } | Self::DraggingExternal { target, .. } => *target,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    transform: Transform,
    viewport: Size,
    selected: Option<ResourceId>,
}

impl InteractionController {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Transform::new(transform.pan_x, transform.pan_y, transform.zoom);
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn selected(&self) -> Option<ResourceId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<ResourceId>) {
        self.selected = id;
    }

    /// Resolve one input event.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        scene: &SceneGraph,
        rules: &dyn ContainmentRules,
    ) -> Intents {
        match event {
            InputEvent::PointerDown { x, y, button } => {
                self.pointer_down(Point::new(*x, *y), *button, scene)
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(*x, *y), scene, rules),
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(*x, *y), scene, rules),
            InputEvent::PointerCancel => self.cancel(),
            InputEvent::Wheel { x, y, delta_y } => {
                self.wheel(Point::new(*x, *y), *delta_y);
                Intents::new()
            }
            InputEvent::DragEnter {
                x,
                y,
                resource_type,
            } => self.drag_enter(Point::new(*x, *y), resource_type, scene, rules),
            InputEvent::DragOver { x, y } => self.drag_over(Point::new(*x, *y), scene, rules),
            InputEvent::DragLeave => match self.state {
                InteractionState::DraggingExternal { .. } => self.cancel(),
                _ => Intents::new(),
            },
            InputEvent::Drop { x, y } => self.drop_external(Point::new(*x, *y), scene, rules),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.shortcut(action, scene),
                None => Intents::new(),
            },
        }
    }

    /// Abandon the gesture in progress without emitting any data intent.
    pub fn cancel(&mut self) -> Intents {
        let had_target = self.state.target().is_some();
        if self.state != InteractionState::Idle {
            log::debug!("gesture cancelled");
        }
        self.state = InteractionState::Idle;
        if had_target {
            smallvec![Intent::DropTargetChanged { target: None }]
        } else {
            Intents::new()
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_about_center(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_about_center(1.0 / ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.transform.reset();
    }

    pub fn zoom_to_fit(&mut self, scene: &SceneGraph) {
        if let Some(bounds) = scene.content_bounds() {
            self.transform.fit(&bounds, self.viewport, FIT_MARGIN);
        }
    }

    /// Transient state for the renderer.
    pub fn overlay(&self, scene: &SceneGraph) -> Overlay {
        let mut overlay = Overlay {
            selected: self.selected,
            ..Overlay::default()
        };
        match &self.state {
            InteractionState::DraggingNode {
                id,
                grab,
                pointer,
                moved: true,
                candidate,
                ..
            } => {
                overlay.drop = *candidate;
                overlay.dragging = Some(*id);
                overlay.ghost = scene.get(*id).map(|node| Ghost {
                    bounds: Rect::from_origin_size(pointer.sub(*grab), node.bounds.size()),
                    label: node.label.clone(),
                });
            }
            InteractionState::DraggingExternal {
                resource_type,
                pointer,
                candidate,
                ..
            } => {
                overlay.drop = *candidate;
                overlay.ghost = Some(Ghost {
                    bounds: Rect::new(
                        pointer.x - PALETTE_GHOST.width / 2.0,
                        pointer.y - PALETTE_GHOST.height / 2.0,
                        PALETTE_GHOST.width,
                        PALETTE_GHOST.height,
                    ),
                    label: resource_type.clone(),
                });
            }
            _ => {}
        }
        overlay
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    fn pointer_down(&mut self, screen: Point, button: PointerButton, scene: &SceneGraph) -> Intents {
        if self.state != InteractionState::Idle {
            log::debug!("pointer down ignored in {:?}", self.state);
            return Intents::new();
        }

        match button {
            PointerButton::Middle => {
                self.state = InteractionState::Panning { last: screen };
                Intents::new()
            }
            PointerButton::Secondary => Intents::new(),
            PointerButton::Primary => {
                let world = self.transform.to_world(screen);
                let Some(node) = scene.hit_test(world).and_then(|id| scene.get(id)) else {
                    self.state = InteractionState::Panning { last: screen };
                    self.selected = None;
                    return smallvec![Intent::ClearSelection];
                };

                if node.footer_band().is_some_and(|band| band.contains(world)) {
                    return smallvec![Intent::AddChildRequested { parent: node.id }];
                }

                self.selected = Some(node.id);
                self.state = InteractionState::DraggingNode {
                    id: node.id,
                    kind: node.kind.clone(),
                    grab: world.sub(node.bounds.origin()),
                    press: screen,
                    pointer: world,
                    moved: false,
                    candidate: None,
                    target: None,
                };
                smallvec![Intent::Select { id: node.id }]
            }
        }
    }

    fn pointer_move(&mut self, screen: Point, scene: &SceneGraph, rules: &dyn ContainmentRules) -> Intents {
        let world = self.transform.to_world(screen);
        match &mut self.state {
            InteractionState::Panning { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.transform.pan(dx, dy);
                Intents::new()
            }
            InteractionState::DraggingNode {
                id,
                kind,
                press,
                pointer,
                moved,
                candidate,
                target,
                ..
            } => {
                *pointer = world;
                if !*moved && press.distance(screen) < DRAG_THRESHOLD {
                    return Intents::new();
                }
                *moved = true;
                *candidate = scene.drop_candidate(world, kind, rules, Some(*id));
                let next = valid_target(scene, *id, *candidate);
                retarget(target, next)
            }
            _ => Intents::new(),
        }
    }

    fn pointer_up(&mut self, screen: Point, scene: &SceneGraph, rules: &dyn ContainmentRules) -> Intents {
        match std::mem::take(&mut self.state) {
            InteractionState::DraggingNode {
                id,
                kind,
                grab,
                moved: true,
                target,
                ..
            } => {
                let world = self.transform.to_world(screen);
                let mut intents = Intents::new();
                if let Some(node) = scene.get(id) {
                    let candidate = scene.drop_candidate(world, &kind, rules, Some(id));
                    let new_parent = valid_target(scene, id, candidate)
                        .filter(|&parent| Some(parent) != node.parent);
                    let top_left = world.sub(grab);
                    let anchor = new_parent.or(node.parent).and_then(|p| scene.get(p));
                    let position = match anchor {
                        Some(parent) => top_left.sub(parent.bounds.origin()),
                        None => top_left,
                    };
                    intents.push(Intent::Move { id, position });
                    if let Some(new_parent) = new_parent {
                        intents.push(Intent::Reparent { id, new_parent });
                    } else if let Some(c) = candidate.filter(|c| !c.valid) {
                        log::debug!("{id} cannot be dropped into {}; keeping its parent", c.id);
                    }
                }
                if target.is_some() {
                    intents.push(Intent::DropTargetChanged { target: None });
                }
                intents
            }
            // A palette drag only ends on drop or leave.
            state @ InteractionState::DraggingExternal { .. } => {
                self.state = state;
                Intents::new()
            }
            _ => Intents::new(),
        }
    }

    fn wheel(&mut self, screen: Point, delta_y: f32) {
        if self.state.is_dragging() {
            return;
        }
        if delta_y < 0.0 {
            self.transform.zoom_at(screen, ZOOM_STEP);
        } else if delta_y > 0.0 {
            self.transform.zoom_at(screen, 1.0 / ZOOM_STEP);
        }
    }

    // ─── Palette drag-and-drop ───────────────────────────────────────────

    fn drag_enter(
        &mut self,
        screen: Point,
        resource_type: &str,
        scene: &SceneGraph,
        rules: &dyn ContainmentRules,
    ) -> Intents {
        if self.state.is_dragging() {
            return Intents::new();
        }
        self.state = InteractionState::DraggingExternal {
            resource_type: resource_type.to_string(),
            pointer: self.transform.to_world(screen),
            candidate: None,
            target: None,
        };
        self.drag_over(screen, scene, rules)
    }

    fn drag_over(&mut self, screen: Point, scene: &SceneGraph, rules: &dyn ContainmentRules) -> Intents {
        let world = self.transform.to_world(screen);
        let InteractionState::DraggingExternal {
            resource_type,
            pointer,
            candidate,
            target,
        } = &mut self.state
        else {
            return Intents::new();
        };
        *pointer = world;
        *candidate = scene.drop_candidate(world, resource_type, rules, None);
        let next = candidate.filter(|c| c.valid).map(|c| c.id);
        retarget(target, next)
    }

    fn drop_external(&mut self, screen: Point, scene: &SceneGraph, rules: &dyn ContainmentRules) -> Intents {
        if !matches!(self.state, InteractionState::DraggingExternal { .. }) {
            return Intents::new();
        }
        let InteractionState::DraggingExternal {
            resource_type,
            target,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return Intents::new();
        };

        let world = self.transform.to_world(screen);
        let mut intents = Intents::new();
        match scene.drop_candidate(world, &resource_type, rules, None) {
            Some(c) if c.valid => intents.push(Intent::CreateUnderParent {
                parent: c.id,
                resource_type,
            }),
            Some(c) => log::debug!("{} cannot be created inside {}", resource_type, c.id),
            None if rules.requires_parent(&resource_type) => {
                log::debug!("{resource_type} needs a parent; ignoring drop on background")
            }
            None => intents.push(Intent::CreateAtRoot {
                resource_type,
                position: world,
            }),
        }
        if target.is_some() {
            intents.push(Intent::DropTargetChanged { target: None });
        }
        intents
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    fn shortcut(&mut self, action: ShortcutAction, scene: &SceneGraph) -> Intents {
        if action == ShortcutAction::Cancel {
            return self.cancel();
        }
        if self.state.is_dragging() {
            return Intents::new();
        }
        match action {
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ResetZoom => self.reset_zoom(),
            ShortcutAction::ZoomToFit => self.zoom_to_fit(scene),
            ShortcutAction::Cancel => {}
        }
        Intents::new()
    }

    fn zoom_about_center(&mut self, factor: f32) {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.transform.zoom_at(center, factor);
    }
}

/// The candidate as a drop target for `dragged`, if it accepts it and the
/// move would not nest `dragged` inside itself.
fn valid_target(scene: &SceneGraph, dragged: ResourceId, candidate: Option<DropCandidate>) -> Option<ResourceId> {
    let c = candidate.filter(|c| c.valid)?;
    if scene.would_create_cycle(dragged, c.id) {
        log::debug!("dropping {dragged} into {} would create a cycle", c.id);
        return None;
    }
    Some(c.id)
}

/// Store `next` and emit a change intent if it differs.
fn retarget(current: &mut Option<ResourceId>, next: Option<ResourceId>) -> Intents {
    if *current == next {
        return Intents::new();
    }
    *current = next;
    smallvec![Intent::DropTargetChanged { target: next }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{LayoutConfig, ResourceNode, RuleTable, TypeCatalog, TypeMetrics, layout};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ResourceId {
        ResourceId::intern(s)
    }

    fn rules() -> RuleTable {
        RuleTable::new()
            .allow("network", &["subnet"])
            .allow("subnet", &["instance"])
    }

    /// Network `c_net` holding subnet `c_sub` holding instance `c_vm`, and
    /// an empty network `c_net2` pinned beside it.
    fn scene() -> SceneGraph {
        let catalog = TypeCatalog::new(TypeMetrics::leaf(100.0, 50.0))
            .with("network", TypeMetrics::container(300.0, 240.0))
            .with("subnet", TypeMetrics::container(200.0, 150.0));
        let resources = vec![
            ResourceNode::new("c_net", "network"),
            ResourceNode::new("c_sub", "subnet").with_parent("c_net"),
            ResourceNode::new("c_vm", "instance").with_parent("c_sub"),
            ResourceNode::new("c_net2", "network").pinned_at(600.0, 0.0),
        ];
        layout(&resources, &catalog, &[], &LayoutConfig::default()).unwrap()
    }

    fn center_of(scene: &SceneGraph, name: &str) -> Point {
        scene.get(id(name)).unwrap().bounds.center()
    }

    #[test]
    fn background_press_pans_and_clears_selection() {
        let scene = scene();
        let rules = rules();
        let mut ctl = InteractionController::new(Size::new(800.0, 600.0));

        let out = ctl.handle(&InputEvent::pointer_down(2000.0, 2000.0), &scene, &rules);
        assert_eq!(out.as_slice(), &[Intent::ClearSelection]);
        assert!(matches!(ctl.state(), InteractionState::Panning { .. }));

        ctl.handle(&InputEvent::pointer_move(2010.0, 2005.0), &scene, &rules);
        assert_eq!(ctl.transform().pan_x, 10.0);
        assert_eq!(ctl.transform().pan_y, 5.0);

        let out = ctl.handle(&InputEvent::pointer_up(2010.0, 2005.0), &scene, &rules);
        assert!(out.is_empty());
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn middle_button_pans_over_nodes() {
        let scene = scene();
        let vm = center_of(&scene, "c_vm");
        let mut ctl = InteractionController::default();
        let out = ctl.handle(
            &InputEvent::PointerDown {
                x: vm.x,
                y: vm.y,
                button: PointerButton::Middle,
            },
            &scene,
            &rules(),
        );
        assert!(out.is_empty());
        assert!(matches!(ctl.state(), InteractionState::Panning { .. }));
    }

    #[test]
    fn click_selects_without_moving() {
        let scene = scene();
        let rules = rules();
        let vm = center_of(&scene, "c_vm");
        let mut ctl = InteractionController::default();

        let out = ctl.handle(&InputEvent::pointer_down(vm.x, vm.y), &scene, &rules);
        assert_eq!(out.as_slice(), &[Intent::Select { id: id("c_vm") }]);
        assert_eq!(ctl.selected(), Some(id("c_vm")));

        ctl.handle(&InputEvent::pointer_move(vm.x + 1.0, vm.y), &scene, &rules);
        let out = ctl.handle(&InputEvent::pointer_up(vm.x + 1.0, vm.y), &scene, &rules);
        assert!(out.is_empty());
    }

    #[test]
    fn footer_press_requests_child() {
        let scene = scene();
        let band = scene.footer_band(id("c_net")).unwrap();
        let p = band.center();
        let mut ctl = InteractionController::default();
        let out = ctl.handle(&InputEvent::pointer_down(p.x, p.y), &scene, &rules());
        assert_eq!(
            out.as_slice(),
            &[Intent::AddChildRequested { parent: id("c_net") }]
        );
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn drag_subnet_into_other_network_reparents() {
        let scene = scene();
        let rules = rules();
        let sub = scene.get(id("c_sub")).unwrap().bounds;
        let net2 = scene.get(id("c_net2")).unwrap().bounds;
        let press = Point::new(sub.x + 5.0, sub.y + 5.0);
        let mut ctl = InteractionController::default();

        ctl.handle(&InputEvent::pointer_down(press.x, press.y), &scene, &rules);
        let over = Point::new(net2.x + 60.0, net2.y + 80.0);
        let out = ctl.handle(&InputEvent::pointer_move(over.x, over.y), &scene, &rules);
        assert_eq!(
            out.as_slice(),
            &[Intent::DropTargetChanged {
                target: Some(id("c_net2"))
            }]
        );
        assert_eq!(
            ctl.overlay(&scene).drop,
            Some(DropCandidate {
                id: id("c_net2"),
                valid: true
            })
        );

        let out = ctl.handle(&InputEvent::pointer_up(over.x, over.y), &scene, &rules);
        assert_eq!(
            out.as_slice(),
            &[
                Intent::Move {
                    id: id("c_sub"),
                    position: Point::new(55.0, 75.0),
                },
                Intent::Reparent {
                    id: id("c_sub"),
                    new_parent: id("c_net2"),
                },
                Intent::DropTargetChanged { target: None },
            ]
        );
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn drop_on_invalid_container_only_moves() {
        let scene = scene();
        let rules = rules();
        let vm = center_of(&scene, "c_vm");
        let net2 = scene.get(id("c_net2")).unwrap().bounds;
        let mut ctl = InteractionController::default();

        ctl.handle(&InputEvent::pointer_down(vm.x, vm.y), &scene, &rules);
        let over = Point::new(net2.x + 20.0, net2.y + 20.0);
        let out = ctl.handle(&InputEvent::pointer_move(over.x, over.y), &scene, &rules);
        // An instance cannot live directly in a network: no target.
        assert!(out.is_empty());
        assert_eq!(
            ctl.overlay(&scene).drop,
            Some(DropCandidate {
                id: id("c_net2"),
                valid: false
            })
        );

        let out = ctl.handle(&InputEvent::pointer_up(over.x, over.y), &scene, &rules);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Intent::Move { .. }));
    }

    #[test]
    fn releasing_a_container_over_its_own_child_never_reparents() {
        let scene = scene();
        // Even rules that accept anything must not nest c_sub inside c_vm.
        let anything = |_: &str, _: &str| true;
        for rules in [&rules() as &dyn ContainmentRules, &anything] {
            let sub = scene.get(id("c_sub")).unwrap().bounds;
            let vm = center_of(&scene, "c_vm");
            let subtree = [id("c_sub"), id("c_vm")];
            let mut ctl = InteractionController::default();

            let press = Point::new(sub.x + 5.0, sub.y + 5.0);
            ctl.handle(&InputEvent::pointer_down(press.x, press.y), &scene, rules);
            let mut emitted: Vec<Intent> = Vec::new();
            for step in 1..=4 {
                let t = step as f32 / 4.0;
                let p = Point::new(press.x + (vm.x - press.x) * t, press.y + (vm.y - press.y) * t);
                emitted.extend(ctl.handle(&InputEvent::pointer_move(p.x, p.y), &scene, rules));
                if let Some(c) = ctl.overlay(&scene).drop {
                    assert!(!subtree.contains(&c.id), "{} offered as its own drop target", c.id);
                }
            }
            assert!(vm.distance(press) > DRAG_THRESHOLD);

            emitted.extend(ctl.handle(&InputEvent::pointer_up(vm.x, vm.y), &scene, rules));
            assert!(
                !emitted.iter().any(|i| matches!(i, Intent::Reparent { .. })),
                "unexpected reparent in {emitted:?}"
            );
            for intent in &emitted {
                if let Intent::DropTargetChanged { target: Some(t) } = intent {
                    assert!(!subtree.contains(t));
                }
            }
            assert!(matches!(
                emitted.iter().find(|i| matches!(i, Intent::Move { .. })),
                Some(Intent::Move { id, .. }) if *id == ResourceId::intern("c_sub")
            ));
            assert_eq!(ctl.state(), &InteractionState::Idle);
        }
    }

    #[test]
    fn escape_cancels_drag_without_move() {
        let scene = scene();
        let rules = rules();
        let sub = scene.get(id("c_sub")).unwrap().bounds;
        let net2 = scene.get(id("c_net2")).unwrap().bounds;
        let mut ctl = InteractionController::default();

        ctl.handle(&InputEvent::pointer_down(sub.x + 5.0, sub.y + 5.0), &scene, &rules);
        ctl.handle(&InputEvent::pointer_move(net2.x + 50.0, net2.y + 50.0), &scene, &rules);
        let out = ctl.handle(&InputEvent::key("Escape"), &scene, &rules);
        assert_eq!(out.as_slice(), &[Intent::DropTargetChanged { target: None }]);
        assert_eq!(ctl.state(), &InteractionState::Idle);

        let out = ctl.handle(&InputEvent::pointer_up(net2.x + 50.0, net2.y + 50.0), &scene, &rules);
        assert!(out.is_empty());
    }

    #[test]
    fn wheel_is_ignored_while_dragging() {
        let scene = scene();
        let rules = rules();
        let vm = center_of(&scene, "c_vm");
        let mut ctl = InteractionController::default();

        ctl.handle(&InputEvent::pointer_down(vm.x, vm.y), &scene, &rules);
        ctl.handle(
            &InputEvent::Wheel {
                x: vm.x,
                y: vm.y,
                delta_y: -100.0,
            },
            &scene,
            &rules,
        );
        assert_eq!(ctl.transform(), &Transform::IDENTITY);

        ctl.cancel();
        ctl.handle(
            &InputEvent::Wheel {
                x: 100.0,
                y: 100.0,
                delta_y: -100.0,
            },
            &scene,
            &rules,
        );
        assert!((ctl.transform().zoom - ZOOM_STEP).abs() < 1e-6);
        // The point under the cursor stays put.
        let world = ctl.transform().to_world(Point::new(100.0, 100.0));
        assert!((world.x - 100.0).abs() < 1e-3 && (world.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn palette_drop_into_valid_container() {
        let scene = scene();
        let rules = rules();
        let mut ctl = InteractionController::default();

        let out = ctl.handle(
            &InputEvent::DragEnter {
                x: -500.0,
                y: -500.0,
                resource_type: "instance".into(),
            },
            &scene,
            &rules,
        );
        assert!(out.is_empty());

        // Pointer over the subnet's header, clear of the instance.
        let sub_bounds = scene.get(id("c_sub")).unwrap().bounds;
        let header = Point::new(sub_bounds.x + 4.0, sub_bounds.y + 4.0);
        let out = ctl.handle(&InputEvent::DragOver { x: header.x, y: header.y }, &scene, &rules);
        assert_eq!(
            out.as_slice(),
            &[Intent::DropTargetChanged {
                target: Some(id("c_sub"))
            }]
        );
        assert!(ctl.overlay(&scene).ghost.is_some());

        let out = ctl.handle(&InputEvent::Drop { x: header.x, y: header.y }, &scene, &rules);
        assert_eq!(
            out.as_slice(),
            &[
                Intent::CreateUnderParent {
                    parent: id("c_sub"),
                    resource_type: "instance".into(),
                },
                Intent::DropTargetChanged { target: None },
            ]
        );
    }

    #[test]
    fn palette_drop_on_background_creates_root_unless_parent_required() {
        let scene = scene();
        let mut ctl = InteractionController::default();
        let rules = rules();

        ctl.handle(
            &InputEvent::DragEnter {
                x: 1500.0,
                y: 40.0,
                resource_type: "network".into(),
            },
            &scene,
            &rules,
        );
        let out = ctl.handle(&InputEvent::Drop { x: 1500.0, y: 40.0 }, &scene, &rules);
        assert_eq!(
            out.as_slice(),
            &[Intent::CreateAtRoot {
                resource_type: "network".into(),
                position: Point::new(1500.0, 40.0),
            }]
        );

        let strict = rules.clone().require_parent("instance");
        ctl.handle(
            &InputEvent::DragEnter {
                x: 1500.0,
                y: 40.0,
                resource_type: "instance".into(),
            },
            &scene,
            &strict,
        );
        let out = ctl.handle(&InputEvent::Drop { x: 1500.0, y: 40.0 }, &scene, &strict);
        assert!(out.is_empty());
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn palette_drop_over_network_is_ignored() {
        let scene = scene();
        let rules = rules();
        let net2 = center_of(&scene, "c_net2");
        let mut ctl = InteractionController::default();
        ctl.handle(
            &InputEvent::DragEnter {
                x: net2.x,
                y: net2.y,
                resource_type: "instance".into(),
            },
            &scene,
            &rules,
        );
        let out = ctl.handle(&InputEvent::Drop { x: net2.x, y: net2.y }, &scene, &rules);
        assert!(out.is_empty());
    }

    #[test]
    fn shortcuts_drive_the_view() {
        let scene = scene();
        let rules = rules();
        let mut ctl = InteractionController::new(Size::new(800.0, 600.0));

        ctl.handle(&InputEvent::key("="), &scene, &rules);
        assert!(ctl.transform().zoom > 1.0);
        ctl.handle(&InputEvent::key("0"), &scene, &rules);
        assert_eq!(ctl.transform(), &Transform::IDENTITY);

        ctl.handle(&InputEvent::key("f"), &scene, &rules);
        let content = scene.content_bounds().unwrap();
        let on_screen = ctl.transform().rect_to_screen(&content);
        assert!(on_screen.x >= FIT_MARGIN - 0.5 && on_screen.right() <= 800.0 - FIT_MARGIN + 0.5);
    }
}
