//! WASM bridge for InfraCanvas: exposes the diagram session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the resource
//! data: it pushes snapshots in as JSON, forwards DOM events, and persists
//! the intents each handler returns.

mod render2d;

use ic_core::{
    ContainmentRules, DependencyEdge, LayoutConfig, ResourceId, ResourceNode, RuleTable, Size,
    Transform, TypeCatalog,
};
use ic_editor::{DiagramSession, InputEvent, Intent, Intents, Modifiers, PointerButton};
use ic_render::CanvasTheme;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The canvas handle held by the host page.
///
/// Handlers return the emitted intents as a JSON array
/// (`[{"type":"select","id":"vpc_main"}]`). Setters return
/// `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub struct InfraCanvas {
    session: DiagramSession,
    dark_mode: bool,
}

#[wasm_bindgen]
impl InfraCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();

        let mut session = DiagramSession::new(RuleTable::new());
        session.set_viewport(Size::new(width, height));
        Self {
            session,
            dark_mode: false,
        }
    }

    // ─── Data in ─────────────────────────────────────────────────────────

    /// Replace the resource snapshot. On error the previous scene is kept.
    pub fn set_resources_json(&mut self, json: &str) -> String {
        match parse::<Vec<ResourceNode>>(json) {
            Ok(resources) => status(self.session.set_resources(resources)),
            Err(e) => e,
        }
    }

    pub fn set_edges_json(&mut self, json: &str) -> String {
        match parse::<Vec<DependencyEdge>>(json) {
            Ok(edges) => status(self.session.set_edges(edges)),
            Err(e) => e,
        }
    }

    pub fn set_catalog_json(&mut self, json: &str) -> String {
        match parse::<TypeCatalog>(json) {
            Ok(catalog) => status(self.session.set_catalog(catalog)),
            Err(e) => e,
        }
    }

    pub fn set_layout_config_json(&mut self, json: &str) -> String {
        match parse::<LayoutConfig>(json) {
            Ok(config) => status(self.session.set_config(config)),
            Err(e) => e,
        }
    }

    pub fn set_rules_json(&mut self, json: &str) -> String {
        match parse::<RuleTable>(json) {
            Ok(rules) => {
                self.session.set_rules(rules);
                ok()
            }
            Err(e) => e,
        }
    }

    /// Use JS predicates instead of a rule table.
    ///
    /// `can_contain(parentType, childType)` decides containment;
    /// `requires_parent(childType)`, when given, marks types that cannot sit
    /// at the root.
    pub fn set_rules_fn(&mut self, can_contain: js_sys::Function, requires_parent: Option<js_sys::Function>) {
        self.session.set_rules(JsRules {
            can_contain,
            requires_parent,
        });
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// `button` is the DOM `MouseEvent.button` value.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, button: i16) -> String {
        self.dispatch(InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
        })
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerMove { x, y })
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerUp { x, y })
    }

    pub fn handle_pointer_cancel(&mut self) -> String {
        self.dispatch(InputEvent::PointerCancel)
    }

    pub fn handle_wheel(&mut self, x: f32, y: f32, delta_y: f32) -> String {
        self.dispatch(InputEvent::Wheel { x, y, delta_y })
    }

    /// A palette item carrying `resource_type` entered the canvas.
    pub fn handle_drag_enter(&mut self, x: f32, y: f32, resource_type: &str) -> String {
        self.dispatch(InputEvent::DragEnter {
            x,
            y,
            resource_type: resource_type.to_string(),
        })
    }

    pub fn handle_drag_over(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::DragOver { x, y })
    }

    pub fn handle_drag_leave(&mut self) -> String {
        self.dispatch(InputEvent::DragLeave)
    }

    pub fn handle_drop(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::Drop { x, y })
    }

    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        self.dispatch(InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    /// Echo an intent into the local snapshot before the host persists it.
    /// Returns `{"ok":true,"created":"id"|null}` on success.
    pub fn apply_intent_json(&mut self, json: &str) -> String {
        let intent = match parse::<Intent>(json) {
            Ok(intent) => intent,
            Err(e) => return e,
        };
        match self.session.apply_intent(&intent) {
            Ok(created) => serde_json::json!({ "ok": true, "created": created }).to_string(),
            Err(e) => error(&e),
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            CanvasTheme::dark()
        } else {
            CanvasTheme::light()
        };
        render2d::render_display_list(ctx, &self.session.display_list(&theme));
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.set_viewport(Size::new(width, height));
    }

    pub fn zoom_to_fit(&mut self) {
        let scene = self.session.scene().clone();
        self.session.controller_mut().zoom_to_fit(&scene);
    }

    /// Current pan and zoom as `{"panX":..,"panY":..,"zoom":..}`.
    pub fn viewport_json(&self) -> String {
        serde_json::to_string(self.session.controller().transform())
            .unwrap_or_else(|e| error(&e))
    }

    /// Restore a transform saved with [`Self::viewport_json`]. Zoom is
    /// clamped into the supported range.
    pub fn set_viewport_json(&mut self, json: &str) -> String {
        match parse::<Transform>(json) {
            Ok(t) => {
                self.session
                    .controller_mut()
                    .set_transform(Transform::new(t.pan_x, t.pan_y, t.zoom));
                ok()
            }
            Err(e) => e,
        }
    }

    /// Selected resource id, or an empty string.
    pub fn selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Breadcrumb for `id` (`"prod > subnet-a > web"`), or an empty string.
    pub fn hierarchy_path(&self, id: &str) -> String {
        self.session
            .hierarchy_path(ResourceId::intern(id))
            .unwrap_or_default()
    }

    /// Whether a node or palette drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.controller().state().is_dragging()
    }
}

impl InfraCanvas {
    fn dispatch(&mut self, event: InputEvent) -> String {
        intents_json(&self.session.handle(&event))
    }
}

/// Containment rules backed by JS callbacks. A callback that throws or
/// returns a non-boolean counts as `false`.
struct JsRules {
    can_contain: js_sys::Function,
    requires_parent: Option<js_sys::Function>,
}

impl ContainmentRules for JsRules {
    fn can_contain(&self, parent_type: &str, child_type: &str) -> bool {
        self.can_contain
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(parent_type),
                &JsValue::from_str(child_type),
            )
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn requires_parent(&self, child_type: &str) -> bool {
        self.requires_parent.as_ref().is_some_and(|f| {
            f.call1(&JsValue::NULL, &JsValue::from_str(child_type))
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        })
    }
}

fn intents_json(intents: &Intents) -> String {
    serde_json::to_string(intents.as_slice()).unwrap_or_else(|e| {
        log::warn!("failed to serialize intents: {e}");
        "[]".to_string()
    })
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| error(&e))
}

fn status<E: std::fmt::Display>(result: Result<(), E>) -> String {
    match result {
        Ok(()) => ok(),
        Err(e) => error(&e),
    }
}

fn ok() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error(e: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("InfraCanvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESOURCES: &str = r#"[
        {"id": "wb_vpc", "type": "network", "label": "prod"},
        {"id": "wb_sub", "type": "subnet", "parentId": "wb_vpc"},
        {"id": "wb_vm", "type": "instance", "parent": "wb_sub"}
    ]"#;

    fn canvas() -> InfraCanvas {
        let mut canvas = InfraCanvas::new(1200.0, 800.0);
        assert_eq!(
            canvas.set_rules_json(
                r#"{"contains":{"network":["subnet"],"subnet":["instance"]},"requiresParent":["instance"]}"#
            ),
            ok()
        );
        assert_eq!(canvas.set_resources_json(RESOURCES), ok());
        canvas
    }

    #[test]
    fn setters_report_errors_as_json() {
        let mut canvas = canvas();
        let bad: serde_json::Value =
            serde_json::from_str(&canvas.set_resources_json("not json")).unwrap();
        assert_eq!(bad["ok"], false);

        let cyclic = r#"[
            {"id": "wb_a", "type": "network", "parent": "wb_b"},
            {"id": "wb_b", "type": "network", "parent": "wb_a"}
        ]"#;
        let reply: serde_json::Value =
            serde_json::from_str(&canvas.set_resources_json(cyclic)).unwrap();
        assert_eq!(reply["ok"], false);
        assert_eq!(canvas.hierarchy_path("wb_vm"), "prod > wb_sub > wb_vm");
    }

    #[test]
    fn pointer_down_returns_select_intent() {
        let mut canvas = canvas();
        let vm = canvas.session.scene().get(ResourceId::intern("wb_vm")).unwrap().bounds.center();
        assert_eq!(
            canvas.handle_pointer_down(vm.x, vm.y, 0),
            r#"[{"type":"select","id":"wb_vm"}]"#
        );
        assert_eq!(canvas.selected_id(), "wb_vm");
        assert!(canvas.is_dragging());
        assert_eq!(canvas.handle_key("Escape", false, false, false, false), "[]");
        assert!(!canvas.is_dragging());
    }

    #[test]
    fn viewport_round_trips_with_clamped_zoom() {
        let mut canvas = canvas();
        assert_eq!(canvas.set_viewport_json(r#"{"panX":10,"panY":-5,"zoom":9}"#), ok());
        assert_eq!(canvas.viewport_json(), r#"{"panX":10.0,"panY":-5.0,"zoom":3.0}"#);
    }

    #[test]
    fn apply_intent_creates_resource() {
        let mut canvas = canvas();
        let reply: serde_json::Value = serde_json::from_str(&canvas.apply_intent_json(
            r#"{"type":"createUnderParent","parent":"wb_sub","resourceType":"instance"}"#,
        ))
        .unwrap();
        assert_eq!(reply["ok"], true);
        let created = reply["created"].as_str().unwrap();
        assert!(created.starts_with("instance_"));

        let refused: serde_json::Value = serde_json::from_str(&canvas.apply_intent_json(
            r#"{"type":"createAtRoot","resourceType":"instance","position":{"x":0,"y":0}}"#,
        ))
        .unwrap();
        assert_eq!(refused["ok"], false);
    }
}
