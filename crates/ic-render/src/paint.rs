//! Scene graph → screen-space display list.
//!
//! Stateless: everything that varies per frame (view transform, selection,
//! drop highlight, drag ghost) is passed in. Nodes outside the viewport are
//! culled, and text is dropped once it would be too small to read.

use crate::display::{DisplayList, DrawCmd, StrokeStyle, TextAlign};
use crate::theme::CanvasTheme;
use ic_core::{
    DependencyKind, DropCandidate, Point, Rect, ResourceId, SceneEdge, SceneGraph, SceneNode,
    Size, Transform,
};

/// World-space distance between grid dots.
pub const GRID_SPACING: f32 = 24.0;
const MIN_GRID_PX: f32 = 8.0;
const LABEL_SIZE: f32 = 13.0;
const TYPE_SIZE: f32 = 10.0;
/// Text smaller than this many screen pixels is not drawn.
const MIN_TEXT_PX: f32 = 5.0;
const CONTAINER_RADIUS: f32 = 8.0;
const LEAF_RADIUS: f32 = 6.0;
const BADGE_RADIUS: f32 = 4.0;
const ARROW_SIZE: f32 = 8.0;

/// Transient interaction state drawn on top of the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub selected: Option<ResourceId>,
    pub drop: Option<DropCandidate>,
    /// Node being dragged; it and its subtree are drawn faded in place.
    pub dragging: Option<ResourceId>,
    pub ghost: Option<Ghost>,
}

/// Outline following the pointer during a drag, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub bounds: Rect,
    pub label: String,
}

pub fn build_display_list(
    scene: &SceneGraph,
    transform: &Transform,
    overlay: &Overlay,
    theme: &CanvasTheme,
    viewport: Size,
) -> DisplayList {
    let mut list = DisplayList::new();
    let area = Rect::new(0.0, 0.0, viewport.width, viewport.height);
    list.push(DrawCmd::Background {
        area,
        color: theme.background,
    });
    push_grid(&mut list, area, transform, theme);

    let visible = transform.visible_world_rect(viewport);
    let mut culled = 0usize;
    for node in scene.nodes() {
        if !node.bounds.intersects(&visible) {
            culled += 1;
            continue;
        }
        let faded = overlay
            .dragging
            .is_some_and(|dragged| scene.is_within(node.id, dragged));
        paint_node(&mut list, node, transform, theme, faded);
    }

    for edge in scene.edges() {
        paint_edge(&mut list, scene, edge, transform, theme, &visible);
    }

    if let Some(candidate) = overlay.drop {
        if let Some(node) = scene.get(candidate.id) {
            paint_drop_highlight(&mut list, node, candidate.valid, transform, theme);
        }
    }

    if let Some(node) = overlay.selected.and_then(|id| scene.get(id)) {
        let r = transform.rect_to_screen(&node.bounds).inflate(3.0);
        list.push(DrawCmd::Rect {
            rect: r,
            radius: corner_radius(node, transform) + 3.0,
            fill: None,
            stroke: Some(StrokeStyle::solid(theme.selection, 2.0)),
        });
    }

    if let Some(ghost) = &overlay.ghost {
        paint_ghost(&mut list, ghost, transform, theme);
    }

    log::trace!(
        "display list: {} commands, {} of {} nodes culled",
        list.len(),
        culled,
        scene.len()
    );
    list
}

fn push_grid(list: &mut DisplayList, area: Rect, transform: &Transform, theme: &CanvasTheme) {
    let mut spacing = GRID_SPACING * transform.zoom;
    // Thin out the lattice when zoomed far out.
    while spacing < MIN_GRID_PX {
        spacing *= 2.0;
    }
    list.push(DrawCmd::DotGrid {
        area,
        origin: transform.to_screen(Point::ORIGIN),
        spacing,
        radius: 1.0,
        color: theme.grid,
    });
}

fn corner_radius(node: &SceneNode, transform: &Transform) -> f32 {
    let base = if node.is_container {
        CONTAINER_RADIUS
    } else {
        LEAF_RADIUS
    };
    base * transform.zoom
}

fn paint_node(
    list: &mut DisplayList,
    node: &SceneNode,
    transform: &Transform,
    theme: &CanvasTheme,
    faded: bool,
) {
    let z = transform.zoom;
    let r = transform.rect_to_screen(&node.bounds);
    let alpha = if faded { 0.35 } else { 1.0 };
    let radius = corner_radius(node, transform);

    if node.is_container {
        list.push(DrawCmd::Rect {
            rect: r,
            radius,
            fill: Some(theme.container_fill.with_alpha(alpha)),
            stroke: Some(StrokeStyle::solid(theme.container_stroke.with_alpha(alpha), 1.0)),
        });

        let header_bottom = r.y + node.header_height * z;
        let footer_top = r.bottom() - node.footer_height * z;
        list.push(DrawCmd::Line {
            from: Point::new(r.x, header_bottom),
            to: Point::new(r.right(), header_bottom),
            stroke: StrokeStyle::solid(theme.container_stroke.with_alpha(alpha), 1.0),
        });
        list.push(DrawCmd::Line {
            from: Point::new(r.x, footer_top),
            to: Point::new(r.right(), footer_top),
            stroke: StrokeStyle::dashed(theme.container_stroke.with_alpha(alpha), 1.0, 4.0, 3.0),
        });

        let inset = node.padding * z;
        let label_size = LABEL_SIZE * z;
        let baseline = r.y + node.header_height * z / 2.0 + label_size * 0.35;
        let type_size = TYPE_SIZE * z;
        if type_size >= MIN_TEXT_PX {
            list.push(DrawCmd::Text {
                pos: Point::new(r.right() - inset, baseline),
                text: node.kind.clone(),
                size: type_size,
                color: theme.muted_text.with_alpha(alpha),
                align: TextAlign::Right,
                bold: false,
            });
        }
        let room = r.width * 0.6 - inset;
        if let Some(label) = fit_text(&node.label, room, label_size) {
            list.push(DrawCmd::Text {
                pos: Point::new(r.x + inset, baseline),
                text: label,
                size: label_size,
                color: theme.text.with_alpha(alpha),
                align: TextAlign::Left,
                bold: true,
            });
        }

        let plus_size = 16.0 * z;
        if plus_size >= MIN_TEXT_PX {
            list.push(DrawCmd::Text {
                pos: Point::new(r.x + r.width / 2.0, footer_top + node.footer_height * z / 2.0 + plus_size * 0.35),
                text: "+".to_string(),
                size: plus_size,
                color: theme.muted_text.with_alpha(alpha),
                align: TextAlign::Center,
                bold: false,
            });
        }
    } else {
        list.push(DrawCmd::Rect {
            rect: r,
            radius,
            fill: Some(theme.leaf_fill.with_alpha(alpha)),
            stroke: Some(StrokeStyle::solid(theme.leaf_stroke.with_alpha(alpha), 1.0)),
        });

        let inset = 10.0 * z;
        let label_size = LABEL_SIZE * z;
        let centre = r.y + r.height / 2.0;
        if let Some(label) = fit_text(&node.label, r.width - 2.0 * inset, label_size) {
            list.push(DrawCmd::Text {
                pos: Point::new(r.x + inset, centre - 2.0 * z),
                text: label,
                size: label_size,
                color: theme.text.with_alpha(alpha),
                align: TextAlign::Left,
                bold: true,
            });
        }
        let type_size = TYPE_SIZE * z;
        if let Some(kind) = fit_text(&node.kind, r.width - 2.0 * inset, type_size) {
            list.push(DrawCmd::Text {
                pos: Point::new(r.x + inset, centre + type_size + 2.0 * z),
                text: kind,
                size: type_size,
                color: theme.muted_text.with_alpha(alpha),
                align: TextAlign::Left,
                bold: false,
            });
        }
    }

    if let Some(color) = theme.status_color(node.status) {
        let badge = (BADGE_RADIUS * z).max(2.0);
        list.push(DrawCmd::Circle {
            center: Point::new(r.right() - 10.0 * z, r.y + 10.0 * z),
            radius: badge,
            fill: color.with_alpha(alpha),
        });
    }
}

fn paint_edge(
    list: &mut DisplayList,
    scene: &SceneGraph,
    edge: &SceneEdge,
    transform: &Transform,
    theme: &CanvasTheme,
    visible: &Rect,
) {
    let (Some(from), Some(to)) = (scene.get(edge.from), scene.get(edge.to)) else {
        return;
    };
    if !from.bounds.union(&to.bounds).intersects(visible) {
        return;
    }

    let start = transform.to_screen(border_point(&from.bounds, to.bounds.center()));
    let tip = transform.to_screen(border_point(&to.bounds, from.bounds.center()));
    if start.distance(tip) < 1.0 {
        return;
    }

    let stroke = match edge.kind {
        DependencyKind::Implicit => StrokeStyle::solid(theme.edge, 1.0),
        DependencyKind::Explicit => StrokeStyle::solid(theme.edge, 1.5),
        DependencyKind::Data => StrokeStyle::dashed(theme.edge, 1.0, 6.0, 4.0),
    };
    list.push(DrawCmd::Line {
        from: start,
        to: tip,
        stroke,
    });
    list.push(DrawCmd::Polygon {
        points: arrowhead(start, tip, ARROW_SIZE),
        fill: theme.edge,
    });
}

/// Where the segment from `rect`'s centre towards `toward` leaves `rect`.
fn border_point(rect: &Rect, toward: Point) -> Point {
    let c = rect.center();
    let d = toward.sub(c);
    if d.x == 0.0 && d.y == 0.0 {
        return c;
    }
    let tx = if d.x != 0.0 {
        (rect.width / 2.0) / d.x.abs()
    } else {
        f32::INFINITY
    };
    let ty = if d.y != 0.0 {
        (rect.height / 2.0) / d.y.abs()
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty);
    c.offset(d.x * t, d.y * t)
}

/// Triangle with its point at `tip`, aimed along `from → tip`.
fn arrowhead(from: Point, tip: Point, size: f32) -> Vec<Point> {
    let len = from.distance(tip);
    let (ux, uy) = ((tip.x - from.x) / len, (tip.y - from.y) / len);
    let base = tip.offset(-ux * size, -uy * size);
    let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
    vec![tip, base.offset(px, py), base.offset(-px, -py)]
}

fn paint_drop_highlight(
    list: &mut DisplayList,
    node: &SceneNode,
    valid: bool,
    transform: &Transform,
    theme: &CanvasTheme,
) {
    let r = transform.rect_to_screen(&node.bounds).inflate(2.0);
    let radius = corner_radius(node, transform) + 2.0;
    let (color, stroke) = if valid {
        (theme.drop_valid, StrokeStyle::solid(theme.drop_valid, 2.0))
    } else {
        (theme.drop_invalid, StrokeStyle::dashed(theme.drop_invalid, 2.0, 6.0, 4.0))
    };
    list.push(DrawCmd::Rect {
        rect: r,
        radius,
        fill: Some(color.with_alpha(0.08)),
        stroke: Some(stroke),
    });
}

fn paint_ghost(list: &mut DisplayList, ghost: &Ghost, transform: &Transform, theme: &CanvasTheme) {
    let r = transform.rect_to_screen(&ghost.bounds);
    list.push(DrawCmd::Rect {
        rect: r,
        radius: LEAF_RADIUS * transform.zoom,
        fill: Some(theme.ghost.with_alpha(0.15)),
        stroke: Some(StrokeStyle::dashed(theme.ghost, 1.5, 5.0, 3.0)),
    });
    let size = LABEL_SIZE * transform.zoom;
    if let Some(label) = fit_text(&ghost.label, r.width - 8.0, size) {
        let c = r.center();
        list.push(DrawCmd::Text {
            pos: Point::new(c.x, c.y + size * 0.35),
            text: label,
            size,
            color: theme.text,
            align: TextAlign::Center,
            bold: false,
        });
    }
}

/// `text` shortened with an ellipsis to fit `max_width` at font `size`, or
/// `None` if nothing legible fits.
fn fit_text(text: &str, max_width: f32, size: f32) -> Option<String> {
    if size < MIN_TEXT_PX || text.is_empty() {
        return None;
    }
    // Average advance for the UI sans fonts the backends use.
    let advance = size * 0.6;
    let max_chars = (max_width / advance).floor();
    if max_chars < 2.0 {
        return None;
    }
    let max_chars = max_chars as usize;
    if text.chars().count() <= max_chars {
        return Some(text.to_string());
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    Some(out)
}
