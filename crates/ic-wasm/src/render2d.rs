//! Canvas2D backend.
//!
//! Replays a [`DisplayList`] onto an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. All coordinates are already in screen space.

use ic_core::{Point, Rect};
use ic_render::{DisplayList, DrawCmd, StrokeStyle, TextAlign};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

pub fn render_display_list(ctx: &CanvasRenderingContext2d, list: &DisplayList) {
    for cmd in list {
        match cmd {
            DrawCmd::Background { area, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(area.x as f64, area.y as f64, area.width as f64, area.height as f64);
            }
            DrawCmd::DotGrid {
                area,
                origin,
                spacing,
                radius,
                color,
            } => draw_dot_grid(ctx, area, *origin, *spacing, *radius, &color.to_css()),
            DrawCmd::Rect {
                rect,
                radius,
                fill,
                stroke,
            } => {
                rounded_rect_path(
                    ctx,
                    rect.x as f64,
                    rect.y as f64,
                    rect.width as f64,
                    rect.height as f64,
                    *radius as f64,
                );
                if let Some(fill) = fill {
                    ctx.set_fill_style_str(&fill.to_css());
                    ctx.fill();
                }
                if let Some(stroke) = stroke {
                    apply_stroke(ctx, stroke);
                    ctx.stroke();
                    clear_dash(ctx);
                }
            }
            DrawCmd::Circle {
                center,
                radius,
                fill,
            } => {
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                )
                .unwrap_or(());
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
            }
            DrawCmd::Line { from, to, stroke } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                apply_stroke(ctx, stroke);
                ctx.stroke();
                clear_dash(ctx);
            }
            DrawCmd::Polygon { points, fill } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
                bold,
            } => {
                let weight = if *bold { "600" } else { "400" };
                ctx.set_font(&format!("{weight} {size}px {FONT_FAMILY}"));
                ctx.set_fill_style_str(&color.to_css());
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                ctx.set_text_baseline("alphabetic");
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
        }
    }
}

fn draw_dot_grid(
    ctx: &CanvasRenderingContext2d,
    area: &Rect,
    origin: Point,
    spacing: f32,
    radius: f32,
    color: &str,
) {
    if spacing <= 0.0 {
        return;
    }
    ctx.set_fill_style_str(color);
    let size = (radius * 2.0).max(1.0) as f64;
    let start_x = area.x + (origin.x - area.x).rem_euclid(spacing);
    let start_y = area.y + (origin.y - area.y).rem_euclid(spacing);
    let mut x = start_x;
    while x < area.right() {
        let mut y = start_y;
        while y < area.bottom() {
            ctx.fill_rect(x as f64 - size / 2.0, y as f64 - size / 2.0, size, size);
            y += spacing;
        }
        x += spacing;
    }
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &StrokeStyle) {
    ctx.set_stroke_style_str(&stroke.color.to_css());
    ctx.set_line_width(stroke.width as f64);
    if let Some([dash, gap]) = stroke.dash {
        let _ = ctx.set_line_dash(&js_sys::Array::of2(
            &JsValue::from_f64(dash as f64),
            &JsValue::from_f64(gap as f64),
        ));
    }
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
    let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.max(0.0).min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
