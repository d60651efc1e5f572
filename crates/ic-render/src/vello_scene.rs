//! Display list → Vello scene.
//!
//! Call once per frame with a freshly-cleared `Scene`; the caller presents it
//! via its own surface.

use crate::display::{DisplayList, DrawCmd, StrokeStyle};
use crate::theme::Color;
use kurbo::{Affine, BezPath, Circle, Line, Rect as KurboRect, RoundedRect, Stroke};
use peniko::{Color as PenikoColor, Fill};
use vello::Scene;

pub fn paint_display_list(scene: &mut Scene, list: &DisplayList) {
    for cmd in list {
        match cmd {
            DrawCmd::Background { area, color } => {
                scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*color), None, &to_kurbo_rect(area));
            }

            DrawCmd::DotGrid {
                area,
                origin,
                spacing,
                radius,
                color,
            } => {
                if *spacing <= 0.0 {
                    continue;
                }
                let brush = to_peniko(*color);
                let start_x = area.x + origin.x.rem_euclid(*spacing);
                let start_y = area.y + origin.y.rem_euclid(*spacing);
                let mut y = start_y;
                while y <= area.bottom() {
                    let mut x = start_x;
                    while x <= area.right() {
                        let dot = Circle::new((x as f64, y as f64), *radius as f64);
                        scene.fill(Fill::NonZero, Affine::IDENTITY, brush, None, &dot);
                        x += spacing;
                    }
                    y += spacing;
                }
            }

            DrawCmd::Rect {
                rect,
                radius,
                fill,
                stroke,
            } => {
                let shape: RoundedRect = to_kurbo_rect(rect).to_rounded_rect(*radius as f64);
                if let Some(fill) = fill {
                    scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*fill), None, &shape);
                }
                if let Some(stroke) = stroke {
                    scene.stroke(&to_kurbo_stroke(stroke), Affine::IDENTITY, to_peniko(stroke.color), None, &shape);
                }
            }

            DrawCmd::Circle {
                center,
                radius,
                fill,
            } => {
                let shape = Circle::new((center.x as f64, center.y as f64), *radius as f64);
                scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*fill), None, &shape);
            }

            DrawCmd::Line { from, to, stroke } => {
                let shape = Line::new((from.x as f64, from.y as f64), (to.x as f64, to.y as f64));
                scene.stroke(&to_kurbo_stroke(stroke), Affine::IDENTITY, to_peniko(stroke.color), None, &shape);
            }

            DrawCmd::Polygon { points, fill } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                let mut path = BezPath::new();
                path.move_to((first.x as f64, first.y as f64));
                for p in rest {
                    path.line_to((p.x as f64, p.y as f64));
                }
                path.close_path();
                scene.fill(Fill::NonZero, Affine::IDENTITY, to_peniko(*fill), None, &path);
            }

            DrawCmd::Text { pos, text, .. } => {
                log::trace!("TEXT {:?} at ({}, {})", text, pos.x, pos.y);
                // Glyph runs need a font context owned by the host; not wired yet.
            }
        }
    }
}

fn to_kurbo_rect(r: &ic_core::Rect) -> KurboRect {
    KurboRect::new(r.x as f64, r.y as f64, r.right() as f64, r.bottom() as f64)
}

fn to_kurbo_stroke(style: &StrokeStyle) -> Stroke {
    let stroke = Stroke::new(style.width as f64);
    match style.dash {
        Some([dash, gap]) => stroke.with_dashes(0.0, [dash as f64, gap as f64]),
        None => stroke,
    }
}

fn to_peniko(c: Color) -> PenikoColor {
    let [r, g, b, a] = c.to_rgba8();
    PenikoColor::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::TextAlign;
    use ic_core::{Point, Rect};

    #[test]
    fn replays_shapes_into_scene() {
        let mut list = DisplayList::new();
        list.push(DrawCmd::Background {
            area: Rect::new(0.0, 0.0, 100.0, 100.0),
            color: Color::rgba(1.0, 1.0, 1.0, 1.0),
        });
        list.push(DrawCmd::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(50.0, 50.0),
            stroke: StrokeStyle::dashed(Color::rgba(0.0, 0.0, 0.0, 1.0), 1.0, 4.0, 2.0),
        });
        list.push(DrawCmd::Polygon {
            points: Vec::new(),
            fill: Color::rgba(0.0, 0.0, 0.0, 1.0),
        });
        list.push(DrawCmd::Text {
            pos: Point::new(10.0, 10.0),
            text: "vpc".into(),
            size: 12.0,
            color: Color::rgba(0.0, 0.0, 0.0, 1.0),
            align: TextAlign::Left,
            bold: false,
        });

        let mut scene = Scene::new();
        paint_display_list(&mut scene, &list);
        assert!(!scene.encoding().is_empty());
    }
}
