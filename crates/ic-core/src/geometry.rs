//! World/screen geometry and the pan/zoom view transform.
//!
//! World space is the unbounded coordinate system resources are laid out in.
//! Screen space is viewport pixels. The mapping is
//! `screen = world * zoom + pan`.

use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn sub(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn add(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        let d = self.sub(other);
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive on all edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict AABB overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True if `inner` lies inside `self` with at least `margin` on every side.
    pub fn encloses(&self, inner: &Rect, margin: f32) -> bool {
        const EPS: f32 = 1e-3;
        inner.x + EPS >= self.x + margin
            && inner.y + EPS >= self.y + margin
            && inner.right() <= self.right() - margin + EPS
            && inner.bottom() <= self.bottom() - margin + EPS
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn inflate(&self, by: f32) -> Rect {
        Rect::new(
            self.x - by,
            self.y - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }
}

/// Pan/zoom view state. Owned by the interaction controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        pan_x: 0.0,
        pan_y: 0.0,
        zoom: 1.0,
    };

    /// Build a transform, clamping the zoom into `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn new(pan_x: f32, pan_y: f32, zoom: f32) -> Self {
        Self {
            pan_x,
            pan_y,
            zoom: clamp_zoom(zoom),
        }
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan_x,
            world.y * self.zoom + self.pan_y,
        )
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    pub fn rect_to_screen(&self, world: &Rect) -> Rect {
        let o = self.to_screen(world.origin());
        Rect::new(o.x, o.y, world.width * self.zoom, world.height * self.zoom)
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `screen` fixed. Non-finite and non-positive factors are ignored.
    pub fn zoom_at(&mut self, screen: Point, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("ignoring degenerate zoom factor {factor}");
            return;
        }
        let anchor = self.to_world(screen);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan_x = screen.x - anchor.x * self.zoom;
        self.pan_y = screen.y - anchor.y * self.zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Fit `world` into a viewport of the given screen size, leaving
    /// `margin` screen pixels on each side.
    pub fn fit(&mut self, world: &Rect, viewport: Size, margin: f32) {
        let avail_w = (viewport.width - 2.0 * margin).max(1.0);
        let avail_h = (viewport.height - 2.0 * margin).max(1.0);
        if world.width <= 0.0 || world.height <= 0.0 {
            self.zoom = 1.0;
        } else {
            self.zoom = clamp_zoom((avail_w / world.width).min(avail_h / world.height));
        }
        let center = world.center();
        self.pan_x = viewport.width / 2.0 - center.x * self.zoom;
        self.pan_y = viewport.height / 2.0 - center.y * self.zoom;
    }

    /// The world rectangle currently visible in a viewport of `viewport` size.
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        let o = self.to_world(Point::ORIGIN);
        Rect::new(
            o.x,
            o.y,
            viewport.width / self.zoom,
            viewport.height / self.zoom,
        )
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() || zoom <= 0.0 {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
