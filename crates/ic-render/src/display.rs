//! Backend-neutral draw commands in screen space.
//!
//! The painter produces a [`DisplayList`] once per frame; backends (Vello,
//! Canvas2D) replay it without consulting the scene graph again.

use crate::theme::Color;
use ic_core::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths; solid when `None`.
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole viewport.
    Background { area: Rect, color: Color },
    /// Dots on a square lattice covering `area`, aligned to `origin`.
    DotGrid {
        area: Rect,
        origin: Point,
        spacing: f32,
        radius: f32,
        color: Color,
    },
    Rect {
        rect: Rect,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: StrokeStyle,
    },
    /// Closed filled polygon.
    Polygon { points: Vec<Point>, fill: Color },
    /// `pos` is the baseline anchor for the given alignment.
    Text {
        pos: Point,
        text: String,
        size: f32,
        color: Color,
        align: TextAlign,
        bold: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCmd>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DrawCmd;
    type IntoIter = std::slice::Iter<'a, DrawCmd>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
