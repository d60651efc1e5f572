//! Colors and the light/dark canvas themes.

use ic_core::ResourceStatus;

/// RGBA color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let channel = |i: usize| Some(hex_val(bytes[i])? * 16 + hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::from_rgba8(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::from_rgba8(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn with_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` string for Canvas2D.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {:.3})", self.a.clamp(0.0, 1.0))
    }
}

/// Theme-dependent colors for the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTheme {
    pub background: Color,
    pub grid: Color,
    pub container_fill: Color,
    pub container_stroke: Color,
    pub leaf_fill: Color,
    pub leaf_stroke: Color,
    pub text: Color,
    pub muted_text: Color,
    pub edge: Color,
    pub selection: Color,
    pub drop_valid: Color,
    pub drop_invalid: Color,
    pub ghost: Color,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            background: Color::from_rgba8(0xF5, 0xF5, 0xF7, 0xFF),
            grid: Color::rgba(0.0, 0.0, 0.0, 0.08),
            container_fill: Color::rgba(1.0, 1.0, 1.0, 0.6),
            container_stroke: Color::from_rgba8(0xC7, 0xC7, 0xCC, 0xFF),
            leaf_fill: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            leaf_stroke: Color::from_rgba8(0xD1, 0xD1, 0xD6, 0xFF),
            text: Color::from_rgba8(0x1D, 0x1D, 0x1F, 0xFF),
            muted_text: Color::from_rgba8(0x86, 0x86, 0x8B, 0xFF),
            edge: Color::from_rgba8(0x8E, 0x8E, 0x93, 0xFF),
            selection: Color::from_rgba8(0x00, 0x71, 0xE3, 0xFF),
            drop_valid: Color::from_rgba8(0x34, 0xC7, 0x59, 0xFF),
            drop_invalid: Color::from_rgba8(0xFF, 0x3B, 0x30, 0xFF),
            ghost: Color::from_rgba8(0x00, 0x71, 0xE3, 0x99),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_rgba8(0x1C, 0x1C, 0x1E, 0xFF),
            grid: Color::rgba(1.0, 1.0, 1.0, 0.06),
            container_fill: Color::rgba(1.0, 1.0, 1.0, 0.03),
            container_stroke: Color::from_rgba8(0x48, 0x48, 0x4A, 0xFF),
            leaf_fill: Color::from_rgba8(0x2C, 0x2C, 0x2E, 0xFF),
            leaf_stroke: Color::from_rgba8(0x3A, 0x3A, 0x3C, 0xFF),
            text: Color::from_rgba8(0xF5, 0xF5, 0xF7, 0xFF),
            muted_text: Color::from_rgba8(0x98, 0x98, 0x9D, 0xFF),
            edge: Color::from_rgba8(0x63, 0x63, 0x66, 0xFF),
            selection: Color::from_rgba8(0x0A, 0x84, 0xFF, 0xFF),
            drop_valid: Color::from_rgba8(0x30, 0xD1, 0x58, 0xFF),
            drop_invalid: Color::from_rgba8(0xFF, 0x45, 0x3A, 0xFF),
            ghost: Color::from_rgba8(0x0A, 0x84, 0xFF, 0x99),
        }
    }

    /// Badge color for `status`; `None` means no badge.
    pub fn status_color(&self, status: ResourceStatus) -> Option<Color> {
        let hex = match status {
            ResourceStatus::Unknown => return None,
            ResourceStatus::Planning => "#AF52DE",
            ResourceStatus::Applying | ResourceStatus::Updating => "#FF9F0A",
            ResourceStatus::Created => "#34C759",
            ResourceStatus::Error => "#FF3B30",
            ResourceStatus::Destroyed => "#8E8E93",
        };
        Color::from_hex(hex)
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}
