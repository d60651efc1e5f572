pub mod display;
pub mod paint;
pub mod theme;
pub mod vello_scene;

pub use display::{DisplayList, DrawCmd, StrokeStyle, TextAlign};
pub use paint::{Ghost, Overlay, build_display_list};
pub use theme::{CanvasTheme, Color};
