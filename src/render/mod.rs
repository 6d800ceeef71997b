mod cull;
mod map_renderer;
mod painter;

pub use cull::{visible_window, TileWindow, Viewport};
pub use map_renderer::{is_walkable, render_map, render_tileset_preview, RenderOptions, RenderStyle};
pub use painter::{MacroquadPainter, Painter};
