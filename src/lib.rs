#![warn(missing_docs)]

//! Layered tile-map editing core for Macroquad: tileset GID registry, stacked
//! cell layers, culled rendering with animated tiles, flood fill and undo.

/// Animation groups and their compiled lookup.
pub mod animation;
mod config;
mod error;
/// Bucket fill.
pub mod fill;
/// Bounded undo and redo.
pub mod history;
mod loader {
    pub mod image;
    pub mod tileset;
}
/// Layered cell-stack map grid.
pub mod map;
/// Culling, drawing surface and renderers.
pub mod render;
mod session;
mod sprites;
/// Tilesets and GID resolution.
pub mod tileset;

pub use animation::{AnimationEntry, AnimationGroup, AnimationLibrary, AnimationLookup, FrameSchedule};
pub use config::{default_catalogue, CatalogueEntry, EditorConfig, TilesetCategory, MAX_UNDO, TILE_SIZE};
pub use error::{EditorError, Result};
pub use history::{CellChange, History, HistoryDelta};
pub use loader::image::{ImageSource, MacroquadImages, TileImage};
pub use loader::tileset::load_all;
pub use map::{visible_gid, ApplyDirection, CellStack, Gid, Layer, MapGrid};
pub use render::{MacroquadPainter, Painter, RenderOptions, RenderStyle, TileWindow, Viewport};
pub use session::EditorSession;
pub use sprites::SpriteCache;
pub use tileset::{ResolvedTile, TileSelection, Tileset, TilesetRegistry};
