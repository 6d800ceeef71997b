use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors surfaced by the editor core.
///
/// Resolution misses, no-op edits and history eviction are not errors; they
/// show up as `None` or empty results instead.
#[derive(Error, Debug)]
pub enum EditorError {
    /// An image could not be fetched or decoded; the whole batch is aborted.
    #[error("Failed to load asset {path}: {reason}")]
    AssetLoad {
        /// Full path of the missing or corrupt image.
        path: PathBuf,
        /// Loader-provided reason.
        reason: String,
    },

    /// Configuration file I/O error.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Configuration JSON could not be parsed.
    #[error("Invalid configuration {path}: {source}")]
    Config {
        /// File (or `<inline>`) that failed to parse.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A layer index past the end of the map.
    #[error("Layer {index} out of range ({count} layers)")]
    LayerOutOfRange {
        /// Requested layer.
        index: usize,
        /// Number of layers in the map.
        count: usize,
    },

    /// A cell coordinate outside the map.
    #[error("Cell ({x}, {y}) outside {width}x{height} map")]
    CellOutOfRange {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
        /// Map width in tiles.
        width: u32,
        /// Map height in tiles.
        height: u32,
    },

    /// A tileset index past the end of the registry.
    #[error("Tileset {index} out of range ({count} tilesets)")]
    TilesetOutOfRange {
        /// Requested tileset.
        index: usize,
        /// Number of loaded tilesets.
        count: usize,
    },

    /// A local tile id past the end of its tileset.
    #[error("Tile {local_id} out of range for tileset {tileset} ({tile_count} tiles)")]
    TileOutOfRange {
        /// Tileset index.
        tileset: usize,
        /// Requested local id.
        local_id: u32,
        /// Tiles in that tileset.
        tile_count: u32,
    },
}
