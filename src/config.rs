use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel size of every tile in every tileset.
pub const TILE_SIZE: u32 = 16;

/// Number of undo steps kept before the oldest is evicted.
pub const MAX_UNDO: usize = 100;

/// Grouping used by the tileset browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilesetCategory {
    /// Village buildings and props.
    Village,
    /// Overworld terrain.
    World,
    /// Castles, dungeons and caves.
    Dungeon,
    /// Indoor furniture.
    Interior,
    /// Animation sheets on the same tile grid.
    Animations,
}

/// One tileset image in the catalogue, resolved as `base/dir/file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// Display name.
    pub name: String,
    /// Image file name.
    pub file: String,
    /// Asset subdirectory (`tilesets` or `animations`).
    pub dir: String,
    /// Browser category.
    pub category: TilesetCategory,
}

impl CatalogueEntry {
    /// Build an entry.
    pub fn new(name: &str, dir: &str, category: TilesetCategory) -> Self {
        CatalogueEntry {
            name: name.to_owned(),
            file: format!("{name}.png"),
            dir: dir.to_owned(),
            category,
        }
    }

    /// Path of the image under `base_path`.
    pub fn image_path(&self, base_path: &Path) -> PathBuf {
        base_path.join(&self.dir).join(&self.file)
    }
}

/// Editor settings; every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Tile edge in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Undo steps kept.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Load order defines GID assignment and must stay stable across runs.
    #[serde(default = "default_catalogue")]
    pub catalogue: Vec<CatalogueEntry>,
}

fn default_tile_size() -> u32 {
    TILE_SIZE
}
fn default_history_capacity() -> usize {
    MAX_UNDO
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            tile_size: TILE_SIZE,
            history_capacity: MAX_UNDO,
            catalogue: default_catalogue(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| EditorError::Config {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Read a configuration file, only supporting JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| EditorError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| EditorError::Config {
            path: p.to_path_buf(),
            source,
        })
    }
}

/// The built-in catalogue: 20 tilesets followed by 13 animation sheets.
pub fn default_catalogue() -> Vec<CatalogueEntry> {
    use TilesetCategory::*;

    const TILESETS: &[(&str, TilesetCategory)] = &[
        ("CuteRPG_Field_Tiles", Village),
        ("CuteRPG_Village", Village),
        ("CuteRPG_Forest", Village),
        ("CuteRPG_Houses_A", Village),
        ("CuteRPG_Houses_B", Village),
        ("CuteRPG_Houses_C", Village),
        ("CuteRPG_Harbor", Village),
        ("CuteRPG_Village_House", Village),
        ("CuteRPG_Village_Inn", Village),
        ("CuteRPG_Mountains", World),
        ("CuteRPG_Winter", World),
        ("CuteRPG_Desert_Outside", World),
        ("CuteRPG_Desert_Inside", World),
        ("CuteRPG_Castle", Dungeon),
        ("CuteRPG_Castle_New", Dungeon),
        ("CuteRPG_Dark_Castle", Dungeon),
        ("CuteRPG_Dungeon", Dungeon),
        ("CuteRPG_Dungeon_Entrance", Dungeon),
        ("CuteRPG_Caves", Dungeon),
        ("CuteRPG_Interior_custom", Interior),
    ];
    const ANIMATIONS: &[&str] = &[
        "CuteRPG_Field_Animations",
        "CuteRPG_Forest_Animation",
        "CuteRPG_Harbor_Animations",
        "CuteRPG_Castle_Animations",
        "CuteRPG_Castle_New_Animations",
        "CuteRPG_Dark_Castle_Animations",
        "CuteRPG_Desert_Animations",
        "CuteRPG_Dungeon_Animations",
        "CuteRPG_Dungeon_Entrance_Animations01",
        "CuteRPG_Dungeon_Entrance_Animations02",
        "CuteRPG_Magical",
        "CuteRPG_Mountains_animations",
        "CuteRPG_Mountains_Water",
    ];

    TILESETS
        .iter()
        .map(|&(name, category)| CatalogueEntry::new(name, "tilesets", category))
        .chain(
            ANIMATIONS
                .iter()
                .map(|name| CatalogueEntry::new(name, "animations", Animations)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let cfg = EditorConfig::from_json_str("{}").expect("parse");
        assert_eq!(cfg, EditorConfig::default());
        assert_eq!(cfg.catalogue.len(), 33);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg = EditorConfig::from_json_str(
            r#"{
              "history_capacity": 5,
              "catalogue": [
                {"name":"Grass","file":"grass.png","dir":"tilesets","category":"world"}
              ]
            }"#,
        )
        .expect("parse");
        assert_eq!(cfg.tile_size, 16);
        assert_eq!(cfg.history_capacity, 5);
        assert_eq!(cfg.catalogue[0].category, TilesetCategory::World);
        assert_eq!(
            cfg.catalogue[0].image_path(Path::new("/assets")),
            PathBuf::from("/assets/tilesets/grass.png")
        );
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let err = EditorConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, EditorError::Config { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file() {
        let err = EditorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn animation_sheets_come_last() {
        let cat = default_catalogue();
        assert_eq!(cat[0].name, "CuteRPG_Field_Tiles");
        assert_eq!(cat[19].category, TilesetCategory::Interior);
        assert!(cat[20..]
            .iter()
            .all(|e| e.category == TilesetCategory::Animations && e.dir == "animations"));
    }
}
