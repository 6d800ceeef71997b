#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tilemap_editor_core::{
    CatalogueEntry, EditorConfig, EditorError, ImageSource, Result, TileImage, TilesetCategory,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeImage(pub u32, pub u32);

impl TileImage for FakeImage {
    fn size(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}

/// In-memory image store; unknown paths fail like a missing file.
#[derive(Default)]
pub struct MemoryImages {
    pub sizes: HashMap<PathBuf, (u32, u32)>,
    pub loads: Vec<PathBuf>,
    pub yields: usize,
}

impl MemoryImages {
    pub fn with(mut self, path: &str, w: u32, h: u32) -> Self {
        self.sizes.insert(PathBuf::from(path), (w, h));
        self
    }
}

impl ImageSource for MemoryImages {
    type Image = FakeImage;

    async fn load(&mut self, path: &Path) -> Result<FakeImage> {
        self.loads.push(path.to_path_buf());
        self.sizes
            .get(path)
            .map(|&(w, h)| FakeImage(w, h))
            .ok_or_else(|| EditorError::AssetLoad {
                path: path.to_path_buf(),
                reason: "not found".into(),
            })
    }

    async fn yield_now(&mut self) {
        self.yields += 1;
    }
}

/// Three-tileset catalogue: 4 + 6 + 2 tiles.
pub fn small_config() -> EditorConfig {
    EditorConfig {
        catalogue: vec![
            CatalogueEntry::new("Field", "tilesets", TilesetCategory::Village),
            CatalogueEntry::new("Caves", "tilesets", TilesetCategory::Dungeon),
            CatalogueEntry::new("Water", "animations", TilesetCategory::Animations),
        ],
        ..EditorConfig::default()
    }
}

pub fn small_images() -> MemoryImages {
    MemoryImages::default()
        .with("/assets/tilesets/Field.png", 32, 32)
        .with("/assets/tilesets/Caves.png", 48, 40)
        .with("/assets/animations/Water.png", 32, 16)
}
