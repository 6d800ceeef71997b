use crate::error::Result;
use crate::loader::image::ImageSource;
use log::trace;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sprite sheet thumbnails keyed by path, so each image is fetched once.
#[derive(Debug)]
pub struct SpriteCache<I> {
    images: HashMap<PathBuf, I>,
}

impl<I> Default for SpriteCache<I> {
    fn default() -> Self {
        SpriteCache {
            images: HashMap::new(),
        }
    }
}

impl<I: Clone> SpriteCache<I> {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Already loaded image for `path`.
    pub fn get(&self, path: &Path) -> Option<&I> {
        self.images.get(path)
    }

    /// Return the cached image for `path`, loading it on first use. Failed
    /// loads are not cached.
    pub async fn load<S>(&mut self, source: &mut S, path: &Path) -> Result<I>
    where
        S: ImageSource<Image = I>,
    {
        if let Some(image) = self.images.get(path) {
            trace!("sprite cache hit: {}", path.display());
            return Ok(image.clone());
        }
        let image = source.load(path).await?;
        self.images.insert(path.to_path_buf(), image.clone());
        Ok(image)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Forget every cached image.
    pub fn clear(&mut self) {
        self.images.clear();
    }
}
