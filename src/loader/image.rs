use crate::error::{EditorError, Result};
use macroquad::prelude::*;
use std::future::Future;
use std::path::Path;

/// Pixel dimensions of a loaded image.
pub trait TileImage {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);
}

impl TileImage for Texture2D {
    fn size(&self) -> (u32, u32) {
        (self.width() as u32, self.height() as u32)
    }
}

/// Where tileset and sprite images come from.
pub trait ImageSource {
    /// Decoded image handle.
    type Image: TileImage;

    /// Fetch and decode one image.
    fn load(&mut self, path: &Path) -> impl Future<Output = Result<Self::Image>>;

    /// Hand control back to the host between loads so it can repaint.
    fn yield_now(&mut self) -> impl Future<Output = ()>;
}

/// Loads textures through macroquad and yields by waiting for the next frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadImages;

impl ImageSource for MacroquadImages {
    type Image = Texture2D;

    async fn load(&mut self, path: &Path) -> Result<Texture2D> {
        let tex = load_texture(&path.to_string_lossy())
            .await
            .map_err(|e| EditorError::AssetLoad {
                path: path.to_path_buf(),
                reason: format!("{e:?}"),
            })?;
        tex.set_filter(FilterMode::Nearest);
        Ok(tex)
    }

    async fn yield_now(&mut self) {
        next_frame().await
    }
}
