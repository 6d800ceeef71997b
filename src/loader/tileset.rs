use crate::config::EditorConfig;
use crate::error::Result;
use crate::loader::image::{ImageSource, TileImage};
use crate::tileset::{Tileset, TilesetRegistry};
use log::{debug, info, warn};
use std::path::Path;

/// Load every catalogue image in order and number them into one registry.
///
/// Images are awaited one at a time with a yield before each, and
/// `on_progress(index, total, name)` fires before every load and once more as
/// `(total, total, "")` at the end. The first failure aborts the batch and no
/// registry is returned.
pub async fn load_all<S, F>(
    source: &mut S,
    config: &EditorConfig,
    base_path: &Path,
    mut on_progress: F,
) -> Result<TilesetRegistry<S::Image>>
where
    S: ImageSource,
    F: FnMut(usize, usize, &str),
{
    let total = config.catalogue.len();
    let mut registry = TilesetRegistry::new();

    for (i, entry) in config.catalogue.iter().enumerate() {
        on_progress(i, total, &entry.name);
        source.yield_now().await;

        let path = entry.image_path(base_path);
        let image = match source.load(&path).await {
            Ok(image) => image,
            Err(e) => {
                warn!("tileset load aborted at {}/{}: {e}", i + 1, total);
                return Err(e);
            }
        };
        let (w, h) = image.size();
        let first_gid = registry.next_gid();
        let tileset = Tileset::new(
            entry.name.clone(),
            image,
            w,
            h,
            config.tile_size,
            first_gid,
            entry.category,
        );
        debug!(
            "loaded {} ({}x{} tiles) at gid {}",
            tileset.name,
            tileset.columns,
            tileset.rows,
            first_gid
        );
        registry.push(tileset);
    }

    on_progress(total, total, "");
    info!(
        "loaded {} tilesets, {} gids",
        registry.len(),
        registry.next_gid() - 1
    );
    Ok(registry)
}
