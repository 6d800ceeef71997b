use crate::animation::{AnimationGroup, AnimationLibrary};
use crate::config::{EditorConfig, TilesetCategory};
use crate::error::Result;
use crate::history::{History, HistoryDelta};
use crate::loader::image::ImageSource;
use crate::loader::tileset::load_all;
use crate::map::{ApplyDirection, Gid, MapGrid};
use crate::render::{render_map, Painter, RenderOptions, RenderStyle, TileWindow};
use crate::tileset::{TileSelection, TilesetRegistry};
use log::{error, info};
use macroquad::prelude::Texture2D;
use std::path::Path;
use uuid::Uuid;

/// Everything one editing session owns: tilesets, the map, animations and
/// undo history. The shell holds one of these and drives it from its UI
/// thread.
pub struct EditorSession<I = Texture2D> {
    config: EditorConfig,
    tilesets: TilesetRegistry<I>,
    map: MapGrid,
    animations: AnimationLibrary,
    history: History,
    /// Last tileset load failure, for the shell's retry prompt.
    pub load_error: Option<String>,
    /// Tileset shown in the picker.
    pub active_tileset: usize,
    /// Picker filter; `None` shows all.
    pub active_category: Option<TilesetCategory>,
    /// Brush tiles picked in the active tileset.
    pub selection: Option<TileSelection>,
    /// Colours used by `render`.
    pub style: RenderStyle,
}

impl<I> EditorSession<I> {
    /// A session with a blank map and no tilesets loaded.
    pub fn new(config: EditorConfig, width: u32, height: u32) -> Self {
        let history = History::with_capacity(config.history_capacity);
        EditorSession {
            config,
            tilesets: TilesetRegistry::new(),
            map: MapGrid::new(width, height),
            animations: AnimationLibrary::new(),
            history,
            load_error: None,
            active_tileset: 0,
            active_category: None,
            selection: None,
            style: RenderStyle::default(),
        }
    }

    /// Settings the session was created with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Loaded tilesets.
    pub fn tilesets(&self) -> &TilesetRegistry<I> {
        &self.tilesets
    }

    /// The map being edited.
    pub fn map(&self) -> &MapGrid {
        &self.map
    }

    /// Layer visibility and active layer; tile edits go through the
    /// recording methods below.
    pub fn map_mut(&mut self) -> &mut MapGrid {
        &mut self.map
    }

    /// Animation groups and their lookup.
    pub fn animations(&self) -> &AnimationLibrary {
        &self.animations
    }

    /// Undo and redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Load the configured catalogue. On failure the registry is left empty
    /// and the error is kept in `load_error`.
    pub async fn load_tilesets<S, F>(
        &mut self,
        source: &mut S,
        base_path: &Path,
        on_progress: F,
    ) -> Result<()>
    where
        S: ImageSource<Image = I>,
        F: FnMut(usize, usize, &str),
    {
        self.tilesets = TilesetRegistry::new();
        match load_all(source, &self.config, base_path, on_progress).await {
            Ok(registry) => {
                self.tilesets = registry;
                self.load_error = None;
                self.animations.rebuild(&self.tilesets);
                Ok(())
            }
            Err(e) => {
                error!("tileset load failed: {e}");
                self.load_error = Some(e.to_string());
                self.animations.rebuild(&self.tilesets);
                Err(e)
            }
        }
    }

    /// Start over on a blank map; history does not carry across maps.
    pub fn new_map(&mut self, width: u32, height: u32) {
        info!("new map {width}x{height}");
        self.map = MapGrid::new(width, height);
        self.history.clear();
    }

    /// Switch the picker to another tileset, dropping the selection.
    pub fn set_active_tileset(&mut self, index: usize) {
        self.active_tileset = index;
        self.selection = None;
    }

    /// Filter the browser by category and jump to its first tileset.
    pub fn set_active_category(&mut self, category: Option<TilesetCategory>) {
        self.active_category = category;
        self.active_tileset = self.tilesets.first_index_in_category(category);
        self.selection = None;
    }

    /// GIDs under the current selection in the active tileset.
    pub fn selected_gids(&self) -> Vec<Gid> {
        match &self.selection {
            Some(sel) => self.tilesets.selected_gids(self.active_tileset, sel),
            None => Vec::new(),
        }
    }

    /// Set one tile's walkability; returns whether it changed.
    pub fn set_walkability(&mut self, tileset_index: usize, local_id: u32, walkable: bool) -> Result<bool> {
        self.tilesets.set_walkability(tileset_index, local_id, walkable)
    }

    /// Flip one tile's walkability and return the new value.
    pub fn toggle_walkability(&mut self, tileset_index: usize, local_id: u32) -> Result<bool> {
        self.tilesets.toggle_walkability(tileset_index, local_id)
    }

    fn record(&mut self, delta: Option<HistoryDelta>) -> bool {
        match delta {
            Some(delta) => {
                self.history.push(delta);
                true
            }
            None => false,
        }
    }

    /// Brush: stamp the current selection on the active layer at `(x, y)`.
    /// Returns whether anything changed.
    pub fn paint(&mut self, x: u32, y: u32) -> Result<bool> {
        let Some(sel) = self
            .selection
            .and_then(|sel| self.tilesets.clamp_selection(self.active_tileset, &sel))
        else {
            return Ok(false);
        };
        let gids = self.tilesets.selected_gids(self.active_tileset, &sel);
        let (cols, _) = sel.size();
        let delta = self.map.paint_block(self.map.active_layer(), x, y, &gids, cols)?;
        Ok(self.record(delta))
    }

    /// Place a single GID on the active layer.
    pub fn paint_gid(&mut self, x: u32, y: u32, gid: Gid) -> Result<bool> {
        let delta = self.map.paint(self.map.active_layer(), x, y, gid)?;
        Ok(self.record(delta))
    }

    /// Remove the top tile under the cursor on the active layer.
    pub fn erase(&mut self, x: u32, y: u32) -> Result<bool> {
        let delta = self.map.erase(self.map.active_layer(), x, y)?;
        Ok(self.record(delta))
    }

    /// Bucket fill on the active layer.
    pub fn fill(&mut self, x: u32, y: u32, gid: Gid) -> Result<bool> {
        let delta = self.map.fill(self.map.active_layer(), x, y, gid)?;
        Ok(self.record(delta))
    }

    /// Revert the newest edit; `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo() {
            Some(delta) => {
                self.map.apply(delta, ApplyDirection::Backward)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the newest undone edit.
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo() {
            Some(delta) => {
                self.map.apply(delta, ApplyDirection::Forward)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether an undo step exists.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step exists.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Add a group and recompile the lookup.
    pub fn add_animation_group(&mut self, group: AnimationGroup) {
        self.animations.add(group, &self.tilesets);
    }

    /// Replace the group with `id`; returns false if there is none.
    pub fn update_animation_group(&mut self, id: Uuid, group: AnimationGroup) -> bool {
        self.animations.update(id, group, &self.tilesets)
    }

    /// Remove the group with `id`; returns false if there is none.
    pub fn remove_animation_group(&mut self, id: Uuid) -> bool {
        self.animations.remove(id, &self.tilesets)
    }

    /// Replace every group, e.g. when opening a project.
    pub fn set_animation_groups(&mut self, groups: Vec<AnimationGroup>) {
        self.animations.set_groups(groups, &self.tilesets);
    }

    /// Draw the map; `options.tile_size` is overridden by the configured one.
    pub fn render<P>(&self, painter: &mut P, options: &RenderOptions) -> TileWindow
    where
        P: Painter<Image = I>,
    {
        let options = RenderOptions {
            tile_size: self.config.tile_size,
            ..*options
        };
        render_map(
            painter,
            &self.map,
            &self.tilesets,
            self.animations.lookup(),
            &options,
            &self.style,
        )
    }
}
