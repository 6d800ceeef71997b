use crate::error::{EditorError, Result};
use crate::fill::flood_fill;
use crate::history::{CellChange, HistoryDelta};
use smallvec::SmallVec;

/// Global tile id; 0 is the empty tile.
pub type Gid = u32;

/// GIDs stacked in one cell of one layer, bottom tile first.
pub type CellStack = SmallVec<[Gid; 4]>;

/// Layers every new map starts with, bottom to top.
pub const DEFAULT_LAYER_NAMES: [&str; 6] = [
    "ground",
    "terrain",
    "buildings",
    "decorations",
    "treetops",
    "objects",
];

/// Topmost positive GID of a stack, or 0 when nothing is drawn there.
#[inline]
pub fn visible_gid(stack: &[Gid]) -> Gid {
    stack.iter().rev().copied().find(|&g| g > 0).unwrap_or(0)
}

/// One named layer: a row-major array of cell stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// Hidden layers are skipped when drawing.
    pub visible: bool,
    /// Row-major, `width * height` long.
    pub cells: Vec<CellStack>,
}

impl Layer {
    fn new(name: &str, cell_count: usize) -> Self {
        Layer {
            name: name.to_owned(),
            visible: true,
            cells: vec![CellStack::new(); cell_count],
        }
    }

    /// Visible value of every cell, row-major.
    pub fn visible_values(&self) -> Vec<Gid> {
        self.cells.iter().map(|s| visible_gid(s)).collect()
    }
}

/// Which side of a [`HistoryDelta`] to write back into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyDirection {
    /// Restore the old stacks (undo).
    Backward,
    /// Re-apply the new stacks (redo).
    Forward,
}

/// The editable map: equally sized layers plus map-wide editing state.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGrid {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    active_layer: usize,
}

impl MapGrid {
    /// An empty map with the default layer set.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_layers(width, height, &DEFAULT_LAYER_NAMES)
    }

    /// An empty map with the given layers, bottom first.
    pub fn with_layers(width: u32, height: u32, names: &[&str]) -> Self {
        let cell_count = width as usize * height as usize;
        MapGrid {
            width,
            height,
            layers: names.iter().map(|n| Layer::new(n, cell_count)).collect(),
            active_layer: 0,
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layers, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer names, bottom first.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// Layer at `index`.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    fn layer_mut(&mut self, index: usize) -> Result<&mut Layer> {
        let count = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(EditorError::LayerOutOfRange { index, count })
    }

    /// Layer that editing tools write to.
    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    /// Make `index` the layer editing tools write to.
    pub fn set_active_layer(&mut self, index: usize) -> Result<()> {
        self.layer_mut(index)?;
        self.active_layer = index;
        Ok(())
    }

    /// Show or hide a layer.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<()> {
        self.layer_mut(index)?.visible = visible;
        Ok(())
    }

    /// Flip a layer's visibility and return the new state.
    pub fn toggle_layer_visible(&mut self, index: usize) -> Result<bool> {
        let layer = self.layer_mut(index)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Row-major index of `(x, y)`, if it is on the map.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    fn checked_index(&self, x: u32, y: u32) -> Result<usize> {
        self.index(x, y).ok_or(EditorError::CellOutOfRange {
            x: x as i64,
            y: y as i64,
            width: self.width,
            height: self.height,
        })
    }

    /// Stack at `(x, y)` on `layer`.
    pub fn cell(&self, layer: usize, x: u32, y: u32) -> Option<&CellStack> {
        let idx = self.index(x, y)?;
        self.layers.get(layer).map(|l| &l.cells[idx])
    }

    /// Replace one cell's stack; `None` when the cell already holds it.
    pub fn set_cell(
        &mut self,
        layer: usize,
        x: u32,
        y: u32,
        stack: CellStack,
    ) -> Result<Option<HistoryDelta>> {
        let idx = self.checked_index(x, y)?;
        let cell = &mut self.layer_mut(layer)?.cells[idx];
        if *cell == stack {
            return Ok(None);
        }
        let old = std::mem::replace(cell, stack.clone());
        Ok(Some(HistoryDelta::new(
            layer,
            vec![CellChange::new(x, y, old, stack)],
        )))
    }

    /// Stack `gid` on top of the cell unless it is already the top tile.
    pub fn paint(&mut self, layer: usize, x: u32, y: u32, gid: Gid) -> Result<Option<HistoryDelta>> {
        let idx = self.checked_index(x, y)?;
        let cell = &mut self.layer_mut(layer)?.cells[idx];
        match paint_cell(cell, gid) {
            Some(change) => Ok(Some(HistoryDelta::new(layer, vec![change.at(x, y)]))),
            None => Ok(None),
        }
    }

    /// Paint a `columns`-wide block of GIDs with its top-left corner at
    /// `(x, y)`. Tiles falling off the map are skipped; 0 entries are holes.
    pub fn paint_block(
        &mut self,
        layer: usize,
        x: u32,
        y: u32,
        gids: &[Gid],
        columns: u32,
    ) -> Result<Option<HistoryDelta>> {
        self.checked_index(x, y)?;
        if columns == 0 {
            return Ok(None);
        }
        let (width, height) = (self.width, self.height);
        let cells = &mut self.layer_mut(layer)?.cells;
        let mut changes = Vec::new();
        for (i, &gid) in gids.iter().enumerate() {
            if gid == 0 {
                continue;
            }
            let cx = x + i as u32 % columns;
            let cy = y + i as u32 / columns;
            if cx >= width || cy >= height {
                continue;
            }
            let cell = &mut cells[(cy * width + cx) as usize];
            if let Some(change) = paint_cell(cell, gid) {
                changes.push(change.at(cx, cy));
            }
        }
        Ok((!changes.is_empty()).then(|| HistoryDelta::new(layer, changes)))
    }

    /// Remove the top tile of a cell.
    pub fn erase(&mut self, layer: usize, x: u32, y: u32) -> Result<Option<HistoryDelta>> {
        let idx = self.checked_index(x, y)?;
        let cell = &mut self.layer_mut(layer)?.cells[idx];
        if cell.is_empty() {
            return Ok(None);
        }
        let old = cell.clone();
        cell.pop();
        Ok(Some(HistoryDelta::new(
            layer,
            vec![CellChange::new(x, y, old, cell.clone())],
        )))
    }

    /// Bucket fill from `(x, y)`; `None` when the fill would change nothing.
    pub fn fill(&mut self, layer: usize, x: u32, y: u32, gid: Gid) -> Result<Option<HistoryDelta>> {
        self.checked_index(x, y)?;
        let (width, height) = (self.width, self.height);
        let cells = &mut self.layer_mut(layer)?.cells;
        let changes = flood_fill(cells, width, height, x, y, gid);
        Ok((!changes.is_empty()).then(|| HistoryDelta::new(layer, changes)))
    }

    /// Write one side of a recorded delta back into the grid. Nothing is
    /// written unless every change lies on the map.
    pub fn apply(&mut self, delta: &HistoryDelta, direction: ApplyDirection) -> Result<()> {
        let width = self.width;
        let height = self.height;
        if let Some(bad) = delta
            .changes()
            .iter()
            .find(|c| c.x >= width || c.y >= height)
        {
            return Err(EditorError::CellOutOfRange {
                x: bad.x as i64,
                y: bad.y as i64,
                width,
                height,
            });
        }
        let cells = &mut self.layer_mut(delta.layer_index())?.cells;
        for change in delta.changes() {
            let stack = match direction {
                ApplyDirection::Backward => &change.old,
                ApplyDirection::Forward => &change.new,
            };
            cells[(change.y * width + change.x) as usize] = stack.clone();
        }
        Ok(())
    }
}

/// `(old, new)` of a single cell before its coordinates are attached.
struct PendingChange(CellStack, CellStack);

impl PendingChange {
    fn at(self, x: u32, y: u32) -> CellChange {
        CellChange::new(x, y, self.0, self.1)
    }
}

fn paint_cell(cell: &mut CellStack, gid: Gid) -> Option<PendingChange> {
    if gid == 0 || cell.last() == Some(&gid) {
        return None;
    }
    let old = cell.clone();
    cell.push(gid);
    Some(PendingChange(old, cell.clone()))
}
