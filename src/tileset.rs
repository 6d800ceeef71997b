use crate::config::TilesetCategory;
use crate::error::{EditorError, Result};
use crate::map::Gid;
use macroquad::prelude::{Rect, Texture2D};

/// A loaded tileset image sliced into a regular grid of square tiles.
#[derive(Debug, Clone)]
pub struct Tileset<I = Texture2D> {
    /// Catalogue name.
    pub name: String,
    /// Loaded image handle.
    pub image: I,
    /// Pixels.
    pub image_width: u32,
    /// Pixels.
    pub image_height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Whole tiles per row.
    pub columns: u32,
    /// Whole tiles per column.
    pub rows: u32,
    /// `columns * rows`.
    pub tile_count: u32,
    /// First GID owned by this tileset; 0 is never assigned.
    pub first_gid: Gid,
    /// Picker category.
    pub category: TilesetCategory,
    /// One flag per local tile id, `true` = walkable.
    pub walkability: Vec<bool>,
}

impl<I> Tileset<I> {
    /// Slice an image into `tile_size` tiles; partial rows and columns are dropped.
    pub fn new(
        name: impl Into<String>,
        image: I,
        image_width: u32,
        image_height: u32,
        tile_size: u32,
        first_gid: Gid,
        category: TilesetCategory,
    ) -> Self {
        let columns = image_width.checked_div(tile_size).unwrap_or(0);
        let rows = image_height.checked_div(tile_size).unwrap_or(0);
        let tile_count = columns * rows;
        Tileset {
            name: name.into(),
            image,
            image_width,
            image_height,
            tile_width: tile_size,
            tile_height: tile_size,
            columns,
            rows,
            tile_count,
            first_gid,
            category,
            walkability: vec![true; tile_count as usize],
        }
    }

    /// Whether `gid` falls in this tileset's range.
    #[inline]
    pub fn contains_gid(&self, gid: Gid) -> bool {
        gid >= self.first_gid && gid < self.first_gid + self.tile_count
    }

    /// Pixel rectangle of `local_id` inside the tileset image.
    pub fn source_rect(&self, local_id: u32) -> Rect {
        let cols = self.columns.max(1);
        let col = local_id % cols;
        let row = local_id / cols;
        Rect::new(
            (col * self.tile_width) as f32,
            (row * self.tile_height) as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        )
    }

    /// Walkability of a local tile; ids without a flag count as walkable.
    #[inline]
    pub fn is_walkable(&self, local_id: u32) -> bool {
        self.walkability
            .get(local_id as usize)
            .copied()
            .unwrap_or(true)
    }
}

/// A GID resolved to its owning tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTile {
    /// Index in the registry.
    pub tileset_index: usize,
    /// Tile index inside that tileset, row-major.
    pub local_id: u32,
}

/// Rectangle of tiles picked in the tileset browser; corners in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSelection {
    /// Corner where the drag started.
    pub start_col: u32,
    /// Row where the drag started.
    pub start_row: u32,
    /// Corner under the cursor.
    pub end_col: u32,
    /// Row under the cursor.
    pub end_row: u32,
}

impl TileSelection {
    /// A one-tile selection.
    pub fn single(col: u32, row: u32) -> Self {
        TileSelection {
            start_col: col,
            start_row: row,
            end_col: col,
            end_row: row,
        }
    }

    /// `(min_col, min_row, max_col, max_row)`, inclusive.
    pub fn normalized(&self) -> (u32, u32, u32, u32) {
        (
            self.start_col.min(self.end_col),
            self.start_row.min(self.end_row),
            self.start_col.max(self.end_col),
            self.start_row.max(self.end_row),
        )
    }

    /// Width and height in tiles.
    pub fn size(&self) -> (u32, u32) {
        let (c0, r0, c1, r1) = self.normalized();
        ((c1 - c0).saturating_add(1), (r1 - r0).saturating_add(1))
    }
}

/// Ordered list of tilesets sharing one GID namespace.
///
/// GID ranges are contiguous and assigned in load order starting at 1, which
/// keeps the numbering compatible with Tiled's `firstgid` scheme.
#[derive(Debug, Clone)]
pub struct TilesetRegistry<I = Texture2D> {
    tilesets: Vec<Tileset<I>>,
}

impl<I> Default for TilesetRegistry<I> {
    fn default() -> Self {
        TilesetRegistry {
            tilesets: Vec::new(),
        }
    }
}

impl<I> TilesetRegistry<I> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-numbered tilesets. They must be sorted by `first_gid`.
    pub fn from_tilesets(tilesets: Vec<Tileset<I>>) -> Self {
        debug_assert!(tilesets.windows(2).all(|w| w[0].first_gid <= w[1].first_gid));
        TilesetRegistry { tilesets }
    }

    /// GID the next appended tileset would receive.
    pub fn next_gid(&self) -> Gid {
        self.tilesets
            .last()
            .map(|t| t.first_gid + t.tile_count)
            .unwrap_or(1)
    }

    /// Append a tileset, giving it the next free GID range.
    pub fn push(&mut self, mut tileset: Tileset<I>) -> usize {
        tileset.first_gid = self.next_gid();
        self.tilesets.push(tileset);
        self.tilesets.len() - 1
    }

    /// Number of tilesets.
    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    /// Whether no tileset is loaded.
    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    /// Tileset at `index`.
    pub fn get(&self, index: usize) -> Option<&Tileset<I>> {
        self.tilesets.get(index)
    }

    /// Tilesets in GID order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tileset<I>> {
        self.tilesets.iter()
    }

    /// Tilesets in GID order.
    pub fn as_slice(&self) -> &[Tileset<I>] {
        &self.tilesets
    }

    /// Map a GID to its tileset and local id.
    ///
    /// Returns `None` for 0 and for GIDs past the last tileset's range; both
    /// mean "no tile" rather than an error.
    pub fn resolve(&self, gid: Gid) -> Option<ResolvedTile> {
        if gid == 0 {
            return None;
        }
        // last tileset whose first_gid <= gid
        let idx = self.tilesets.partition_point(|t| t.first_gid <= gid);
        if idx == 0 {
            return None;
        }
        let tileset_index = idx - 1;
        let ts = &self.tilesets[tileset_index];
        if !ts.contains_gid(gid) {
            return None;
        }
        Some(ResolvedTile {
            tileset_index,
            local_id: gid - ts.first_gid,
        })
    }

    /// Like [`resolve`](Self::resolve) but hands back the tileset itself.
    #[inline]
    pub fn resolve_tileset(&self, gid: Gid) -> Option<(&Tileset<I>, u32)> {
        self.resolve(gid)
            .map(|r| (&self.tilesets[r.tileset_index], r.local_id))
    }

    /// GID of `local_id` in tileset `tileset_index`.
    pub fn gid_of(&self, tileset_index: usize, local_id: u32) -> Option<Gid> {
        let ts = self.tilesets.get(tileset_index)?;
        (local_id < ts.tile_count).then(|| ts.first_gid + local_id)
    }

    /// Walkability of a GID; unresolvable GIDs do not block.
    pub fn is_gid_walkable(&self, gid: Gid) -> bool {
        match self.resolve_tileset(gid) {
            Some((ts, local)) => ts.is_walkable(local),
            None => true,
        }
    }

    fn walkability_flag(&mut self, index: usize, local_id: u32) -> Result<&mut bool> {
        let count = self.tilesets.len();
        let ts = self
            .tilesets
            .get_mut(index)
            .ok_or(EditorError::TilesetOutOfRange { index, count })?;
        let tile_count = ts.tile_count;
        ts.walkability
            .get_mut(local_id as usize)
            .ok_or(EditorError::TileOutOfRange {
                tileset: index,
                local_id,
                tile_count,
            })
    }

    /// Flip one tile's walkability flag and return the new value.
    pub fn toggle_walkability(&mut self, tileset_index: usize, local_id: u32) -> Result<bool> {
        let flag = self.walkability_flag(tileset_index, local_id)?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Set one tile's walkability; returns whether anything changed.
    pub fn set_walkability(
        &mut self,
        tileset_index: usize,
        local_id: u32,
        walkable: bool,
    ) -> Result<bool> {
        let flag = self.walkability_flag(tileset_index, local_id)?;
        if *flag == walkable {
            return Ok(false);
        }
        *flag = walkable;
        Ok(true)
    }

    /// Index of the first tileset in `category`, or 0 when none matches.
    pub fn first_index_in_category(&self, category: Option<TilesetCategory>) -> usize {
        match category {
            None => 0,
            Some(c) => self
                .tilesets
                .iter()
                .position(|t| t.category == c)
                .unwrap_or(0),
        }
    }

    /// `selection` clipped to the tiles of `tileset_index`, or `None` when it
    /// starts outside the tileset.
    pub fn clamp_selection(&self, tileset_index: usize, selection: &TileSelection) -> Option<TileSelection> {
        let ts = self.tilesets.get(tileset_index)?;
        let (c0, r0, c1, r1) = selection.normalized();
        if c0 >= ts.columns || r0 >= ts.rows {
            return None;
        }
        Some(TileSelection {
            start_col: c0,
            start_row: r0,
            end_col: c1.min(ts.columns - 1),
            end_row: r1.min(ts.rows - 1),
        })
    }

    /// GIDs covered by `selection` in `tileset_index`, row-major. Parts of the
    /// selection past the tileset edge are dropped.
    pub fn selected_gids(&self, tileset_index: usize, selection: &TileSelection) -> Vec<Gid> {
        let Some(sel) = self.clamp_selection(tileset_index, selection) else {
            return Vec::new();
        };
        let ts = &self.tilesets[tileset_index];
        let (cols, rows) = sel.size();
        let mut gids = Vec::with_capacity((cols * rows) as usize);
        for r in sel.start_row..=sel.end_row {
            for c in sel.start_col..=sel.end_col {
                gids.push(ts.first_gid + r * ts.columns + c);
            }
        }
        gids
    }
}
