use macroquad::prelude::*;

/// Pan/zoom applied to the map when drawing it on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of the map's top-left corner, in pixels.
    pub offset: Vec2,
    /// Screen pixels per map pixel.
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Viewport at a pixel offset and zoom.
    pub fn new(offset_x: f32, offset_y: f32, zoom: f32) -> Self {
        Viewport {
            offset: vec2(offset_x, offset_y),
            zoom,
        }
    }

    /// On-screen edge length of one tile.
    #[inline]
    pub fn scaled_tile(&self, tile_size: u32) -> f32 {
        tile_size as f32 * self.zoom
    }

    /// Screen rectangle of tile `(col, row)`.
    #[inline]
    pub fn tile_rect(&self, col: u32, row: u32, tile_size: u32) -> Rect {
        let s = self.scaled_tile(tile_size);
        Rect::new(
            self.offset.x + col as f32 * s,
            self.offset.y + row as f32 * s,
            s,
            s,
        )
    }

    /// Tile under a screen position; may be negative or past the map edge.
    pub fn screen_to_tile(&self, screen: Vec2, tile_size: u32) -> Option<(i64, i64)> {
        let s = self.scaled_tile(tile_size);
        if s <= 0.0 {
            return None;
        }
        let t = (screen - self.offset) / s;
        Some((t.x.floor() as i64, t.y.floor() as i64))
    }
}

/// Half-open range of tiles to draw: `[start_col, end_col) x [start_row, end_row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileWindow {
    /// First visible column.
    pub start_col: u32,
    /// One past the last visible column.
    pub end_col: u32,
    /// First visible row.
    pub start_row: u32,
    /// One past the last visible row.
    pub end_row: u32,
}

impl TileWindow {
    /// Whether the window covers no cells.
    pub fn is_empty(&self) -> bool {
        self.start_col >= self.end_col || self.start_row >= self.end_row
    }

    /// Whether `(col, row)` lies in the window.
    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.start_col..self.end_col).contains(&col) && (self.start_row..self.end_row).contains(&row)
    }

    /// Number of cells in the window.
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.end_col - self.start_col) as usize * (self.end_row - self.start_row) as usize
    }

    /// Row-major `(col, row)` pairs inside the window.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let (c0, c1) = (self.start_col, self.end_col);
        (self.start_row..self.end_row).flat_map(move |r| (c0..c1).map(move |c| (c, r)))
    }
}

fn axis_range(offset: f32, extent: f32, scaled: f32, tiles: u32) -> (u32, u32) {
    let start = (-offset / scaled).floor() as i64;
    let end = ((extent - offset) / scaled).ceil() as i64;
    let start = start.clamp(0, tiles as i64) as u32;
    let end = end.clamp(0, tiles as i64) as u32;
    (start, end.max(start))
}

/// Smallest tile window covering every tile that intersects a canvas of
/// `canvas` pixels, clamped to the map.
pub fn visible_window(
    viewport: &Viewport,
    canvas: Vec2,
    map_width: u32,
    map_height: u32,
    tile_size: u32,
) -> TileWindow {
    let s = viewport.scaled_tile(tile_size);
    if s.is_nan() || s <= 0.0 || canvas.x <= 0.0 || canvas.y <= 0.0 {
        return TileWindow::default();
    }
    let (start_col, end_col) = axis_range(viewport.offset.x, canvas.x, s, map_width);
    let (start_row, end_row) = axis_range(viewport.offset.y, canvas.y, s, map_height);
    TileWindow {
        start_col,
        end_col,
        start_row,
        end_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intersects(r: Rect, canvas: Vec2) -> bool {
        r.x < canvas.x && r.x + r.w > 0.0 && r.y < canvas.y && r.y + r.h > 0.0
    }

    #[test]
    fn window_is_exact_for_many_viewports() {
        let canvas = vec2(200.0, 120.0);
        let (mw, mh) = (40, 30);
        for &zoom in &[0.5f32, 1.0, 1.5, 2.0, 3.0] {
            for &ox in &[-333.0f32, -64.0, -17.0, 0.0, 5.0, 150.0, 260.0] {
                for &oy in &[-200.0f32, -16.0, 0.0, 7.0, 130.0] {
                    let vp = Viewport::new(ox, oy, zoom);
                    let win = visible_window(&vp, canvas, mw, mh, 16);
                    for row in 0..mh {
                        for col in 0..mw {
                            let hit = intersects(vp.tile_rect(col, row, 16), canvas);
                            assert_eq!(
                                hit,
                                win.contains(col, row),
                                "zoom {zoom} offset ({ox},{oy}) tile ({col},{row})"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn zero_zoom_draws_nothing() {
        let win = visible_window(&Viewport::new(0.0, 0.0, 0.0), vec2(100.0, 100.0), 8, 8, 16);
        assert!(win.is_empty());
        assert_eq!(win.cells().count(), 0);
    }

    #[test]
    fn cells_iterate_row_major() {
        let win = TileWindow { start_col: 1, end_col: 3, start_row: 0, end_row: 2 };
        let cells: Vec<_> = win.cells().collect();
        assert_eq!(cells, vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
        assert_eq!(win.cell_count(), 4);
    }

    #[test]
    fn screen_to_tile_floors_negative_positions() {
        let vp = Viewport::new(10.0, 10.0, 2.0);
        assert_eq!(vp.screen_to_tile(vec2(42.0, 9.0), 16), Some((1, -1)));
    }
}
