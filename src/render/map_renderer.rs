use crate::animation::{animated_gid, AnimationLookup};
use crate::map::MapGrid;
use crate::render::cull::{visible_window, TileWindow, Viewport};
use crate::render::painter::Painter;
use crate::tileset::{TileSelection, Tileset, TilesetRegistry};
use macroquad::prelude::*;

/// Colours and opacities used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    /// Canvas clear colour.
    pub background: Color,
    /// Fill behind the map area.
    pub map_background: Color,
    /// Map grid lines.
    pub grid: Color,
    /// Grid colour once zoom reaches 2.
    pub grid_zoomed: Color,
    /// Grid over the tileset preview.
    pub preview_grid: Color,
    /// Overlay tint on walkable cells.
    pub walkable: Color,
    /// Overlay tint on blocked cells.
    pub blocked: Color,
    /// Map border and selection outline.
    pub border: Color,
    /// Fill inside the picker selection.
    pub selection_fill: Color,
    /// Opacity of every layer except the active one.
    pub inactive_alpha: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            background: Color::new(0.176, 0.176, 0.176, 1.0),
            map_background: Color::new(0.290, 0.549, 0.247, 1.0),
            grid: Color::new(1.0, 1.0, 1.0, 0.12),
            grid_zoomed: Color::new(1.0, 1.0, 1.0, 0.2),
            preview_grid: Color::new(1.0, 1.0, 1.0, 0.15),
            walkable: Color::new(0.0, 1.0, 0.0, 0.25),
            blocked: Color::new(1.0, 0.0, 0.0, 0.3),
            border: Color::new(0.886, 0.718, 0.078, 1.0),
            selection_fill: Color::new(0.886, 0.718, 0.078, 0.2),
            inactive_alpha: 0.7,
        }
    }
}

/// Per-frame inputs owned by the editor shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Pan and zoom.
    pub viewport: Viewport,
    /// Tile edge in map pixels.
    pub tile_size: u32,
    /// Draw grid lines over the visible window.
    pub show_grid: bool,
    /// Tint cells by walkability.
    pub show_walkability: bool,
    /// Substitute animation frames for anchor GIDs.
    pub show_animations: bool,
    /// Clock driving tile animations, in milliseconds.
    pub timestamp_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            viewport: Viewport::default(),
            tile_size: crate::config::TILE_SIZE,
            show_grid: true,
            show_walkability: false,
            show_animations: true,
            timestamp_ms: 0,
        }
    }
}

/// Whether `(col, row)` can be walked on: every positive GID stacked there,
/// on every layer, must be walkable. Unresolvable GIDs do not block.
pub fn is_walkable<I>(map: &MapGrid, tilesets: &TilesetRegistry<I>, col: u32, row: u32) -> bool {
    let Some(idx) = map.index(col, row) else {
        return true;
    };
    map.layers().iter().all(|layer| {
        layer.cells[idx]
            .iter()
            .filter(|&&gid| gid > 0)
            .all(|&gid| tilesets.is_gid_walkable(gid))
    })
}

/// Draw the visible part of the map with its overlays. Returns the tile
/// window that was drawn.
pub fn render_map<P: Painter>(
    painter: &mut P,
    map: &MapGrid,
    tilesets: &TilesetRegistry<P::Image>,
    animations: &AnimationLookup,
    options: &RenderOptions,
    style: &RenderStyle,
) -> TileWindow {
    let canvas = painter.canvas_size();
    let vp = options.viewport;
    let tile_size = options.tile_size;
    let s = vp.scaled_tile(tile_size);

    painter.clear(style.background);
    painter.fill_rect(Rect::new(0.0, 0.0, canvas.x, canvas.y), style.background);
    let map_rect = Rect::new(
        vp.offset.x,
        vp.offset.y,
        map.width() as f32 * s,
        map.height() as f32 * s,
    );
    painter.fill_rect(map_rect, style.map_background);

    let window = visible_window(&vp, canvas, map.width(), map.height(), tile_size);

    for (li, layer) in map.layers().iter().enumerate() {
        if !layer.visible {
            continue;
        }
        painter.set_alpha(if li == map.active_layer() {
            1.0
        } else {
            style.inactive_alpha
        });

        for (col, row) in window.cells() {
            let stack = &layer.cells[(row * map.width() + col) as usize];
            for &gid in stack.iter() {
                if gid == 0 {
                    continue;
                }
                let gid = if options.show_animations {
                    animated_gid(animations, gid, options.timestamp_ms)
                } else {
                    gid
                };
                let Some((ts, local)) = tilesets.resolve_tileset(gid) else {
                    continue;
                };
                painter.draw_image(
                    &ts.image,
                    Some(ts.source_rect(local)),
                    vp.tile_rect(col, row, tile_size),
                );
            }
        }
    }

    painter.set_alpha(1.0);

    if options.show_walkability {
        for (col, row) in window.cells() {
            let color = if is_walkable(map, tilesets, col, row) {
                style.walkable
            } else {
                style.blocked
            };
            painter.fill_rect(vp.tile_rect(col, row, tile_size), color);
        }
    }

    if options.show_grid && !window.is_empty() {
        let color = if vp.zoom >= 2.0 {
            style.grid_zoomed
        } else {
            style.grid
        };
        let top = vp.offset.y + window.start_row as f32 * s;
        let bottom = vp.offset.y + window.end_row as f32 * s;
        let left = vp.offset.x + window.start_col as f32 * s;
        let right = vp.offset.x + window.end_col as f32 * s;
        for col in window.start_col..=window.end_col {
            let x = (vp.offset.x + col as f32 * s).round() + 0.5;
            painter.line(vec2(x, top), vec2(x, bottom), 1.0, color);
        }
        for row in window.start_row..=window.end_row {
            let y = (vp.offset.y + row as f32 * s).round() + 0.5;
            painter.line(vec2(left, y), vec2(right, y), 1.0, color);
        }
    }

    painter.stroke_rect(map_rect, 2.0, style.border);
    window
}

/// Draw one tileset image at `scale` for the tile picker, with walkability
/// tint, tile grid and the current selection.
pub fn render_tileset_preview<P: Painter>(
    painter: &mut P,
    tileset: &Tileset<P::Image>,
    scale: f32,
    selection: Option<&TileSelection>,
    show_walkability: bool,
    style: &RenderStyle,
) {
    let w = tileset.image_width as f32 * scale;
    let h = tileset.image_height as f32 * scale;
    let ts = tileset.tile_width as f32 * scale;

    painter.clear(Color::new(0.0, 0.0, 0.0, 0.0));
    painter.set_alpha(1.0);
    painter.draw_image(&tileset.image, None, Rect::new(0.0, 0.0, w, h));

    let cols = tileset.columns.max(1);
    if show_walkability {
        for local in 0..tileset.tile_count {
            let col = (local % cols) as f32;
            let row = (local / cols) as f32;
            let color = if tileset.is_walkable(local) {
                style.walkable
            } else {
                style.blocked
            };
            painter.fill_rect(Rect::new(col * ts, row * ts, ts, ts), color);
        }
    }

    for c in 0..=tileset.columns {
        let x = (c as f32 * ts).round() + 0.5;
        painter.line(vec2(x, 0.0), vec2(x, h), 1.0, style.preview_grid);
    }
    for r in 0..=tileset.rows {
        let y = (r as f32 * ts).round() + 0.5;
        painter.line(vec2(0.0, y), vec2(w, y), 1.0, style.preview_grid);
    }

    if let Some(sel) = selection {
        let (c0, r0, _, _) = sel.normalized();
        let (sw, sh) = sel.size();
        let rect = Rect::new(
            c0 as f32 * ts,
            r0 as f32 * ts,
            sw as f32 * ts,
            sh as f32 * ts,
        );
        painter.stroke_rect(rect, 2.0, style.border);
        painter.fill_rect(rect, style.selection_fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{compile_lookup, AnimationGroup};
    use crate::config::TilesetCategory;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill(Rect, Color),
        Stroke(Rect),
        Line,
        Image { name: &'static str, src: Option<Rect>, dest: Rect, alpha: f32 },
    }

    struct Recorder {
        size: Vec2,
        alpha: f32,
        ops: Vec<Op>,
    }

    impl Recorder {
        fn new(w: f32, h: f32) -> Self {
            Recorder { size: vec2(w, h), alpha: 1.0, ops: Vec::new() }
        }

        fn images(&self) -> Vec<&Op> {
            self.ops.iter().filter(|o| matches!(o, Op::Image { .. })).collect()
        }
    }

    impl Painter for Recorder {
        type Image = &'static str;

        fn canvas_size(&self) -> Vec2 {
            self.size
        }
        fn clear(&mut self, _color: Color) {
            self.ops.clear();
        }
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Fill(rect, color));
        }
        fn stroke_rect(&mut self, rect: Rect, _thickness: f32, _color: Color) {
            self.ops.push(Op::Stroke(rect));
        }
        fn line(&mut self, _from: Vec2, _to: Vec2, _thickness: f32, _color: Color) {
            self.ops.push(Op::Line);
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
        }
        fn draw_image(&mut self, image: &&'static str, src: Option<Rect>, dest: Rect) {
            self.ops.push(Op::Image { name: *image, src, dest, alpha: self.alpha });
        }
    }

    fn registry() -> TilesetRegistry<&'static str> {
        let mut reg = TilesetRegistry::new();
        // 2x2 tiles: gids 1..=4
        reg.push(Tileset::new("ground", "ground", 32, 32, 16, 0, TilesetCategory::Village));
        // 4x1 tiles: gids 5..=8
        reg.push(Tileset::new("water", "water", 64, 16, 16, 0, TilesetCategory::Animations));
        reg
    }

    fn options() -> RenderOptions {
        RenderOptions { show_grid: false, ..Default::default() }
    }

    #[test]
    fn draws_only_the_culled_window() {
        let reg = registry();
        let mut map = MapGrid::with_layers(10, 10, &["ground"]);
        for y in 0..10 {
            for x in 0..10 {
                map.paint(0, x, y, 1).unwrap();
            }
        }
        let mut p = Recorder::new(32.0, 16.0);
        let win = render_map(&mut p, &map, &reg, &AnimationLookup::new(), &options(), &RenderStyle::default());
        assert_eq!(win.cell_count(), 2);
        assert_eq!(p.images().len(), 2);
        assert!(matches!(p.ops.last(), Some(Op::Stroke(r)) if r.w == 160.0 && r.h == 160.0));
    }

    #[test]
    fn stacks_draw_bottom_to_top_and_skip_unknown_gids() {
        let reg = registry();
        let mut map = MapGrid::with_layers(1, 1, &["ground"]);
        map.set_cell(0, 0, 0, smallvec::smallvec![2, 0, 99, 6]).unwrap();
        let mut p = Recorder::new(16.0, 16.0);
        render_map(&mut p, &map, &reg, &AnimationLookup::new(), &options(), &RenderStyle::default());
        let names: Vec<_> = p
            .images()
            .into_iter()
            .map(|o| match o {
                Op::Image { name, src, .. } => (*name, src.map(|r| (r.x, r.y))),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec![("ground", Some((16.0, 0.0))), ("water", Some((16.0, 0.0)))]);
    }

    #[test]
    fn inactive_and_hidden_layers() {
        let reg = registry();
        let mut map = MapGrid::with_layers(1, 1, &["a", "b", "c"]);
        for layer in 0..3 {
            map.paint(layer, 0, 0, 1).unwrap();
        }
        map.set_active_layer(1).unwrap();
        map.set_layer_visible(2, false).unwrap();
        let mut p = Recorder::new(16.0, 16.0);
        render_map(&mut p, &map, &reg, &AnimationLookup::new(), &options(), &RenderStyle::default());
        let alphas: Vec<_> = p
            .images()
            .into_iter()
            .map(|o| match o {
                Op::Image { alpha, .. } => *alpha,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(alphas, vec![0.7, 1.0]);
        assert_eq!(p.alpha, 1.0);
    }

    #[test]
    fn animated_anchor_swaps_frames_over_time() {
        let reg = registry();
        let group = AnimationGroup::new("waves", 1, 100).with_entry(0, vec![0, 1, 2]);
        let lookup = compile_lookup(&[group], &reg);
        let mut map = MapGrid::with_layers(2, 1, &["ground"]);
        map.paint(0, 0, 0, 5).unwrap();
        map.paint(0, 1, 0, 6).unwrap();

        let frame_x = |t: u64, animate: bool| {
            let mut p = Recorder::new(32.0, 16.0);
            let opts = RenderOptions { timestamp_ms: t, show_animations: animate, ..options() };
            render_map(&mut p, &map, &reg, &lookup, &opts, &RenderStyle::default());
            p.images()
                .into_iter()
                .map(|o| match o {
                    Op::Image { src: Some(r), .. } => r.x,
                    _ => unreachable!(),
                })
                .collect::<Vec<_>>()
        };
        // anchor cycles, the plain gid 6 next to it never does
        assert_eq!(frame_x(0, true), vec![0.0, 16.0]);
        assert_eq!(frame_x(150, true), vec![16.0, 16.0]);
        assert_eq!(frame_x(250, true), vec![32.0, 16.0]);
        assert_eq!(frame_x(300, true), vec![0.0, 16.0]);
        assert_eq!(frame_x(250, false), vec![0.0, 16.0]);
    }

    #[test]
    fn walkability_is_a_conjunction_over_layers() {
        let mut reg = registry();
        reg.set_walkability(0, 3, false).unwrap();
        let mut map = MapGrid::with_layers(2, 1, &["a", "b"]);
        map.paint(0, 0, 0, 1).unwrap();
        map.paint(1, 0, 0, 4).unwrap();
        map.paint(0, 1, 0, 1).unwrap();
        map.paint(1, 1, 0, 500).unwrap();
        assert!(!is_walkable(&map, &reg, 0, 0));
        assert!(is_walkable(&map, &reg, 1, 0));

        let mut p = Recorder::new(32.0, 16.0);
        let opts = RenderOptions { show_walkability: true, ..options() };
        let style = RenderStyle::default();
        render_map(&mut p, &map, &reg, &AnimationLookup::new(), &opts, &style);
        let overlay: Vec<_> = p
            .ops
            .iter()
            .filter_map(|o| match o {
                Op::Fill(_, c) if *c == style.walkable || *c == style.blocked => Some(*c == style.walkable),
                _ => None,
            })
            .collect();
        assert_eq!(overlay, vec![false, true]);
    }

    #[test]
    fn grid_lines_bound_the_window() {
        let reg = registry();
        let map = MapGrid::with_layers(4, 3, &["a"]);
        let mut p = Recorder::new(1000.0, 1000.0);
        let opts = RenderOptions { show_grid: true, ..options() };
        render_map(&mut p, &map, &reg, &AnimationLookup::new(), &opts, &RenderStyle::default());
        let lines = p.ops.iter().filter(|o| matches!(o, Op::Line)).count();
        assert_eq!(lines, 5 + 4);
    }

    #[test]
    fn preview_tints_tiles_and_highlights_selection() {
        let mut reg = registry();
        reg.set_walkability(1, 2, false).unwrap();
        let style = RenderStyle::default();
        let mut p = Recorder::new(128.0, 32.0);
        let sel = TileSelection { start_col: 3, start_row: 0, end_col: 1, end_row: 0 };
        render_tileset_preview(&mut p, reg.get(1).unwrap(), 2.0, Some(&sel), true, &style);

        assert!(matches!(p.ops[0], Op::Image { name: "water", src: None, .. }));
        let blocked = p.ops.iter().filter(|o| matches!(o, Op::Fill(_, c) if *c == style.blocked)).count();
        assert_eq!(blocked, 1);
        assert!(p.ops.contains(&Op::Stroke(Rect::new(32.0, 0.0, 96.0, 32.0))));
    }
}
