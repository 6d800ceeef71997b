use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;
use tilemap_editor_core::{
    EditorConfig, EditorSession, MacroquadImages, MacroquadPainter, RenderOptions, TileSelection,
    Viewport,
};

#[derive(Clone, Copy, PartialEq)]
enum Tool {
    Brush,
    Eraser,
    Fill,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Tilemap Editor".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        log::error!("{e:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(&path).with_context(|| format!("reading {path}"))?,
        None => EditorConfig::default(),
    };
    let mut session: EditorSession = EditorSession::new(config, 40, 30);

    session
        .load_tilesets(&mut MacroquadImages, Path::new("assets"), |done, total, name| {
            clear_background(BLACK);
            draw_text(&format!("loading {name} ({done}/{total})"), 20.0, 40.0, 30.0, WHITE);
        })
        .await
        .context("loading tilesets")?;
    session.selection = Some(TileSelection::single(0, 0));

    let mut options = RenderOptions {
        viewport: Viewport::new(20.0, 20.0, 2.0),
        ..Default::default()
    };
    let mut tool = Tool::Brush;
    let start = get_time();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            return Ok(());
        }
        if is_key_pressed(KeyCode::B) {
            tool = Tool::Brush;
        }
        if is_key_pressed(KeyCode::E) {
            tool = Tool::Eraser;
        }
        if is_key_pressed(KeyCode::F) {
            tool = Tool::Fill;
        }
        if is_key_pressed(KeyCode::G) {
            options.show_grid = !options.show_grid;
        }
        if is_key_pressed(KeyCode::W) {
            options.show_walkability = !options.show_walkability;
        }
        if is_key_pressed(KeyCode::Tab) {
            let next = (session.active_tileset + 1) % session.tilesets().len().max(1);
            session.set_active_tileset(next);
            session.selection = Some(TileSelection::single(0, 0));
        }
        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
        if ctrl && is_key_pressed(KeyCode::Z) {
            session.undo()?;
        }
        if ctrl && is_key_pressed(KeyCode::Y) {
            session.redo()?;
        }
        for (i, key) in [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4, KeyCode::Key5, KeyCode::Key6]
            .into_iter()
            .enumerate()
        {
            if is_key_pressed(key) {
                session.map_mut().set_active_layer(i)?;
            }
        }

        let pan = 300.0 * get_frame_time();
        if is_key_down(KeyCode::Left) {
            options.viewport.offset.x += pan;
        }
        if is_key_down(KeyCode::Right) {
            options.viewport.offset.x -= pan;
        }
        if is_key_down(KeyCode::Up) {
            options.viewport.offset.y += pan;
        }
        if is_key_down(KeyCode::Down) {
            options.viewport.offset.y -= pan;
        }
        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            let zoom = options.viewport.zoom * if wheel > 0.0 { 1.25 } else { 0.8 };
            options.viewport.zoom = zoom.clamp(0.25, 8.0);
        }

        if is_mouse_button_down(MouseButton::Left) {
            let (mx, my) = mouse_position();
            let tile_size = session.config().tile_size;
            if let Some((x, y)) = options.viewport.screen_to_tile(vec2(mx, my), tile_size) {
                let (w, h) = (session.map().width() as i64, session.map().height() as i64);
                if (0..w).contains(&x) && (0..h).contains(&y) {
                    let (x, y) = (x as u32, y as u32);
                    match tool {
                        Tool::Brush => {
                            session.paint(x, y)?;
                        }
                        Tool::Eraser => {
                            session.erase(x, y)?;
                        }
                        Tool::Fill if is_mouse_button_pressed(MouseButton::Left) => {
                            let gid = session.selected_gids().first().copied().unwrap_or(0);
                            session.fill(x, y, gid)?;
                        }
                        Tool::Fill => {}
                    }
                }
            }
        }

        options.timestamp_ms = ((get_time() - start) * 1000.0) as u64;
        session.render(&mut MacroquadPainter::screen(), &options);

        draw_text(
            &format!(
                "layer {}  undo {}  FPS {}",
                session.map().active_layer() + 1,
                session.history().undo_len(),
                get_fps()
            ),
            20.0,
            screen_height() - 20.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
}
