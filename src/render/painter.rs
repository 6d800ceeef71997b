use macroquad::prelude::*;

/// Minimal 2-D drawing surface the renderers draw onto.
///
/// `set_alpha` is a global opacity applied to subsequent image draws only;
/// overlay fills carry their own alpha in the colour.
pub trait Painter {
    /// Image handle accepted by `draw_image`.
    type Image;

    /// Canvas size in pixels.
    fn canvas_size(&self) -> Vec2;
    /// Wipe the canvas.
    fn clear(&mut self, color: Color);
    /// Solid rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    /// Straight line.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);
    /// Opacity for subsequent image draws.
    fn set_alpha(&mut self, alpha: f32);
    /// Draw `source` of `image` (the whole image when `None`) stretched to `dest`.
    fn draw_image(&mut self, image: &Self::Image, source: Option<Rect>, dest: Rect);
}

/// Draws straight to the current macroquad render target.
#[derive(Debug, Clone, Copy)]
pub struct MacroquadPainter {
    size: Option<Vec2>,
    alpha: f32,
}

impl Default for MacroquadPainter {
    fn default() -> Self {
        MacroquadPainter {
            size: None,
            alpha: 1.0,
        }
    }
}

impl MacroquadPainter {
    /// Paint the whole window.
    pub fn screen() -> Self {
        Self::default()
    }

    /// Paint an off-screen target of a fixed size (e.g. a tileset preview).
    pub fn sized(width: f32, height: f32) -> Self {
        MacroquadPainter {
            size: Some(vec2(width, height)),
            alpha: 1.0,
        }
    }
}

impl Painter for MacroquadPainter {
    type Image = Texture2D;

    fn canvas_size(&self) -> Vec2 {
        self.size
            .unwrap_or_else(|| vec2(screen_width(), screen_height()))
    }

    fn clear(&mut self, color: Color) {
        clear_background(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn draw_image(&mut self, image: &Texture2D, source: Option<Rect>, dest: Rect) {
        draw_texture_ex(
            image,
            dest.x,
            dest.y,
            Color::new(1.0, 1.0, 1.0, self.alpha),
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source,
                ..Default::default()
            },
        );
    }
}
