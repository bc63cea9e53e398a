use crate::color::Rgb;
use crate::scene::Blending;
use crate::vertex::Vertex;

/// Linear RGB accumulation buffer
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgb>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::BLACK; width * height];
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Tone-maps one pixel into `[0, 1]`
    pub fn resolved(&self, x: usize, y: usize) -> Rgb {
        let p = self.pixel(x, y);
        let map = |c: f32| 1.0 - (-c.max(0.0)).exp();
        Rgb::new(map(p.r), map(p.g), map(p.b))
    }

    fn blend(&mut self, x: isize, y: isize, color: Rgb, blending: Blending) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let pixel = &mut self.pixels[y as usize * self.width + x as usize];
        *pixel = match blending {
            Blending::Additive => Rgb::new(pixel.r + color.r, pixel.g + color.g, pixel.b + color.b),
            Blending::Normal => color,
        };
    }
}

/// Largest splat half-width in pixels
pub const MAX_SPLAT_REACH: isize = 3;

/// Splats a point as a square of `radius` pixels around its screen position
///
/// The half-width is capped at [`MAX_SPLAT_REACH`] so oversized points cost
/// at most a fixed number of pixel writes.
pub fn draw_point(
    vertex: &Vertex,
    radius: f32,
    intensity: f32,
    blending: Blending,
    framebuffer: &mut Framebuffer,
) {
    let color = Rgb::new(
        vertex.color.r * intensity,
        vertex.color.g * intensity,
        vertex.color.b * intensity,
    );
    let cx = vertex.screen_position[0].floor() as isize;
    let cy = vertex.screen_position[1].floor() as isize;
    let reach = (radius.floor().max(0.0) as isize).min(MAX_SPLAT_REACH);

    for y in cy - reach..=cy + reach {
        for x in cx - reach..=cx + reach {
            framebuffer.blend(x, y, color, blending);
        }
    }
}

/// Draws a line between two points in the framebuffer using Bresenham's algorithm
pub fn draw_line(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    framebuffer: &mut Framebuffer,
    color: Rgb,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        framebuffer.blend(x0, y0, color, Blending::Normal);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
