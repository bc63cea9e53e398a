use crate::color::Rgb;

/// Horizontal advance of one glyph as a fraction of the font size
pub const GLYPH_ADVANCE: f32 = 0.6;

/// World units per texture pixel on the label quad
pub const PIXELS_PER_UNIT: f32 = 100.0;

/// Text baked once into a fixed-size canvas
#[derive(Clone, Debug, PartialEq)]
pub struct TextTexture {
    pub text: String,
    pub font_size: f32,
    pub width: u32,
    pub height: u32,
    /// Left edge of the text run inside the canvas
    pub text_x: f32,
    /// Baseline of the text run inside the canvas
    pub baseline_y: f32,
    pub fill: Rgb,
    /// Set until the renderer has consumed the texture
    pub needs_update: bool,
}

/// Textured flat quad placed in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub texture: TextTexture,
    /// Quad width and height in world units
    pub plane: [f32; 2],
    pub position: [f32; 3],
    pub transparent: bool,
}

impl Label {
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }
}

/// Measures a monospace text run in pixels
pub fn measure_text(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_ADVANCE
}

/// Rasterizes `text` and maps it onto a quad sized to fit
///
/// `width_factor` pads the measured width so antialiased edges are not
/// clipped; the canvas height is `font_size * 1.4`.
pub fn create_text_label(text: &str, font_size: f32, width_factor: f32) -> Label {
    let text_width = measure_text(text, font_size) * width_factor;
    let width = text_width.ceil() as u32;
    let height = (font_size * 1.4).ceil() as u32;

    let texture = TextTexture {
        text: text.to_string(),
        font_size,
        width,
        height,
        text_x: width as f32 / 2.0 - text_width / 2.0,
        baseline_y: height as f32 / 2.0 + font_size / 4.0,
        fill: Rgb::WHITE,
        needs_update: true,
    };

    Label {
        plane: [
            width as f32 / PIXELS_PER_UNIT,
            height as f32 / PIXELS_PER_UNIT,
        ],
        texture,
        position: [0.0, 0.0, 0.0],
        transparent: true,
    }
}
