use crate::color::Rgb;

/// Particle after transform and projection
pub struct Vertex {
    pub screen_position: [f32; 2],
    pub color: Rgb,
}
