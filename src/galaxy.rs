//! Procedural spiral-galaxy point clouds.
//!
//! Every particle lands on one of `branches` arms chosen by index, is pushed
//! around its arm by an angle proportional to its radius, and is then scattered
//! per axis by an offset biased toward zero by `randomness_power`.

use crate::color::Rgb;
use crate::error::{GalaxyError, Result};
use crate::random::UniformSource;
use std::f32::consts::TAU;
use std::time::Instant;

/// Parameters of one galaxy generation
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyParameters {
    /// Number of particles
    pub count: usize,
    /// Point size in world units
    pub size: f32,
    /// Outer radius of the disc
    pub radius: f32,
    /// Number of spiral arms
    pub branches: u32,
    /// Twist per unit of radius, in radians
    pub spin: f32,
    /// Scatter as a fraction of the particle's radius
    pub randomness: f32,
    /// Exponent biasing the scatter toward the arm
    pub randomness_power: f32,
    pub inside_color: Rgb,
    pub outside_color: Rgb,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        GalaxyParameters {
            count: 100_000,
            size: 0.01,
            radius: 16.07,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Rgb::rgb8(0xff, 0x60, 0x30),
            outside_color: Rgb::rgb8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParameters {
    /// The right-hand galaxy: same shape, different palette
    pub fn companion(&self) -> Self {
        GalaxyParameters {
            inside_color: Rgb::rgb8(0x30, 0xff, 0x60),
            outside_color: Rgb::rgb8(0x84, 0x1b, 0x39),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: &str) -> Result<()> {
            Err(GalaxyError::InvalidParameter {
                name,
                reason: reason.to_string(),
            })
        }

        if !(self.size.is_finite() && self.size > 0.0) {
            return invalid("size", "must be a positive number");
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return invalid("radius", "must be a positive number");
        }
        if self.branches == 0 {
            return invalid("branches", "must be at least 1");
        }
        if !self.spin.is_finite() {
            return invalid("spin", "must be finite");
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return invalid("randomness", "must be zero or greater");
        }
        if !(self.randomness_power.is_finite() && self.randomness_power >= 0.0) {
            return invalid("randomness_power", "must be zero or greater");
        }
        Ok(())
    }
}

/// Flat position and color buffers for one galaxy
///
/// Both buffers hold `3 * count` floats and share the `i3 = 3 * i` indexing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalaxyPointCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl GalaxyPointCloud {
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.positions[i3], self.positions[i3 + 1], self.positions[i3 + 2]]
    }

    pub fn color(&self, i: usize) -> Rgb {
        let i3 = i * 3;
        Rgb::new(self.colors[i3], self.colors[i3 + 1], self.colors[i3 + 2])
    }
}

/// Angle of the arm that particle `index` is assigned to
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Signed scatter along one axis
fn random_offset(params: &GalaxyParameters, radius: f32, rng: &mut impl UniformSource) -> f32 {
    let magnitude = rng.next_unit().powf(params.randomness_power);
    let sign = if rng.next_unit() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * params.randomness * radius
}

/// Generates one galaxy shifted by `x_offset` along the horizontal axis
pub fn generate_galaxy(
    params: &GalaxyParameters,
    x_offset: f32,
    rng: &mut impl UniformSource,
) -> GalaxyPointCloud {
    let started = Instant::now();
    let mut positions = vec![0.0f32; params.count * 3];
    let mut colors = vec![0.0f32; params.count * 3];

    for i in 0..params.count {
        let i3 = i * 3;

        let radius = rng.next_unit() * params.radius;
        let spin_angle = radius * params.spin;
        let branch_angle = branch_angle(i, params.branches);

        let random_x = random_offset(params, radius, rng);
        let random_y = random_offset(params, radius, rng);
        let random_z = random_offset(params, radius, rng);

        let angle = branch_angle + spin_angle;
        positions[i3] = angle.cos() * radius + random_x + x_offset;
        positions[i3 + 1] = random_y;
        positions[i3 + 2] = angle.sin() * radius + random_z;

        let mixed = params
            .inside_color
            .lerp(params.outside_color, radius / params.radius);
        colors[i3] = mixed.r;
        colors[i3 + 1] = mixed.g;
        colors[i3 + 2] = mixed.b;
    }

    tracing::debug!(
        target: "galaxy",
        count = params.count,
        x_offset,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "generated galaxy"
    );

    GalaxyPointCloud { positions, colors }
}
