use crate::camera::PerspectiveCamera;
use crate::math::{add, length, sub};
use std::f32::consts::PI;

const MIN_POLAR: f32 = 1e-4;

/// Orbits the camera around a target with damped motion
///
/// Input accumulates into pending deltas; `update` applies a fraction of
/// them every frame and decays the rest, so motion eases out.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        OrbitControls {
            target: [0.0, 0.0, 0.0],
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 1.0,
            max_distance: 90.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }
}

impl OrbitControls {
    /// Rotates around the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    /// Rotates toward the pole
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_phi -= angle;
    }

    /// Scales the orbit radius; values below 1 move closer
    pub fn dolly(&mut self, scale: f32) {
        self.pending_scale *= scale;
    }

    /// Applies pending motion to the camera
    ///
    /// The spherical coordinates are read back from the camera first, so
    /// moves made elsewhere since the last frame are kept.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = sub(&camera.position, &self.target);
        let mut radius = length(&offset);
        let mut theta = offset[0].atan2(offset[2]);
        let mut phi = if radius > 0.0 {
            (offset[1] / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.pending_theta * step;
        phi = (phi + self.pending_phi * step).clamp(MIN_POLAR, PI - MIN_POLAR);
        radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let offset_after = [
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        ];
        let previous = camera.position;
        camera.position = add(&self.target, &offset_after);
        camera.look_at(self.target);

        if self.enable_damping {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.pending_scale = 1.0;

        length(&sub(&previous, &camera.position)) > 1e-4
    }
}
