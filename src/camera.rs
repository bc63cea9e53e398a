use crate::math::{cross, dot, normalize, sub};

pub const DEFAULT_POSITION: [f32; 3] = [0.0, 3.0, 30.0];

/// Perspective camera looking at a target point
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    target: [f32; 3],
    /// Rows are right, up and forward in world space
    basis: [[f32; 3]; 3],
    tan_half_fov: f32,
}

/// A world point after projection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Normalized device coordinates, `[-1, 1]` on screen
    pub ndc: [f32; 2],
    /// Distance along the view direction
    pub depth: f32,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = PerspectiveCamera {
            fov,
            aspect,
            near,
            far,
            position: DEFAULT_POSITION,
            target: [0.0, 0.0, 0.0],
            basis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
            tan_half_fov: 1.0,
        };
        camera.update_projection_matrix();
        camera.look_at([0.0, 0.0, 0.0]);
        camera
    }

    /// Recomputes the projection after `fov` or `aspect` changed
    pub fn update_projection_matrix(&mut self) {
        self.tan_half_fov = (self.fov.to_radians() / 2.0).tan();
    }

    /// Orients the camera toward `target`, keeping +Y up
    pub fn look_at(&mut self, target: [f32; 3]) {
        self.target = target;
        let forward = normalize(&sub(&target, &self.position));
        let mut right = normalize(&cross(&forward, &[0.0, 1.0, 0.0]));
        if right == [0.0, 0.0, 0.0] {
            // Looking straight up or down
            right = [1.0, 0.0, 0.0];
        }
        let up = cross(&right, &forward);
        self.basis = [right, up, forward];
    }

    pub fn target(&self) -> [f32; 3] {
        self.target
    }

    /// World to view space: `[right, up, forward]` components
    pub fn to_view(&self, world: &[f32; 3]) -> [f32; 3] {
        let relative = sub(world, &self.position);
        [
            dot(&relative, &self.basis[0]),
            dot(&relative, &self.basis[1]),
            dot(&relative, &self.basis[2]),
        ]
    }

    /// Projects a world point, or `None` when it falls outside the frustum depth range
    pub fn project(&self, world: &[f32; 3]) -> Option<Projected> {
        let [x, y, depth] = self.to_view(world);
        if depth < self.near || depth > self.far {
            return None;
        }
        let half_height = depth * self.tan_half_fov;
        Some(Projected {
            ndc: [x / (half_height * self.aspect), y / half_height],
            depth,
        })
    }

    /// Pixels per world unit at `depth` for a viewport `height` pixels tall
    pub fn pixel_scale(&self, depth: f32, height: f32) -> f32 {
        height / 2.0 / (depth * self.tan_half_fov)
    }
}
