//! Per-frame collision sequence.
//!
//! The phase is not stored: it is recomputed every frame from the distance
//! between the two galaxy anchors.

use crate::math::{distance, lerp_vec};
use crate::random::UniformSource;
use crate::scene::Points;
use crate::state::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Approaching,
    Colliding,
}

/// Tunables for the collision sequence
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionAnimator {
    /// Anchor distance below which the galaxies collide
    pub collision_distance: f32,
    /// Rotation about Y per frame, in radians
    pub rotation_step: f32,
    /// Fraction of the remaining distance to the origin covered per frame
    pub drift_factor: f32,
    /// Half-width of the per-axis jitter
    pub jitter: f32,
    pub camera_target: [f32; 3],
    /// The camera only eases in while it is farther out than this on Z
    pub camera_stop_z: f32,
    pub camera_factor: f32,
}

impl Default for CollisionAnimator {
    fn default() -> Self {
        CollisionAnimator {
            collision_distance: 10.0,
            rotation_step: 0.005,
            drift_factor: 0.01,
            jitter: 0.05,
            camera_target: [0.0, 3.0, 20.0],
            camera_stop_z: 20.0,
            camera_factor: 0.01,
        }
    }
}

impl CollisionAnimator {
    pub fn phase(&self, left: &Points, right: &Points) -> Phase {
        if distance(&left.anchor, &right.anchor) < self.collision_distance {
            Phase::Colliding
        } else {
            Phase::Approaching
        }
    }

    /// Advances the sequence by one frame
    pub fn advance(&self, state: &mut AppState, rng: &mut impl UniformSource) -> Option<Phase> {
        let (left_id, right_id) = state.composer.galaxies()?;
        let (left, right) = state.scene.points_pair_mut(left_id, right_id)?;

        let phase = self.phase(left, right);
        match phase {
            Phase::Approaching => {
                left.transform.rotation[1] += self.rotation_step;
                right.transform.rotation[1] += self.rotation_step;
            }
            Phase::Colliding => {
                left.transform.rotation[1] += self.rotation_step;
                right.transform.rotation[1] -= self.rotation_step;

                for points in [&mut *left, &mut *right] {
                    let origin = points.transform.to_local(&[0.0, 0.0, 0.0]);
                    drift_toward(&mut points.geometry.cloud.positions, &origin, self.drift_factor);
                }
                for points in [&mut *left, &mut *right] {
                    apply_jitter(&mut points.geometry.cloud.positions, self.jitter, rng);
                    points.geometry.needs_update = true;
                }
            }
        }

        if phase == Phase::Colliding && state.camera.position[2] > self.camera_stop_z {
            state.camera.position = lerp_vec(&state.camera.position, &self.camera_target, self.camera_factor);
        }

        if state.last_phase != Some(phase) {
            tracing::info!(target: "animator", ?phase, "phase entered");
            state.last_phase = Some(phase);
        }
        Some(phase)
    }
}

/// Pulls every particle `factor` of the way toward `target`
///
/// `target` is in the same space as `positions`; pass the world origin mapped
/// into the cloud's local frame.
pub fn drift_toward(positions: &mut [f32], target: &[f32; 3], factor: f32) {
    for p in positions.chunks_exact_mut(3) {
        let moved = lerp_vec(&[p[0], p[1], p[2]], target, factor);
        p.copy_from_slice(&moved);
    }
}

/// Offsets every coordinate by a uniform sample in `[-amount, amount)`
pub fn apply_jitter(positions: &mut [f32], amount: f32, rng: &mut impl UniformSource) {
    for value in positions.iter_mut() {
        *value += rng.next_unit() * amount * 2.0 - amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::GalaxyParameters;
    use crate::math::{length, scale};
    use crate::random::{ConstantSource, RngSource};
    use crate::scene::GALAXY_OFFSET;
    use crate::viewport::Viewport;

    fn empty_state(count: usize) -> AppState {
        let primary = GalaxyParameters {
            count,
            ..GalaxyParameters::default()
        };
        let companion = primary.companion();
        AppState::new(primary, companion, Viewport::new(80, 24, 2))
    }

    fn state() -> AppState {
        let mut state = empty_state(64);
        state.create_galaxies(&mut RngSource::new(Some(11)));
        state
    }

    fn positions(state: &AppState) -> (Vec<f32>, Vec<f32>) {
        let (l, r) = state.composer.galaxies().unwrap();
        (
            state.scene.points(l).unwrap().geometry.cloud.positions.clone(),
            state.scene.points(r).unwrap().geometry.cloud.positions.clone(),
        )
    }

    /// Slides both galaxies so their anchors sit at -x and +x
    fn move_anchors(state: &mut AppState, x: f32) {
        let (l, r) = state.composer.galaxies().unwrap();
        let shift = GALAXY_OFFSET - x;
        state.scene.points_mut(l).unwrap().translate(&[shift, 0.0, 0.0]);
        state.scene.points_mut(r).unwrap().translate(&[-shift, 0.0, 0.0]);
        assert_eq!(state.scene.points(l).unwrap().anchor, [-x, 0.0, 0.0]);
    }

    #[test]
    fn approaching_only_spins() {
        let mut state = state();
        let animator = CollisionAnimator::default();
        let before = positions(&state);
        let camera = state.camera.position;
        let (l, r) = state.composer.galaxies().unwrap();
        let right_before = state.scene.points(r).unwrap().transform.rotation[1];

        let phase = animator.advance(&mut state, &mut RngSource::new(Some(1)));

        assert_eq!(phase, Some(Phase::Approaching));
        assert_eq!(positions(&state), before);
        assert_eq!(state.camera.position, camera);
        assert!((state.scene.points(l).unwrap().transform.rotation[1] - 0.005).abs() < 1e-7);
        assert!(
            (state.scene.points(r).unwrap().transform.rotation[1] - right_before - 0.005).abs() < 1e-6
        );
    }

    #[test]
    fn default_layout_never_collides() {
        let mut state = state();
        let animator = CollisionAnimator::default();
        let mut rng = RngSource::new(Some(2));
        for _ in 0..500 {
            assert_eq!(animator.advance(&mut state, &mut rng), Some(Phase::Approaching));
        }
    }

    #[test]
    fn colliding_counter_rotates_and_marks_dirty() {
        let mut state = state();
        move_anchors(&mut state, 4.0);
        let (l, r) = state.composer.galaxies().unwrap();
        for id in [l, r] {
            state.scene.points_mut(id).unwrap().geometry.needs_update = false;
        }
        let right_before = state.scene.points(r).unwrap().transform.rotation[1];

        let phase = CollisionAnimator::default().advance(&mut state, &mut RngSource::new(Some(3)));

        assert_eq!(phase, Some(Phase::Colliding));
        let left = state.scene.points(l).unwrap();
        let right = state.scene.points(r).unwrap();
        assert!((left.transform.rotation[1] - 0.005).abs() < 1e-7);
        assert!((right.transform.rotation[1] - (right_before - 0.005)).abs() < 1e-6);
        assert!(left.geometry.needs_update && right.geometry.needs_update);
    }

    #[test]
    fn colliding_pulls_every_particle_inward() {
        let mut state = state();
        move_anchors(&mut state, 2.0);
        let (left_before, right_before) = positions(&state);

        // A centered sample makes the jitter exactly zero
        CollisionAnimator::default().advance(&mut state, &mut ConstantSource(0.5));

        let (left_after, right_after) = positions(&state);
        for (before, after) in [(left_before, left_after), (right_before, right_after)] {
            for (a, b) in before.chunks(3).zip(after.chunks(3)) {
                let (a, b) = ([a[0], a[1], a[2]], [b[0], b[1], b[2]]);
                assert!(length(&b) < length(&a) || length(&a) == 0.0);
            }
        }
    }

    #[test]
    fn camera_eases_in_only_while_colliding_and_far() {
        let mut state = state();
        let animator = CollisionAnimator::default();
        move_anchors(&mut state, 1.0);
        let mut rng = RngSource::new(Some(4));

        animator.advance(&mut state, &mut rng);
        assert!((state.camera.position[2] - 29.9).abs() < 1e-4);
        assert!((state.camera.position[1] - 3.0).abs() < 1e-5);

        state.camera.position = [0.0, 3.0, 19.5];
        animator.advance(&mut state, &mut rng);
        assert_eq!(state.camera.position, [0.0, 3.0, 19.5]);
    }

    #[test]
    fn drift_strictly_shrinks_distance_from_origin() {
        let state = state();
        let (before, _) = positions(&state);
        let mut after = before.clone();
        drift_toward(&mut after, &[0.0; 3], 0.01);
        for (a, b) in before.chunks(3).zip(after.chunks(3)) {
            let (a, b) = ([a[0], a[1], a[2]], [b[0], b[1], b[2]]);
            if length(&a) > 0.0 {
                assert!(length(&b) < length(&a));
            }
        }
        // the state itself is untouched by the helper
        assert_eq!(positions(&state).0, before);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut values = vec![1.0f32; 3 * 1_000];
        apply_jitter(&mut values, 0.05, &mut RngSource::new(Some(5)));
        assert!(values.iter().all(|v| (v - 1.0).abs() <= 0.05 + 1e-6));
        assert!(values.iter().any(|v| *v != 1.0));
    }

    #[test]
    fn missing_galaxies_are_a_no_op() {
        let mut state = empty_state(8);
        assert_eq!(CollisionAnimator::default().advance(&mut state, &mut RngSource::new(Some(6))), None);
    }

    #[test]
    fn drift_targets_the_world_origin_for_any_transform() {
        let mut state = state();
        move_anchors(&mut state, 2.0);
        let (l, r) = state.composer.galaxies().unwrap();
        for id in [l, r] {
            let transform = &mut state.scene.points_mut(id).unwrap().transform;
            transform.position = [6.0, -2.0, 1.5];
            transform.rotation[2] += 0.4;
        }
        let locals = positions(&state);

        CollisionAnimator::default().advance(&mut state, &mut ConstantSource(0.5));

        let (left_after, right_after) = positions(&state);
        for (id, before, after) in [(l, locals.0, left_after), (r, locals.1, right_after)] {
            let transform = state.scene.points(id).unwrap().transform;
            for (a, b) in before.chunks(3).zip(after.chunks(3)) {
                let expected = scale(&transform.to_world(&[a[0], a[1], a[2]]), 0.99);
                let actual = transform.to_world(&[b[0], b[1], b[2]]);
                assert!(distance(&actual, &expected) < 1e-3, "{actual:?} != {expected:?}");
            }
        }
    }
}
