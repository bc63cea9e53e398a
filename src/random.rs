use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`
///
/// Generation and jitter draw through this seam so tests can pin the
/// sequence without a live RNG.
pub trait UniformSource {
    fn next_unit(&mut self) -> f32;
}

/// Adapts any `rand` generator
pub struct RngSource<R>(pub R);

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> f32 {
        self.0.gen::<f32>()
    }
}

impl RngSource<StdRng> {
    /// Seeded when `seed` is given, entropy-seeded otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngSource(StdRng::seed_from_u64(seed)),
            None => RngSource(StdRng::from_entropy()),
        }
    }
}

/// Returns the same sample forever
#[derive(Clone, Copy, Debug)]
pub struct ConstantSource(pub f32);

impl UniformSource for ConstantSource {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}
