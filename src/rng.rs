use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};

/// The single seedable source of randomness threaded through the whole
/// façade: every `zeta` draw, every online-bagging `Poisson(w)` draw and
/// every re-seed draw goes through here so that a fixed seed reproduces an
/// identical trace (`SPEC_FULL.md` §5, §8 "Determinism").
pub struct CalmidRng {
    rng: StdRng,
}

impl CalmidRng {
    pub fn new(seed: u64) -> Self {
        CalmidRng {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Poisson draw with rate `lambda`. A non-positive rate always yields 0
    /// (there is nothing to sample); `Poisson::new` only accepts `lambda > 0`.
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }
        let dist = Poisson::new(lambda).expect("lambda > 0 checked above");
        dist.sample(&mut self.rng).round() as u64
    }
}
