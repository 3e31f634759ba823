// 🎲 Noise Source - multiplicative Normal(1, σ) factors
// One source per run so that a seed reproduces the whole table

use crate::config::NoiseModel;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

pub struct NoiseSource {
    /// `None` when noise is disabled
    rng: Option<StdRng>,
}

impl NoiseSource {
    pub fn new(model: NoiseModel) -> Self {
        let rng = match model {
            NoiseModel::Gaussian { seed: Some(seed) } => Some(StdRng::seed_from_u64(seed)),
            NoiseModel::Gaussian { seed: None } => Some(StdRng::from_os_rng()),
            NoiseModel::Disabled => None,
        };
        NoiseSource { rng }
    }

    /// Source that always returns 1.0
    pub fn disabled() -> Self {
        NoiseSource { rng: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.rng.is_some()
    }

    /// Draw one multiplicative factor from Normal(1, sigma)
    ///
    /// No floor is applied here: a large sigma can yield a negative factor.
    pub fn factor(&mut self, sigma: f64) -> f64 {
        let Some(rng) = self.rng.as_mut() else {
            return 1.0;
        };

        match Normal::new(1.0, sigma) {
            Ok(normal) => normal.sample(rng),
            Err(e) => {
                warn!("invalid noise sigma {}: {}", sigma, e);
                1.0
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_exactly_one() {
        let mut noise = NoiseSource::new(NoiseModel::Disabled);

        assert!(!noise.is_enabled());
        for sigma in [0.05, 0.12, 0.20] {
            assert_eq!(noise.factor(sigma), 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = NoiseSource::new(NoiseModel::seeded(42));
        let mut b = NoiseSource::new(NoiseModel::seeded(42));

        for _ in 0..50 {
            assert_eq!(a.factor(0.1), b.factor(0.1));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = NoiseSource::new(NoiseModel::seeded(1));
        let mut b = NoiseSource::new(NoiseModel::seeded(2));

        let draws_a: Vec<f64> = (0..10).map(|_| a.factor(0.1)).collect();
        let draws_b: Vec<f64> = (0..10).map(|_| b.factor(0.1)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_mean_close_to_one() {
        let mut noise = NoiseSource::new(NoiseModel::seeded(2025));

        let n = 20_000;
        let mean: f64 = (0..n).map(|_| noise.factor(0.1)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.01, "mean was {}", mean);
    }

    #[test]
    fn test_invalid_sigma_falls_back_to_one() {
        let mut noise = NoiseSource::new(NoiseModel::seeded(3));
        assert_eq!(noise.factor(-1.0), 1.0);
    }
}
