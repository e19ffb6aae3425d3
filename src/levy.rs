//! # Lévy flight module
//!
//! Rare heavy-tailed perturbations of velocity components. A Lévy flight occasionally
//! scales a step by a draw from the standard Lévy distribution, producing the long
//! jumps that help a swarm escape local minima.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

/// Probability that any single perturbation call fires
const FLIGHT_PROBABILITY: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optional heavy-tailed velocity perturbation
///
/// When enabled, each `perturb` call scales its input by a standard Lévy sample with
/// probability 0.02 and passes it through unchanged otherwise. A disabled instance is
/// a no-op and consumes no randomness.
pub struct LevyFlight {
    enabled: bool,
}

impl LevyFlight {
    /// Creates an enabled or disabled perturbation.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns true if perturbations can fire.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Applies the perturbation to a velocity component.
    pub fn perturb(&self, v: f64, rng: &mut StdRng) -> f64 {
        if self.enabled && rng.random::<f64>() > 1.0 - FLIGHT_PROBABILITY {
            v * levy_sample(rng)
        } else {
            v
        }
    }
}

/// Standard Lévy draw, obtained as the inverse square of a unit normal
///
/// Zero normals are redrawn so the sample stays finite.
fn levy_sample(rng: &mut StdRng) -> f64 {
    let mut z: f64 = rng.sample(StandardNormal);
    while z == 0.0 {
        z = rng.sample(StandardNormal);
    }
    1.0 / (z * z)
}

#[cfg(test)]
mod test_levy {
    use super::*;
    use rand::SeedableRng;

    #[test]
    /// Test that a disabled flight is an identity that consumes no randomness
    fn test_disabled_is_identity() {
        let flight = LevyFlight::new(false);
        let mut rng = StdRng::seed_from_u64(7);
        let mut untouched = StdRng::seed_from_u64(7);
        for i in 0..100 {
            let v = i as f64 * 0.1 - 5.0;
            assert_eq!(flight.perturb(v, &mut rng), v);
        }
        // generator state never advanced
        assert_eq!(rng.random::<u64>(), untouched.random::<u64>());
    }

    #[test]
    /// Test that an enabled flight fires rarely and passes through otherwise
    fn test_enabled_fires_rarely() {
        let flight = LevyFlight::new(true);
        assert!(flight.is_enabled());
        let mut rng = StdRng::seed_from_u64(11);
        let mut fired = 0;
        let trials = 10_000;
        for _ in 0..trials {
            if flight.perturb(1.0, &mut rng) != 1.0 {
                fired += 1;
            }
        }
        assert!(fired > 0, "no perturbation fired in {trials} trials");
        assert!(
            fired < trials / 10,
            "perturbation fired {fired} times in {trials} trials"
        );
    }

    #[test]
    /// Test that Lévy samples are strictly positive
    fn test_levy_sample_positive() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let sample = levy_sample(&mut rng);
            assert!(sample > 0.0);
        }
    }

    #[test]
    /// Test that perturbing zero velocity leaves it at zero
    fn test_perturb_zero_velocity() {
        let flight = LevyFlight::new(true);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert_eq!(flight.perturb(0.0, &mut rng), 0.0);
        }
    }
}
