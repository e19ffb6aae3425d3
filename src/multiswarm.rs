//! # Multi-swarm base module
//!
//! Shared machinery for the tournament solvers: a population partitioned round-robin into
//! near-equal swarms, per-swarm order shuffling for random pairings, a full-population
//! global-best scan, and a checked split-borrow accessor for updating two particles at once.
//! The per-generation tournament mechanics live in the variants (`cso`, `lcso`).

use crate::core::SolverCore;
use crate::problem::Problem;
use crate::types::SolverError;
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::Rng;

/// Particle address as `(swarm index, index within the swarm)`
pub(crate) type Loc = (usize, usize);

#[derive(Debug, Clone)]
pub(crate) struct Particle {
    pub(crate) x: Array1<f64>,
    pub(crate) v: Array1<f64>,
}

#[derive(Debug, Clone)]
/// Population split into swarms, embedded by the tournament solvers
///
/// Swarm `k` receives population indices `k, k + K, k + 2K, …`, so sizes differ by at
/// most one. Particles are owned by exactly one swarm; tournament updates mutate them
/// in place through [`pair_mut`] or indexed access, never through shared references.
pub(crate) struct MultiSwarm<P: Problem> {
    pub(crate) core: SolverCore<P>,
    pub(crate) swarms: Vec<Vec<Particle>>,
    swarm_count: usize,
    /// Half-width of the initial velocity range, as a fraction of the domain width
    velocity_magnitude: f64,
}

impl<P: Problem> MultiSwarm<P> {
    pub(crate) fn new(
        problem: P,
        population: usize,
        dimension: usize,
        swarm_count: usize,
        velocity_magnitude: f64,
        seed: u64,
    ) -> Result<Self, SolverError> {
        let core = SolverCore::new(problem, population, dimension, seed)?;
        let mut base = Self {
            core,
            swarms: Vec::new(),
            swarm_count,
            velocity_magnitude,
        };
        base.reset();
        Ok(base)
    }

    /// Re-randomizes the partitioned population and clears the run state.
    pub(crate) fn reset(&mut self) {
        self.core.clear_run();
        let dimension = self.core.dimension();
        let (lo, hi) = self.core.domain();
        let v_half = ((hi - lo) * self.velocity_magnitude).abs();

        self.swarms = (0..self.swarm_count)
            .map(|swarm| {
                (swarm..self.core.population())
                    .step_by(self.swarm_count)
                    .map(|_| {
                        let x = self.core.random_position();
                        let rng = &mut self.core.rng;
                        let v = Array1::from_shape_fn(dimension, |_| {
                            rng.random_range(-v_half..=v_half)
                        });
                        Particle { x, v }
                    })
                    .collect()
            })
            .collect();
        self.core.best_position.assign(&self.swarms[0][0].x);
    }

    /// Independently permutes each swarm's particle order, not its positions.
    pub(crate) fn shuffle(&mut self) {
        for swarm in &mut self.swarms {
            swarm.shuffle(&mut self.core.rng);
        }
    }

    /// Re-evaluates the whole population and records the minimum as global best.
    ///
    /// Positions move during a step, so no cached value is trusted here. The global
    /// best is overwritten only on strict improvement, keeping the recorded best
    /// monotone; on exact ties the first particle in flattened order stands.
    pub(crate) fn select_best(&mut self) -> Result<f64, SolverError> {
        let mut best_value = f64::INFINITY;
        let mut best: Option<Loc> = None;
        for (s, swarm) in self.swarms.iter().enumerate() {
            for (p, particle) in swarm.iter().enumerate() {
                let value = self.core.problem.objective(&particle.x)?;
                if value < best_value {
                    best_value = value;
                    best = Some((s, p));
                }
            }
        }
        if let Some((s, p)) = best {
            let position = self.swarms[s][p].x.clone();
            self.core.update_best(best_value, &position);
        }
        Ok(self.core.best_value)
    }

    pub(crate) fn particle(&self, loc: Loc) -> &Particle {
        &self.swarms[loc.0][loc.1]
    }

    /// Objective value at a particle's current position.
    pub(crate) fn value_at(&self, loc: Loc) -> Result<f64, SolverError> {
        Ok(self.core.problem.objective(&self.swarms[loc.0][loc.1].x)?)
    }

    /// Per-dimension average position over the particles at `locs`.
    pub(crate) fn average_position(&self, locs: &[Loc]) -> Array1<f64> {
        let mut avg = Array1::zeros(self.core.dimension());
        for loc in locs {
            avg += &self.particle(*loc).x;
        }
        avg / locs.len() as f64
    }

    /// Per-dimension average position over one whole swarm.
    pub(crate) fn swarm_average(&self, swarm: usize) -> Array1<f64> {
        let mut avg = Array1::zeros(self.core.dimension());
        for particle in &self.swarms[swarm] {
            avg += &particle.x;
        }
        avg / self.swarms[swarm].len() as f64
    }
}

/// Two simultaneous mutable references into the swarm partition
///
/// Panics if `a == b`; the tournaments only ever pair distinct particles.
pub(crate) fn pair_mut(
    swarms: &mut [Vec<Particle>],
    a: Loc,
    b: Loc,
) -> (&mut Particle, &mut Particle) {
    assert_ne!(a, b, "a tournament pair must be two distinct particles");
    if a.0 == b.0 {
        let swarm = &mut swarms[a.0];
        if a.1 < b.1 {
            let (left, right) = swarm.split_at_mut(b.1);
            (&mut left[a.1], &mut right[0])
        } else {
            let (left, right) = swarm.split_at_mut(a.1);
            (&mut right[0], &mut left[b.1])
        }
    } else if a.0 < b.0 {
        let (left, right) = swarms.split_at_mut(b.0);
        (&mut left[a.0][a.1], &mut right[0][b.1])
    } else {
        let (left, right) = swarms.split_at_mut(a.0);
        (&mut right[0][a.1], &mut left[b.0][b.1])
    }
}

#[cfg(test)]
mod tests_multiswarm {
    use super::*;
    use crate::types::EvaluationError;

    #[derive(Debug, Clone)]
    struct Sphere;

    impl Problem for Sphere {
        fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(x.iter().map(|v| v * v).sum())
        }

        fn domain(&self) -> (f64, f64) {
            (-10.0, 10.0)
        }

        fn accuracy(&self) -> f64 {
            0.1
        }
    }

    fn positions(base: &MultiSwarm<Sphere>) -> Vec<Vec<f64>> {
        let mut all: Vec<Vec<f64>> = base
            .swarms
            .iter()
            .flatten()
            .map(|p| p.x.to_vec())
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        all
    }

    #[test]
    /// Test the round-robin partition: sizes differ by at most one
    fn test_partition_sizes() {
        let base = MultiSwarm::new(Sphere, 11, 2, 3, 0.0, 0).unwrap();
        let sizes: Vec<usize> = base.swarms.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
        assert_eq!(sizes.iter().sum::<usize>(), 11);
    }

    #[test]
    /// Test that zero velocity magnitude yields zero initial velocities
    fn test_zero_velocity_magnitude() {
        let base = MultiSwarm::new(Sphere, 8, 3, 2, 0.0, 0).unwrap();
        for swarm in &base.swarms {
            for particle in swarm {
                assert!(particle.v.iter().all(|v| *v == 0.0));
            }
        }
    }

    #[test]
    /// Test that initial velocities honor the magnitude-scaled range
    fn test_velocity_init_range() {
        let magnitude = 0.25;
        let base = MultiSwarm::new(Sphere, 20, 4, 2, magnitude, 1).unwrap();
        let half = 20.0 * magnitude;
        for swarm in &base.swarms {
            for particle in swarm {
                for v in particle.v.iter() {
                    assert!((-half..=half).contains(v));
                }
            }
        }
    }

    #[test]
    /// Test that shuffle permutes order without touching positions
    fn test_shuffle_preserves_positions() {
        let mut base = MultiSwarm::new(Sphere, 12, 2, 3, 0.0, 7).unwrap();
        let before = positions(&base);
        let sizes_before: Vec<usize> = base.swarms.iter().map(Vec::len).collect();
        base.shuffle();
        assert_eq!(positions(&base), before);
        let sizes_after: Vec<usize> = base.swarms.iter().map(Vec::len).collect();
        assert_eq!(sizes_after, sizes_before);
    }

    #[test]
    /// Test that select_best finds the population minimum
    fn test_select_best_finds_minimum() {
        let mut base = MultiSwarm::new(Sphere, 9, 2, 3, 0.0, 3).unwrap();
        base.swarms[1][2].x = Array1::zeros(2);
        let best = base.select_best().unwrap();
        assert_eq!(best, 0.0);
        assert_eq!(base.core.best_position(), &Array1::<f64>::zeros(2));
    }

    #[test]
    /// Test that select_best never worsens the recorded best
    fn test_select_best_monotone() {
        let mut base = MultiSwarm::new(Sphere, 6, 2, 2, 0.0, 5).unwrap();
        let first = base.select_best().unwrap();
        // push every particle to the worst corner; the recorded best must stand
        for swarm in &mut base.swarms {
            for particle in swarm.iter_mut() {
                particle.x.fill(10.0);
            }
        }
        let second = base.select_best().unwrap();
        assert_eq!(second, first);
        assert_eq!(base.core.best_value(), first);
    }

    #[test]
    /// Test pair_mut within one swarm and across swarms
    fn test_pair_mut() {
        let mut base = MultiSwarm::new(Sphere, 8, 2, 2, 0.0, 0).unwrap();

        let (a, b) = pair_mut(&mut base.swarms, (0, 0), (0, 3));
        a.x.fill(1.0);
        b.x.fill(2.0);
        assert_eq!(base.swarms[0][0].x, Array1::from_elem(2, 1.0));
        assert_eq!(base.swarms[0][3].x, Array1::from_elem(2, 2.0));

        let (a, b) = pair_mut(&mut base.swarms, (1, 2), (0, 1));
        a.x.fill(3.0);
        b.x.fill(4.0);
        assert_eq!(base.swarms[1][2].x, Array1::from_elem(2, 3.0));
        assert_eq!(base.swarms[0][1].x, Array1::from_elem(2, 4.0));
    }

    #[test]
    #[should_panic(expected = "distinct particles")]
    /// Test that pair_mut rejects aliasing the same particle
    fn test_pair_mut_same_particle() {
        let mut base = MultiSwarm::new(Sphere, 8, 2, 2, 0.0, 0).unwrap();
        let _ = pair_mut(&mut base.swarms, (1, 1), (1, 1));
    }

    #[test]
    /// Test average positions over a swarm and over explicit locations
    fn test_average_positions() {
        let mut base = MultiSwarm::new(Sphere, 4, 2, 2, 0.0, 0).unwrap();
        base.swarms[0][0].x = Array1::from_vec(vec![2.0, 4.0]);
        base.swarms[0][1].x = Array1::from_vec(vec![6.0, 0.0]);
        assert_eq!(base.swarm_average(0), Array1::from_vec(vec![4.0, 2.0]));

        base.swarms[1][0].x = Array1::from_vec(vec![-2.0, -2.0]);
        let avg = base.average_position(&[(0, 0), (1, 0)]);
        assert_eq!(avg, Array1::from_vec(vec![0.0, 1.0]));
    }

    #[test]
    /// Test that reset restores run state and re-randomizes the partition
    fn test_reset() {
        let mut base = MultiSwarm::new(Sphere, 10, 2, 2, 0.0, 9).unwrap();
        base.select_best().unwrap();
        assert!(base.core.best_value().is_finite());
        let before = positions(&base);
        base.reset();
        assert!(base.core.best_value().is_infinite());
        assert_ne!(positions(&base), before);
        let sizes: Vec<usize> = base.swarms.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5]);
    }
}
