//! # Particle swarm optimization module
//!
//! Canonical PSO over a bounded domain. Every generation each particle blends its previous
//! velocity (inertia) with a pull toward its own best-seen position and a pull toward a
//! social target, then moves and reflects off the domain boundary. The social target comes
//! in two rules: the classic global best position, or the swarm-averaged displacement from
//! the global best.
//!
//! ## Example
//! ```rust
//! use swarmsearch::benchmarks::{Benchmark, TestFunction};
//! use swarmsearch::core::Solver;
//! use swarmsearch::pso::{PSOParams, PSO};
//!
//! fn main() -> Result<(), swarmsearch::types::SolverError> {
//!     let problem = Benchmark::new(TestFunction::Sphere).with_domain(-10.0, 10.0);
//!     let mut solver = PSO::new(problem, 25, 2, PSOParams::default())?;
//!     let best = solver.evaluate(Some(100))?;
//!     assert!(best.is_finite());
//!     Ok(())
//! }
//! ```
use crate::bounds::reflect;
use crate::core::{Solver, SolverCore};
use crate::problem::Problem;
use crate::types::{SolverError, Weight};
use ndarray::Array1;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Social-pull target for the velocity update
pub enum UpdateRule {
    /// Pull toward the global best position
    #[default]
    LocalGlobal,
    /// Pull toward the swarm-averaged displacement from the global best,
    /// pre-computed once per generation
    NeighborhoodAverage,
}

#[derive(Debug, Clone, PartialEq)]
/// Parameters for the PSO solver
pub struct PSOParams {
    /// Inertia weight `w_v` applied to the previous velocity
    pub inertia_weight: Weight,
    /// Cognitive weight `w_l` scaling the pull toward the particle's own best position
    pub local_weight: Weight,
    /// Social weight `w_g` scaling the pull toward the swarm target
    pub global_weight: Weight,
    /// Velocity-update rule
    pub rule: UpdateRule,
    /// Random seed for the solver
    pub seed: u64,
}

impl Default for PSOParams {
    /// Default parameters for the PSO solver
    ///
    /// - `inertia_weight`: 0.729
    /// - `local_weight`: 1.494
    /// - `global_weight`: 1.494
    /// - `rule`: `UpdateRule::LocalGlobal`
    /// - `seed`: 0
    fn default() -> Self {
        Self {
            inertia_weight: Weight::Fixed(0.729),
            local_weight: Weight::Fixed(1.494),
            global_weight: Weight::Fixed(1.494),
            rule: UpdateRule::default(),
            seed: 0,
        }
    }
}

impl PSOParams {
    /// Sets the inertia weight.
    pub fn with_inertia_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.inertia_weight = weight.into();
        self
    }

    /// Sets the cognitive weight.
    pub fn with_local_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.local_weight = weight.into();
        self
    }

    /// Sets the social weight.
    pub fn with_global_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.global_weight = weight.into();
        self
    }

    /// Sets the velocity-update rule.
    pub fn with_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
struct Particle {
    x: Array1<f64>,
    v: Array1<f64>,
    best_local: Array1<f64>,
}

#[derive(Debug, Clone)]
/// Canonical particle swarm optimizer
pub struct PSO<P: Problem> {
    core: SolverCore<P>,
    params: PSOParams,
    particles: Vec<Particle>,
}

impl<P: Problem> PSO<P> {
    /// Creates the solver and randomizes the initial swarm.
    ///
    /// Returns a `Result<PSO<P>, SolverError>`; construction fails when the dimension is
    /// outside the problem's supported range or the population is zero.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        params: PSOParams,
    ) -> Result<Self, SolverError> {
        let core = SolverCore::new(problem, population, dimension, params.seed)?;
        let mut solver = Self {
            core,
            params,
            particles: Vec::new(),
        };
        solver.reset();
        Ok(solver)
    }

    /// Per-dimension mean of `best_global - x` over the swarm, the neighborhood-average target
    fn average_displacement(&self) -> Array1<f64> {
        let mut avg = Array1::zeros(self.core.dimension());
        for particle in &self.particles {
            for d in 0..self.core.dimension() {
                avg[d] += self.core.best_position[d] - particle.x[d];
            }
        }
        avg / self.particles.len() as f64
    }
}

impl<P: Problem> Solver for PSO<P> {
    type Problem = P;

    fn step(&mut self) -> Result<f64, SolverError> {
        let dimension = self.core.dimension();
        let (lo, hi) = self.core.domain();

        let average = match self.params.rule {
            UpdateRule::LocalGlobal => None,
            UpdateRule::NeighborhoodAverage => Some(self.average_displacement()),
        };

        for i in 0..self.particles.len() {
            for d in 0..dimension {
                let x_d = self.particles[i].x[d];
                let v_d = self.particles[i].v[d];
                let best_local_d = self.particles[i].best_local[d];
                let target_d = match &average {
                    None => self.core.best_position[d],
                    Some(avg) => avg[d],
                };

                let rng = &mut self.core.rng;
                let v = self.params.inertia_weight.sample(rng) * v_d
                    + self.params.local_weight.sample(rng)
                        * rng.random::<f64>()
                        * (best_local_d - x_d)
                    + self.params.global_weight.sample(rng) * rng.random::<f64>() * (target_d - x_d);

                let particle = &mut self.particles[i];
                particle.v[d] = v;
                particle.x[d] = reflect(x_d + v, lo, hi);
            }

            let value = self.core.problem.objective(&self.particles[i].x)?;
            self.core.update_best(value, &self.particles[i].x);

            let best_local_value = self.core.problem.objective(&self.particles[i].best_local)?;
            if value < best_local_value {
                let particle = &mut self.particles[i];
                particle.best_local.assign(&particle.x);
            }
        }

        Ok(self.core.best_value)
    }

    fn reset(&mut self) {
        self.core.clear_run();
        self.particles.clear();
        for _ in 0..self.core.population() {
            let x = self.core.random_position();
            self.particles.push(Particle {
                best_local: x.clone(),
                v: Array1::zeros(self.core.dimension()),
                x,
            });
        }
        self.core.best_position.assign(&self.particles[0].x);
    }

    fn core(&self) -> &SolverCore<P> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SolverCore<P> {
        &mut self.core
    }
}
