//! # Genetic-learning particle swarm optimization module
//!
//! GLPSO breeds a per-particle exemplar each generation instead of pulling straight toward
//! the global best. Crossover mixes personal bests across the population, mutation re-draws
//! occasional coordinates, and selection keeps whichever of offspring and exemplar evaluates
//! better. Particles are then pulled toward their exemplar, optionally with Lévy-perturbed
//! velocities.

use crate::bounds::reflect;
use crate::core::{Solver, SolverCore};
use crate::levy::LevyFlight;
use crate::problem::Problem;
use crate::types::{SolverError, Weight};
use ndarray::Array1;
use rand::Rng;

/// Spread of the re-drawn velocity coordinate during mutation
const MUTATION_VELOCITY_RANGE: (f64, f64) = (-10.0, 10.0);

#[derive(Debug, Clone, PartialEq)]
/// Parameters for the GLPSO solver
pub struct GLPSOParams {
    /// Inertia weight `w_v` applied to the previous velocity
    pub inertia_weight: Weight,
    /// Weight `w_l` of the personal best in exemplar construction
    pub local_weight: Weight,
    /// Weight `w_g` of the global best in exemplar construction
    pub global_weight: Weight,
    /// Probability of mutating each offspring coordinate
    pub mutation_probability: f64,
    /// Enables Lévy-flight perturbation of updated velocities
    pub levy: bool,
    /// Random seed for the solver
    pub seed: u64,
}

impl Default for GLPSOParams {
    /// Default parameters for the GLPSO solver
    ///
    /// - `inertia_weight`: 0.729
    /// - `local_weight`: 1.494
    /// - `global_weight`: 1.494
    /// - `mutation_probability`: 0.01
    /// - `levy`: false
    /// - `seed`: 0
    fn default() -> Self {
        Self {
            inertia_weight: Weight::Fixed(0.729),
            local_weight: Weight::Fixed(1.494),
            global_weight: Weight::Fixed(1.494),
            mutation_probability: 0.01,
            levy: false,
            seed: 0,
        }
    }
}

impl GLPSOParams {
    /// Sets the inertia weight.
    pub fn with_inertia_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.inertia_weight = weight.into();
        self
    }

    /// Sets the personal-best weight.
    pub fn with_local_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.local_weight = weight.into();
        self
    }

    /// Sets the global-best weight.
    pub fn with_global_weight(mut self, weight: impl Into<Weight>) -> Self {
        self.global_weight = weight.into();
        self
    }

    /// Sets the per-coordinate mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Enables or disables Lévy-flight perturbation.
    pub fn with_levy(mut self, levy: bool) -> Self {
        self.levy = levy;
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
struct Offspring {
    x: Array1<f64>,
    v: Array1<f64>,
}

#[derive(Debug, Clone)]
/// Genetic-learning particle swarm optimizer
pub struct GLPSO<P: Problem> {
    core: SolverCore<P>,
    params: GLPSOParams,
    flight: LevyFlight,
    particles: Vec<Particle>,
    offsprings: Vec<Offspring>,
    exemplars: Vec<Array1<f64>>,
}

impl<P: Problem> GLPSO<P> {
    /// Creates the solver and randomizes particles, offsprings and exemplars.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        params: GLPSOParams,
    ) -> Result<Self, SolverError> {
        let core = SolverCore::new(problem, population, dimension, params.seed)?;
        let flight = LevyFlight::new(params.levy);
        let mut solver = Self {
            core,
            params,
            flight,
            particles: Vec::new(),
            offsprings: Vec::new(),
            exemplars: Vec::new(),
        };
        solver.reset();
        Ok(solver)
    }

    /// Breeds offspring coordinates for particle `i` from personal bests across the swarm.
    fn crossover(&mut self, i: usize) -> Result<(), SolverError> {
        let population = self.particles.len();
        for d in 0..self.core.dimension() {
            let partner = self.core.rng.random_range(0..population);
            let own_best = self.core.problem.objective(&self.particles[i].best_local)?;
            let partner_best = self
                .core
                .problem
                .objective(&self.particles[partner].best_local)?;
            self.offsprings[i].x[d] = if own_best < partner_best {
                let blend = self.core.rng.random::<f64>();
                blend * self.particles[i].best_local[d]
                    + (1.0 - blend) * self.core.best_position[d]
            } else {
                self.particles[partner].best_local[d]
            };
        }
        Ok(())
    }

    /// Re-draws occasional offspring coordinates and their velocity components.
    fn mutate(&mut self, i: usize) {
        let (lo, hi) = self.core.domain();
        let (v_lo, v_hi) = MUTATION_VELOCITY_RANGE;
        for d in 0..self.core.dimension() {
            if self.core.rng.random::<f64>() < self.params.mutation_probability {
                self.offsprings[i].x[d] = self.core.rng.random_range(lo..=hi);
                self.offsprings[i].v[d] = self.core.rng.random_range(v_lo..=v_hi);
            }
        }
    }

    /// Weighted blend of personal and global best for one exemplar coordinate
    ///
    /// When both randomly scaled weights vanish the blend degenerates to the
    /// arithmetic mean of the two attractors.
    fn exemplar_coordinate(&mut self, i: usize, d: usize) -> f64 {
        let rng = &mut self.core.rng;
        let c1 = self.params.local_weight.sample(rng);
        let c2 = self.params.global_weight.sample(rng);
        let r1 = rng.random::<f64>();
        let r2 = rng.random::<f64>();
        let best_local = self.particles[i].best_local[d];
        let best_global = self.core.best_position[d];
        let denominator = c1 * r1 + c2 * r2;
        if denominator == 0.0 {
            (best_local + best_global) / 2.0
        } else {
            (c1 * r1 * best_local + c2 * r2 * best_global) / denominator
        }
    }
}

impl<P: Problem> Solver for GLPSO<P> {
    type Problem = P;

    fn step(&mut self) -> Result<f64, SolverError> {
        let dimension = self.core.dimension();
        let (lo, hi) = self.core.domain();

        for i in 0..self.particles.len() {
            self.crossover(i)?;
            self.mutate(i);

            for d in 0..dimension {
                self.exemplars[i][d] = self.exemplar_coordinate(i, d);
            }

            // selection: the exemplar adopts a better offspring
            let offspring_value = self.core.problem.objective(&self.offsprings[i].x)?;
            let exemplar_value = self.core.problem.objective(&self.exemplars[i])?;
            if offspring_value < exemplar_value {
                self.exemplars[i].assign(&self.offsprings[i].x);
            }

            for d in 0..dimension {
                let x_d = self.particles[i].x[d];
                let v_d = self.particles[i].v[d];
                let target_d = self.exemplars[i][d];

                let rng = &mut self.core.rng;
                let v = self.params.inertia_weight.sample(rng) * v_d
                    + (self.params.local_weight.sample(rng)
                        + self.params.global_weight.sample(rng))
                        / 2.0
                        * rng.random::<f64>()
                        * (target_d - x_d);
                let v = self.flight.perturb(v, rng);

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
        self.offsprings.clear();
        self.exemplars.clear();
        let dimension = self.core.dimension();
        for _ in 0..self.core.population() {
            let x = self.core.random_position();
            self.particles.push(Particle {
                best_local: x.clone(),
                v: Array1::zeros(dimension),
                x,
            });
        }
        for _ in 0..self.core.population() {
            self.offsprings.push(Offspring {
                x: self.core.random_position(),
                v: Array1::zeros(dimension),
            });
        }
        for _ in 0..self.core.population() {
            let exemplar = self.core.random_position();
            self.exemplars.push(exemplar);
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
