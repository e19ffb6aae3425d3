//! # Leader competitive swarm optimization module
//!
//! LCSO runs three-way tournaments: each triple of particles is ranked into winner, second
//! and loser; the second chases the winner, the loser chases both. As in `cso`, one random
//! triple-winner per swarm advances to a cross-swarm second stage and winners never move, so
//! each generation's leaders carry over intact.

use crate::bounds::reflect;
use crate::core::{Solver, SolverCore};
use crate::multiswarm::{Loc, MultiSwarm};
use crate::problem::Problem;
use crate::types::SolverError;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
/// Parameters for the LCSO solver
pub struct LCSOParams {
    /// Number of swarms the population is partitioned into, at least 3
    pub swarms: usize,
    /// Half-width of the initial velocity range as a fraction of the domain width
    pub velocity_magnitude: f64,
    /// Random seed for the solver
    pub seed: u64,
}

impl Default for LCSOParams {
    /// Default parameters for the LCSO solver
    ///
    /// - `swarms`: 3
    /// - `velocity_magnitude`: 0.0
    /// - `seed`: 0
    fn default() -> Self {
        Self {
            swarms: 3,
            velocity_magnitude: 0.0,
            seed: 0,
        }
    }
}

impl LCSOParams {
    /// Sets the number of swarms.
    pub fn with_swarms(mut self, swarms: usize) -> Self {
        self.swarms = swarms;
        self
    }

    /// Sets the initial velocity magnitude.
    pub fn with_velocity_magnitude(mut self, magnitude: f64) -> Self {
        self.velocity_magnitude = magnitude;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
/// Three-way leader competitive swarm optimizer
pub struct LCSO<P: Problem> {
    base: MultiSwarm<P>,
}

impl<P: Problem> LCSO<P> {
    /// Creates the solver, validating the swarm partition.
    ///
    /// Fails with `InvalidConfiguration` when fewer than 3 swarms are requested or the
    /// population cannot give every swarm at least one triple.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        params: LCSOParams,
    ) -> Result<Self, SolverError> {
        if params.swarms < 3 {
            return Err(SolverError::InvalidConfiguration(format!(
                "LCSO needs at least 3 swarms, got {}",
                params.swarms
            )));
        }
        if population < 3 * params.swarms {
            return Err(SolverError::InvalidConfiguration(format!(
                "LCSO needs a population of at least 3 per swarm, got {} over {} swarms",
                population, params.swarms
            )));
        }
        let base = MultiSwarm::new(
            problem,
            population,
            dimension,
            params.swarms,
            params.velocity_magnitude,
            params.seed,
        )?;
        Ok(Self { base })
    }

    /// Three-way tournament, returning the winner's address
    ///
    /// The triple is ranked ascending by objective value (stable on ties, so the
    /// earlier candidate outranks an equal later one). Second and loser both update
    /// from the pre-update winner and second positions; the winner does not move.
    fn tournament(&mut self, triple: [Loc; 3]) -> Result<Loc, SolverError> {
        let mut ranked: Vec<(Loc, f64)> = Vec::with_capacity(3);
        for loc in triple {
            ranked.push((loc, self.base.value_at(loc)?));
        }
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (winner, second, loser) = (ranked[0].0, ranked[1].0, ranked[2].0);

        let x_winner = self.base.particle(winner).x.clone();
        let x_second = self.base.particle(second).x.clone();
        let dimension = self.base.core.dimension();
        let (lo, hi) = self.base.core.domain();

        {
            let rng = &mut self.base.core.rng;
            let particle = &mut self.base.swarms[second.0][second.1];
            for d in 0..dimension {
                let v = rng.random::<f64>() * particle.v[d]
                    + rng.random::<f64>() * (x_winner[d] - particle.x[d]);
                particle.v[d] = v;
                particle.x[d] = reflect(particle.x[d] + v, lo, hi);
            }
        }

        let rng = &mut self.base.core.rng;
        let particle = &mut self.base.swarms[loser.0][loser.1];
        for d in 0..dimension {
            let v = rng.random::<f64>() * particle.v[d]
                + rng.random::<f64>() * (x_winner[d] - particle.x[d])
                + rng.random::<f64>() * (x_second[d] - particle.x[d]);
            particle.v[d] = v;
            particle.x[d] = reflect(particle.x[d] + v, lo, hi);
        }

        Ok(winner)
    }

    /// Intra-swarm tournaments, yielding one random triple-winner per swarm
    fn stage_one(&mut self) -> Result<Vec<Loc>, SolverError> {
        let mut candidates = Vec::with_capacity(self.base.swarms.len());
        for s in 0..self.base.swarms.len() {
            let size = self.base.swarms[s].len();
            let mut winners = Vec::with_capacity(size / 3);
            // up to two leftover particles sit out this stage
            let mut p = size % 3;
            while p + 2 < size {
                winners.push(self.tournament([(s, p), (s, p + 1), (s, p + 2)])?);
                p += 3;
            }
            // validation guarantees at least one triple per swarm
            let chosen = winners[self.base.core.rng.random_range(0..winners.len())];
            candidates.push(chosen);
        }
        candidates.shuffle(&mut self.base.core.rng);
        Ok(candidates)
    }

    /// Cross-swarm tournaments over the stage-one winners
    fn stage_two(&mut self, candidates: &[Loc]) -> Result<(), SolverError> {
        for triple in candidates.chunks_exact(3) {
            self.tournament([triple[0], triple[1], triple[2]])?;
        }
        Ok(())
    }
}

impl<P: Problem> Solver for LCSO<P> {
    type Problem = P;

    fn step(&mut self) -> Result<f64, SolverError> {
        self.base.shuffle();
        let candidates = self.stage_one()?;
        self.stage_two(&candidates)?;
        self.base.select_best()
    }

    fn reset(&mut self) {
        self.base.reset();
    }

    fn core(&self) -> &SolverCore<P> {
        &self.base.core
    }

    fn core_mut(&mut self) -> &mut SolverCore<P> {
        &mut self.base.core
    }
}
