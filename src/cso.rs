//! # Competitive swarm optimization module
//!
//! CSO never tracks personal bests. Each generation pairs particles off inside every swarm
//! and lets them compete: the loser is pulled toward the winner and toward the swarm's
//! average position while the winner stands still. One randomly chosen pair-winner per swarm
//! then enters a second, cross-swarm round of the same tournament. Only losers move, so the
//! best particles survive each generation untouched.

use crate::bounds::reflect;
use crate::core::{Solver, SolverCore};
use crate::multiswarm::{pair_mut, Loc, MultiSwarm};
use crate::problem::Problem;
use crate::types::SolverError;
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::Rng;

/// Scale of the swarm-average pull in the loser's velocity update
const SOCIAL_FACTOR: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
/// Parameters for the CSO solver
pub struct CSOParams {
    /// Number of swarms the population is partitioned into, at least 2
    pub swarms: usize,
    /// Half-width of the initial velocity range as a fraction of the domain width
    pub velocity_magnitude: f64,
    /// Random seed for the solver
    pub seed: u64,
}

impl Default for CSOParams {
    /// Default parameters for the CSO solver
    ///
    /// - `swarms`: 2
    /// - `velocity_magnitude`: 0.0
    /// - `seed`: 0
    fn default() -> Self {
        Self {
            swarms: 2,
            velocity_magnitude: 0.0,
            seed: 0,
        }
    }
}

impl CSOParams {
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
/// Pairwise competitive swarm optimizer
pub struct CSO<P: Problem> {
    base: MultiSwarm<P>,
}

impl<P: Problem> CSO<P> {
    /// Creates the solver, validating the swarm partition.
    ///
    /// Fails with `InvalidConfiguration` when fewer than 2 swarms are requested or the
    /// population cannot give every swarm at least one pair.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        params: CSOParams,
    ) -> Result<Self, SolverError> {
        if params.swarms < 2 {
            return Err(SolverError::InvalidConfiguration(format!(
                "CSO needs at least 2 swarms, got {}",
                params.swarms
            )));
        }
        if population < 2 * params.swarms {
            return Err(SolverError::InvalidConfiguration(format!(
                "CSO needs a population of at least 2 per swarm, got {} over {} swarms",
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

    /// Pairwise tournament between two particles, returning the winner's address
    ///
    /// The smaller objective value wins; the first candidate stands on exact ties.
    /// The loser's velocity is re-drawn toward the winner and toward `average`, and
    /// its position moves through the boundary reflector. The winner does not move.
    fn tournament(
        &mut self,
        first: Loc,
        second: Loc,
        average: &Array1<f64>,
    ) -> Result<Loc, SolverError> {
        let value_first = self.base.value_at(first)?;
        let value_second = self.base.value_at(second)?;
        let (winner, loser) = if value_second < value_first {
            (second, first)
        } else {
            (first, second)
        };

        let dimension = self.base.core.dimension();
        let (lo, hi) = self.base.core.domain();
        let rng = &mut self.base.core.rng;
        let (winner_ref, loser_ref) = pair_mut(&mut self.base.swarms, winner, loser);
        for d in 0..dimension {
            let v = rng.random::<f64>() * loser_ref.v[d]
                + rng.random::<f64>() * (winner_ref.x[d] - loser_ref.x[d])
                + SOCIAL_FACTOR * rng.random::<f64>() * (average[d] - loser_ref.x[d]);
            loser_ref.v[d] = v;
            loser_ref.x[d] = reflect(loser_ref.x[d] + v, lo, hi);
        }
        Ok(winner)
    }

    /// Intra-swarm tournaments, yielding one random pair-winner per swarm
    fn stage_one(&mut self) -> Result<Vec<Loc>, SolverError> {
        let mut candidates = Vec::with_capacity(self.base.swarms.len());
        for s in 0..self.base.swarms.len() {
            let average = self.base.swarm_average(s);
            let size = self.base.swarms[s].len();
            let mut winners = Vec::with_capacity(size / 2);
            // an odd leftover particle sits out this stage
            let mut p = size % 2;
            while p + 1 < size {
                winners.push(self.tournament((s, p), (s, p + 1), &average)?);
                p += 2;
            }
            // validation guarantees at least one pair per swarm
            let chosen = winners[self.base.core.rng.random_range(0..winners.len())];
            candidates.push(chosen);
        }
        candidates.shuffle(&mut self.base.core.rng);
        Ok(candidates)
    }

    /// Cross-swarm tournaments over the stage-one winners
    fn stage_two(&mut self, candidates: &[Loc]) -> Result<(), SolverError> {
        let average = self.base.average_position(candidates);
        for pair in candidates.chunks_exact(2) {
            self.tournament(pair[0], pair[1], &average)?;
        }
        Ok(())
    }
}

impl<P: Problem> Solver for CSO<P> {
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
