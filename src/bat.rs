//! # Bat echolocation search module
//!
//! Each bat carries a loudness and a pulse rate on top of its position and velocity. A
//! generation rates the whole colony, pulls every bat toward the global best with a randomly
//! drawn frequency, then lets each bat echolocate: a short random walk scaled by the colony's
//! average loudness, accepted against the bat's own loudness. Accepted bats grow quieter and
//! fire pulses more often, shifting the colony from exploration to exploitation.

use crate::bounds::reflect;
use crate::core::{Solver, SolverCore};
use crate::levy::LevyFlight;
use crate::problem::Problem;
use crate::types::SolverError;
use ndarray::Array1;
use rand::Rng;

/// Initial loudness range each bat draws from
const LOUDNESS_INIT_RANGE: (f64, f64) = (1.0, 2.0);

/// Initial pulse rate of every bat
const PULSE_RATE_INIT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
/// Parameters for the bat solver
pub struct BatParams {
    /// Frequency range `[f_lo, f_hi]` the per-bat pull frequency is drawn from
    pub freq_range: (f64, f64),
    /// Loudness multiplier applied on acceptance, in `(0, 1)`
    pub loudness_decay: f64,
    /// Pulse-rate decay exponent, positive
    pub pulse_decay: f64,
    /// Enables Lévy-flight perturbation of the position step
    pub levy: bool,
    /// Random seed for the solver
    pub seed: u64,
}

impl Default for BatParams {
    /// Default parameters for the bat solver
    ///
    /// - `freq_range`: (0.0, 2.0)
    /// - `loudness_decay`: 0.9
    /// - `pulse_decay`: 0.8
    /// - `levy`: false
    /// - `seed`: 0
    fn default() -> Self {
        Self {
            freq_range: (0.0, 2.0),
            loudness_decay: 0.9,
            pulse_decay: 0.8,
            levy: false,
            seed: 0,
        }
    }
}

impl BatParams {
    /// Sets the frequency range.
    pub fn with_freq_range(mut self, lo: f64, hi: f64) -> Self {
        self.freq_range = (lo, hi);
        self
    }

    /// Sets the loudness decay multiplier.
    pub fn with_loudness_decay(mut self, decay: f64) -> Self {
        self.loudness_decay = decay;
        self
    }

    /// Sets the pulse-rate decay exponent.
    pub fn with_pulse_decay(mut self, decay: f64) -> Self {
        self.pulse_decay = decay;
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
struct Bat {
    x: Array1<f64>,
    v: Array1<f64>,
    /// Objective value at `x`, refreshed by the rating pass
    value: f64,
    loudness: f64,
    pulse_rate: f64,
}

#[derive(Debug, Clone)]
/// Bat-inspired echolocation solver
pub struct BatSearch<P: Problem> {
    core: SolverCore<P>,
    params: BatParams,
    flight: LevyFlight,
    bats: Vec<Bat>,
    /// Generations elapsed since the last reset
    t: u64,
}

impl<P: Problem> BatSearch<P> {
    /// Creates the solver and randomizes the initial colony.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        params: BatParams,
    ) -> Result<Self, SolverError> {
        let core = SolverCore::new(problem, population, dimension, params.seed)?;
        let flight = LevyFlight::new(params.levy);
        let mut solver = Self {
            core,
            params,
            flight,
            bats: Vec::new(),
            t: 0,
        };
        solver.reset();
        Ok(solver)
    }

    /// Mean loudness across the colony, including any decays already applied this pass
    fn average_loudness(&self) -> f64 {
        self.bats.iter().map(|bat| bat.loudness).sum::<f64>() / self.bats.len() as f64
    }

    /// One pull frequency per bat per generation
    fn draw_frequency(&mut self) -> f64 {
        let (f_lo, f_hi) = self.params.freq_range;
        f_lo + self.core.rng.random::<f64>() * (f_hi - f_lo)
    }

    /// Random walk around `center`, accepted against the bat's cached value and loudness
    fn echolocate(&mut self, i: usize, center: Array1<f64>) -> Result<(), SolverError> {
        let (lo, hi) = self.core.domain();
        let spread = self.average_loudness();
        let rng = &mut self.core.rng;
        let candidate = Array1::from_shape_fn(self.core.dimension, |d| {
            reflect(center[d] + rng.random_range(-1.0..=1.0) * spread, lo, hi)
        });

        let value = self.core.problem.objective(&candidate)?;
        let bat = &mut self.bats[i];
        if value < bat.value && self.core.rng.random::<f64>() < bat.loudness {
            bat.x = candidate;
            bat.value = value;
            bat.loudness *= self.params.loudness_decay;
            bat.pulse_rate *= 1.0 - (-self.params.pulse_decay * self.t as f64).exp();
        }
        Ok(())
    }
}

impl<P: Problem> Solver for BatSearch<P> {
    type Problem = P;

    fn step(&mut self) -> Result<f64, SolverError> {
        let dimension = self.core.dimension();
        let (lo, hi) = self.core.domain();
        self.t += 1;

        // rating pass: the only place the global best moves
        for i in 0..self.bats.len() {
            let value = self.core.problem.objective(&self.bats[i].x)?;
            self.bats[i].value = value;
            self.core.update_best(value, &self.bats[i].x);
        }

        for i in 0..self.bats.len() {
            let frequency = self.draw_frequency();
            for d in 0..dimension {
                let bat = &mut self.bats[i];
                bat.v[d] += frequency * (bat.x[d] - self.core.best_position[d]);
                let step = self.flight.perturb(bat.v[d], &mut self.core.rng);
                bat.x[d] = reflect(bat.x[d] + step, lo, hi);
            }
        }

        for i in 0..self.bats.len() {
            let pulse_rate = self.bats[i].pulse_rate;
            let center = if self.core.rng.random::<f64>() > pulse_rate {
                self.core.best_position.clone()
            } else {
                self.bats[i].x.clone()
            };
            self.echolocate(i, center)?;
        }

        Ok(self.core.best_value)
    }

    fn reset(&mut self) {
        self.core.clear_run();
        self.bats.clear();
        self.t = 0;
        let dimension = self.core.dimension();
        let (a_lo, a_hi) = LOUDNESS_INIT_RANGE;
        for _ in 0..self.core.population() {
            let x = self.core.random_position();
            let loudness = self.core.rng.random_range(a_lo..=a_hi);
            self.bats.push(Bat {
                x,
                v: Array1::zeros(dimension),
                value: f64::INFINITY,
                loudness,
                pulse_rate: PULSE_RATE_INIT,
            });
        }
        self.core.best_position.assign(&self.bats[0].x);
    }

    fn core(&self) -> &SolverCore<P> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SolverCore<P> {
        &mut self.core
    }
}
