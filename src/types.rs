//! # Types module
//!
//! This module contains the types shared across the solver variants: the `Weight`
//! velocity coefficient, the `RunLog` produced by every run, and the error types
//! raised during construction, run invocation and objective evaluation.

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Velocity-update coefficient, either a fixed scalar or a uniformly re-sampled range
///
/// A `Range` weight is resolved to a fresh draw every time it is read, so a single
/// velocity update can see several different values of the same weight.
pub enum Weight {
    /// Constant coefficient
    Fixed(f64),
    /// Coefficient re-sampled uniformly from `[lo, hi]` at every use
    Range(f64, f64),
}

impl Weight {
    /// Resolves the weight to a concrete value, sampling if it is a range
    ///
    /// Reversed ranges are handled by linear interpolation and stay within the
    /// interval spanned by the two endpoints.
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        match *self {
            Weight::Fixed(w) => w,
            Weight::Range(lo, hi) => lo + rng.random::<f64>() * (hi - lo),
        }
    }
}

impl From<f64> for Weight {
    fn from(w: f64) -> Self {
        Weight::Fixed(w)
    }
}

impl From<(f64, f64)> for Weight {
    fn from((lo, hi): (f64, f64)) -> Self {
        Weight::Range(lo, hi)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Record of the most recent `evaluate` run
///
/// Stores the global best value observed after each generation, in order, together
/// with the iteration count the run terminated at: the 0-based step index when a
/// convergence criterion fired, the step cap when none did, or the requested count
/// in fixed-iteration mode. Overwritten by each successful `evaluate` call.
pub struct RunLog {
    /// Iteration count the run terminated at
    pub iterations: usize,
    /// Global best value after each generation
    pub values: Vec<f64>,
}

impl RunLog {
    /// Returns the number of recorded generations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the best value after the final recorded generation.
    pub fn final_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl fmt::Display for RunLog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━ Run Log ━━━━━━━━━━━━━")?;
        writeln!(f, "Recorded generations: {}", self.values.len())?;
        writeln!(f, "Terminating iteration: {}", self.iterations)?;
        if let Some(first) = self.values.first() {
            writeln!(f, "Initial best: {:.8e}", first)?;
        }
        if let Some(last) = self.final_value() {
            writeln!(f, "Final best: {:.8e}", last)?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        Ok(())
    }
}

#[derive(Debug, Error)]
/// Error type for solver construction and run invocation
pub enum SolverError {
    /// Error when the requested dimension is outside the objective's supported range
    #[error("Dimension {dimension} outside the supported range [{min}, {max}].")]
    DimensionOutOfBounds {
        /// Requested coordinate count
        dimension: usize,
        /// Smallest supported coordinate count
        min: usize,
        /// Largest supported coordinate count
        max: usize,
    },

    /// Error when the solver configuration is structurally invalid
    #[error("Invalid configuration: {0}.")]
    InvalidConfiguration(String),

    /// Error when a non-positive iteration count is passed to `evaluate`
    #[error("Iteration count must be positive, got {0}.")]
    InvalidArgument(usize),

    /// Error propagated from the objective function
    #[error("Objective evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

#[derive(Debug, Error)]
/// Error type for objective function evaluation
pub enum EvaluationError {
    /// Error when the input is invalid
    #[error("Invalid input: {0}.")]
    InvalidInput(String),

    /// Error when dividing by zero
    #[error("Division by zero found.")]
    DivisionByZero,

    /// Error when having a negative square root
    #[error("Negative square root found.")]
    NegativeSqrt,
}
