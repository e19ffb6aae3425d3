//! # Optimization problem trait module
//!
//! This module contains the `Problem` trait, which defines the contract an objective must
//! satisfy to be minimized by the solvers: the objective function itself plus the metadata
//! the solvers read from it (domain interval, accuracy threshold and supported dimensions).
//!
//! ## Example
//! ```rust
//! use ndarray::Array1;
//! use swarmsearch::problem::Problem;
//! use swarmsearch::types::EvaluationError;
//!
//! #[derive(Debug, Clone)]
//! pub struct Paraboloid;
//!
//! impl Problem for Paraboloid {
//!     fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
//!         Ok(x.iter().map(|v| (v - 1.5).powi(2)).sum())
//!     }
//!
//!     fn domain(&self) -> (f64, f64) {
//!         (-5.0, 5.0)
//!     }
//!
//!     fn accuracy(&self) -> f64 {
//!         1e-6
//!     }
//! }
//! ```
use crate::types::EvaluationError;
use ndarray::Array1;

/// Trait for optimization problems
///
/// This trait defines the methods an optimization problem must implement: the objective
/// function to minimize and the metadata the solvers consume. Objectives are treated as
/// black boxes; no gradient is ever requested.
pub trait Problem {
    /// Objective function to minimize, evaluated at point x (`Array1<f64>`)
    ///
    /// Returns a `Result<f64, EvaluationError>` of the value of the objective function at x.
    /// Evaluation must be pure: the same x always yields the same value.
    fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError>;

    /// Domain interval `[lo, hi]` applied uniformly to every coordinate
    ///
    /// Solvers draw initial positions uniformly from this interval and reflect
    /// out-of-range moves back into it.
    fn domain(&self) -> (f64, f64);

    /// Convergence accuracy threshold for this objective
    ///
    /// A convergence-mode run terminates once the best value changes by a positive
    /// amount no larger than this threshold.
    fn accuracy(&self) -> f64;

    /// Supported coordinate-count range `[min, max]`, both inclusive
    ///
    /// Solver construction fails with `SolverError::DimensionOutOfBounds` when the
    /// requested dimension falls outside this range. The default accepts any
    /// positive dimension.
    fn dimension_bounds(&self) -> (usize, usize) {
        (1, usize::MAX)
    }
}
