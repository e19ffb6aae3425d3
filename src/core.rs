//! # Solver core module
//!
//! Shared state and run loop for all solver variants. `SolverCore` owns the problem, the
//! metadata cached from it, the global best seen so far, the run log and the seeded random
//! generator. The `Solver` trait adds the per-variant `step` and `reset` on top and provides
//! the convergence-driven `evaluate` loop once, so every variant runs the same way.

use crate::problem::Problem;
use crate::types::{RunLog, SolverError};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hard cap on the number of generations a convergence-mode run may take
pub const MAX_STEPS: usize = 10_000;

/// Plateau window: a run stops once this many trailing best values are bit-identical
pub const PLATEAU_WINDOW: usize = 50;

#[derive(Debug, Clone)]
/// State shared by every solver variant
///
/// Holds the problem under optimization together with everything a run accumulates:
/// the global best position and value, the run log and the random generator. Variant
/// structs embed one `SolverCore` and keep their particle populations next to it.
pub struct SolverCore<P: Problem> {
    pub(crate) problem: P,
    pub(crate) dimension: usize,
    pub(crate) population: usize,
    pub(crate) domain: (f64, f64),
    pub(crate) accuracy: f64,
    pub(crate) best_position: Array1<f64>,
    pub(crate) best_value: f64,
    pub(crate) log: RunLog,
    pub(crate) rng: StdRng,
}

impl<P: Problem> SolverCore<P> {
    /// Validates the requested shape against the problem and builds the initial state.
    ///
    /// Fails with `DimensionOutOfBounds` when the dimension is outside the problem's
    /// supported range, and with `InvalidConfiguration` for a zero population or a
    /// reversed domain interval.
    pub fn new(
        problem: P,
        population: usize,
        dimension: usize,
        seed: u64,
    ) -> Result<Self, SolverError> {
        let (min, max) = problem.dimension_bounds();
        if dimension < min || dimension > max {
            return Err(SolverError::DimensionOutOfBounds {
                dimension,
                min,
                max,
            });
        }
        if population == 0 {
            return Err(SolverError::InvalidConfiguration(
                "population must be positive".to_string(),
            ));
        }
        let domain = problem.domain();
        if domain.0 > domain.1 {
            return Err(SolverError::InvalidConfiguration(format!(
                "domain interval [{}, {}] is reversed",
                domain.0, domain.1
            )));
        }
        let accuracy = problem.accuracy();
        Ok(Self {
            best_position: Array1::zeros(dimension),
            best_value: f64::INFINITY,
            log: RunLog::default(),
            rng: StdRng::seed_from_u64(seed),
            problem,
            dimension,
            population,
            domain,
            accuracy,
        })
    }

    /// Draws a position uniformly over the domain.
    pub(crate) fn random_position(&mut self) -> Array1<f64> {
        let (lo, hi) = self.domain;
        let rng = &mut self.rng;
        Array1::from_shape_fn(self.dimension, |_| rng.random_range(lo..=hi))
    }

    /// Records `value` as the new global best if it strictly improves, copying `position`.
    pub(crate) fn update_best(&mut self, value: f64, position: &Array1<f64>) {
        if value < self.best_value {
            self.best_value = value;
            self.best_position.assign(position);
        }
    }

    /// Restores the run-accumulated state: best value back to `+inf`, log cleared.
    pub(crate) fn clear_run(&mut self) {
        self.best_value = f64::INFINITY;
        self.log = RunLog::default();
    }

    /// Returns the problem under optimization.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Returns the coordinate count.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of particles.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Returns the domain interval cached from the problem.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the accuracy threshold cached from the problem.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Returns the best objective value seen so far.
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Returns the best position seen so far.
    pub fn best_position(&self) -> &Array1<f64> {
        &self.best_position
    }

    /// Returns the log of the most recent run.
    pub fn run_log(&self) -> &RunLog {
        &self.log
    }
}

/// Common interface over all solver variants
///
/// A variant implements one generation (`step`) and re-randomization (`reset`); the
/// run loop (`evaluate`) and the result accessors are provided once on top of the
/// embedded [`SolverCore`].
pub trait Solver {
    /// Objective type this solver minimizes
    type Problem: Problem;

    /// Advances the solver by one generation and returns the updated global best value.
    fn step(&mut self) -> Result<f64, SolverError>;

    /// Re-randomizes all particle state, restores the best value to `+inf` and clears the log.
    ///
    /// Hyperparameters and the problem are retained; the random generator continues
    /// from its current state.
    fn reset(&mut self);

    /// Shared state of the solver.
    fn core(&self) -> &SolverCore<Self::Problem>;

    /// Mutable shared state of the solver.
    fn core_mut(&mut self) -> &mut SolverCore<Self::Problem>;

    /// Runs the solver until convergence or for an exact number of generations.
    ///
    /// With `None`, steps repeatedly up to [`MAX_STEPS`] times and terminates early when
    /// the best value changes by a positive amount no larger than the problem's accuracy
    /// threshold, or when the trailing [`PLATEAU_WINDOW`] recorded values are all
    /// bit-identical. The recorded iteration count is the 0-based index of the
    /// terminating generation, or [`MAX_STEPS`] when the cap is hit.
    ///
    /// With `Some(n)` runs exactly `n` generations and records `n`. `Some(0)` fails with
    /// [`SolverError::InvalidArgument`] and leaves the solver untouched.
    ///
    /// Returns the last recorded best value. The run log is rewritten by each successful
    /// call; call [`reset`](Solver::reset) between independent runs.
    fn evaluate(&mut self, iterations: Option<usize>) -> Result<f64, SolverError> {
        match iterations {
            Some(0) => Err(SolverError::InvalidArgument(0)),
            Some(n) => {
                let mut values = Vec::with_capacity(n);
                let mut last = f64::INFINITY;
                for _ in 0..n {
                    last = self.step()?;
                    values.push(last);
                }
                self.core_mut().log = RunLog {
                    iterations: n,
                    values,
                };
                Ok(last)
            }
            None => {
                let accuracy = self.core().accuracy();
                let mut values = Vec::new();
                let mut last = f64::INFINITY;
                let mut terminated_at = MAX_STEPS;
                for i in 0..MAX_STEPS {
                    let previous = self.core().best_value();
                    last = self.step()?;
                    values.push(last);
                    let delta = (last - previous).abs();
                    if (delta > 0.0 && delta <= accuracy) || plateaued(&values) {
                        terminated_at = i;
                        break;
                    }
                }
                self.core_mut().log = RunLog {
                    iterations: terminated_at,
                    values,
                };
                Ok(last)
            }
        }
    }

    /// Returns the best objective value seen so far.
    fn best_value(&self) -> f64 {
        self.core().best_value()
    }

    /// Returns a copy of the best position seen so far.
    fn best_position(&self) -> Array1<f64> {
        self.core().best_position().clone()
    }

    /// Returns the log of the most recent `evaluate` run.
    fn run_log(&self) -> &RunLog {
        self.core().run_log()
    }
}

/// True once the trailing window is saturated and bit-identical
fn plateaued(values: &[f64]) -> bool {
    if values.len() <= PLATEAU_WINDOW {
        return false;
    }
    let last = values[values.len() - 1].to_bits();
    values[values.len() - PLATEAU_WINDOW..]
        .iter()
        .all(|v| v.to_bits() == last)
}

#[cfg(test)]
mod tests_core {
    use super::*;
    use crate::types::EvaluationError;

    #[derive(Debug, Clone)]
    struct Flat;

    impl Problem for Flat {
        fn objective(&self, _x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(0.0)
        }

        fn domain(&self) -> (f64, f64) {
            (-10.0, 10.0)
        }

        fn accuracy(&self) -> f64 {
            0.1
        }
    }

    #[derive(Debug, Clone)]
    struct NarrowDims;

    impl Problem for NarrowDims {
        fn objective(&self, _x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(0.0)
        }

        fn domain(&self) -> (f64, f64) {
            (-1.0, 1.0)
        }

        fn accuracy(&self) -> f64 {
            0.1
        }

        fn dimension_bounds(&self) -> (usize, usize) {
            (2, 100)
        }
    }

    #[derive(Debug, Clone)]
    struct Reversed;

    impl Problem for Reversed {
        fn objective(&self, _x: &Array1<f64>) -> Result<f64, EvaluationError> {
            Ok(0.0)
        }

        fn domain(&self) -> (f64, f64) {
            (5.0, -5.0)
        }

        fn accuracy(&self) -> f64 {
            0.1
        }
    }

    /// Solver returning a pre-scripted sequence of best values, repeating the last entry
    struct ScriptedSolver {
        core: SolverCore<Flat>,
        script: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedSolver {
        fn new(script: Vec<f64>) -> Self {
            Self {
                core: SolverCore::new(Flat, 1, 2, 0).unwrap(),
                script,
                cursor: 0,
            }
        }
    }

    impl Solver for ScriptedSolver {
        type Problem = Flat;

        fn step(&mut self) -> Result<f64, SolverError> {
            let value = self.script[self.cursor.min(self.script.len() - 1)];
            self.cursor += 1;
            self.core.best_value = value;
            Ok(value)
        }

        fn reset(&mut self) {
            self.cursor = 0;
            self.core.clear_run();
        }

        fn core(&self) -> &SolverCore<Flat> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SolverCore<Flat> {
            &mut self.core
        }
    }

    /// Solver whose best value keeps dropping by a large amount forever
    struct DescendingSolver {
        core: SolverCore<Flat>,
    }

    impl Solver for DescendingSolver {
        type Problem = Flat;

        fn step(&mut self) -> Result<f64, SolverError> {
            self.core.best_value = if self.core.best_value.is_finite() {
                self.core.best_value - 1000.0
            } else {
                1e7
            };
            Ok(self.core.best_value)
        }

        fn reset(&mut self) {
            self.core.clear_run();
        }

        fn core(&self) -> &SolverCore<Flat> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SolverCore<Flat> {
            &mut self.core
        }
    }

    #[test]
    /// Test that iteration mode runs exactly the requested number of generations
    fn test_iteration_mode_exact_count() {
        let mut solver = ScriptedSolver::new(vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        let result = solver.evaluate(Some(3)).unwrap();
        assert_eq!(result, 3.0);
        assert_eq!(solver.cursor, 3);
        assert_eq!(solver.run_log().iterations, 3);
        assert_eq!(solver.run_log().values, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    /// Test that a zero iteration count is rejected without touching state
    fn test_zero_iterations_rejected() {
        let mut solver = ScriptedSolver::new(vec![5.0]);
        let err = solver.evaluate(Some(0)).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArgument(0)));
        assert_eq!(solver.cursor, 0);
        assert!(solver.run_log().is_empty());
    }

    #[test]
    /// Test convergence on a small positive change within the accuracy threshold
    fn test_convergence_small_delta() {
        let mut solver = ScriptedSolver::new(vec![10.0, 5.0, 4.95]);
        let result = solver.evaluate(None).unwrap();
        assert_eq!(result, 4.95);
        assert_eq!(solver.run_log().iterations, 2);
        assert_eq!(solver.run_log().values, vec![10.0, 5.0, 4.95]);
    }

    #[test]
    /// Test that a zero change does not count as convergence
    fn test_zero_delta_not_convergence() {
        let mut solver = ScriptedSolver::new(vec![7.0, 7.0, 7.0, 3.0]);
        let result = solver.evaluate(None).unwrap();
        assert_eq!(result, 3.0);
        // the 7 -> 7 generations must not terminate the run; the trailing 3s plateau
        // does, once the window no longer contains a 7
        assert_eq!(&solver.run_log().values[..4], &[7.0, 7.0, 7.0, 3.0]);
        assert_eq!(solver.run_log().iterations, PLATEAU_WINDOW + 2);
        assert_eq!(solver.run_log().values.len(), PLATEAU_WINDOW + 3);
    }

    #[test]
    /// Test plateau termination after fifty identical trailing values
    fn test_convergence_plateau() {
        let mut solver = ScriptedSolver::new(vec![9.0]);
        let result = solver.evaluate(None).unwrap();
        assert_eq!(result, 9.0);
        assert_eq!(solver.run_log().iterations, PLATEAU_WINDOW);
        assert_eq!(solver.run_log().values.len(), PLATEAU_WINDOW + 1);
    }

    #[test]
    /// Test that the step cap terminates a run that never converges
    fn test_convergence_cap() {
        let mut solver = DescendingSolver {
            core: SolverCore::new(Flat, 1, 2, 0).unwrap(),
        };
        let result = solver.evaluate(None).unwrap();
        assert_eq!(solver.run_log().iterations, MAX_STEPS);
        assert_eq!(solver.run_log().values.len(), MAX_STEPS);
        assert_eq!(result, 1e7 - 1000.0 * (MAX_STEPS as f64 - 1.0));
    }

    #[test]
    /// Test that each evaluate call rewrites the previous run log
    fn test_evaluate_overwrites_log() {
        let mut solver = ScriptedSolver::new(vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        solver.evaluate(Some(5)).unwrap();
        assert_eq!(solver.run_log().values.len(), 5);
        solver.reset();
        solver.evaluate(Some(2)).unwrap();
        assert_eq!(solver.run_log().iterations, 2);
        assert_eq!(solver.run_log().values, vec![5.0, 4.0]);
    }

    #[test]
    /// Test construction failure for a dimension outside the problem's range
    fn test_dimension_out_of_bounds() {
        let err = SolverCore::new(NarrowDims, 5, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionOutOfBounds {
                dimension: 1,
                min: 2,
                max: 100
            }
        ));
        let err = SolverCore::new(NarrowDims, 5, 101, 0).unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionOutOfBounds { dimension: 101, .. }
        ));
        assert!(SolverCore::new(NarrowDims, 5, 2, 0).is_ok());
    }

    #[test]
    /// Test construction failure for a zero population
    fn test_zero_population_rejected() {
        let err = SolverCore::new(Flat, 0, 2, 0).unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfiguration(_)));
    }

    #[test]
    /// Test construction failure for a reversed domain interval
    fn test_reversed_domain_rejected() {
        let err = SolverCore::new(Reversed, 5, 2, 0).unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfiguration(_)));
    }

    #[test]
    /// Test that equally seeded cores draw identical positions within the domain
    fn test_random_position_determinism() {
        let mut a = SolverCore::new(Flat, 5, 4, 123).unwrap();
        let mut b = SolverCore::new(Flat, 5, 4, 123).unwrap();
        for _ in 0..10 {
            let pa = a.random_position();
            let pb = b.random_position();
            assert_eq!(pa, pb);
            for component in pa.iter() {
                assert!((-10.0..=10.0).contains(component));
            }
        }
    }

    #[test]
    /// Test that update_best only accepts strict improvements
    fn test_update_best_strict() {
        let mut core = SolverCore::new(Flat, 1, 2, 0).unwrap();
        let position = Array1::from_vec(vec![1.0, 2.0]);
        core.update_best(5.0, &position);
        assert_eq!(core.best_value(), 5.0);
        assert_eq!(core.best_position(), &position);

        let worse = Array1::from_vec(vec![9.0, 9.0]);
        core.update_best(6.0, &worse);
        assert_eq!(core.best_value(), 5.0);
        assert_eq!(core.best_position(), &position);

        core.update_best(5.0, &worse);
        assert_eq!(core.best_position(), &position);
    }

    #[test]
    /// Test that reset restores the best value and clears the log
    fn test_reset_restores_run_state() {
        let mut solver = ScriptedSolver::new(vec![5.0, 4.0]);
        solver.evaluate(Some(2)).unwrap();
        assert_eq!(solver.best_value(), 4.0);
        solver.reset();
        assert!(solver.best_value().is_infinite());
        assert!(solver.run_log().is_empty());
        assert_eq!(solver.run_log().iterations, 0);
    }
}
