//! # Benchmark catalog module
//!
//! Closed-form test functions for comparing solver variants, each carrying the metadata the
//! solvers read: supported dimensions, default domain interval and default convergence
//! accuracy. Functions are selected by [`TestFunction`] variant or by their catalog id
//! (`"f1"`, `"f5"`, …); domain and accuracy can be overridden per instance.

use crate::problem::Problem;
use crate::types::EvaluationError;
use ndarray::Array1;
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for catalog lookup
pub enum BenchmarkError {
    /// Error when no catalog function carries the requested id
    #[error("Unknown benchmark id: {0}.")]
    UnknownId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Catalog of test functions
pub enum TestFunction {
    /// f1: sum of squared coordinates, minimum 0 at the origin
    Sphere,
    /// f2: sphere shifted so the minimum sits at `(1, 2, …, n)`
    ShiftedSphere,
    /// f3: squared prefix sums (Schwefel 1.2 shape)
    CumulativeSquares,
    /// f5: cosine-modulated sphere with a lattice of local minima
    Rastrigin,
    /// f7: 2-dimensional cosine product under an exponential envelope
    ExponentialCosine,
    /// f10: sum of squared magnitudes plus the product of magnitudes
    AbsolutePowerProduct,
    /// f11: quartic polynomial of an index-weighted coordinate sum
    WeightedQuartic,
    /// f12: Schaffer's sixth function, 2-dimensional
    SchafferSix,
    /// f17: difference of shifted and unshifted squared sums
    ShiftedDifference,
    /// f21: second coordinate plus a heavily scaled sphere
    AxisCigar,
    /// f24: sphere scaled by the coordinate count
    ScaledSphere,
}

/// Every catalog function, in id order
pub const ALL: [TestFunction; 11] = [
    TestFunction::Sphere,
    TestFunction::ShiftedSphere,
    TestFunction::CumulativeSquares,
    TestFunction::Rastrigin,
    TestFunction::ExponentialCosine,
    TestFunction::AbsolutePowerProduct,
    TestFunction::WeightedQuartic,
    TestFunction::SchafferSix,
    TestFunction::ShiftedDifference,
    TestFunction::AxisCigar,
    TestFunction::ScaledSphere,
];

impl TestFunction {
    /// Catalog id of the function.
    pub fn id(&self) -> &'static str {
        match self {
            TestFunction::Sphere => "f1",
            TestFunction::ShiftedSphere => "f2",
            TestFunction::CumulativeSquares => "f3",
            TestFunction::Rastrigin => "f5",
            TestFunction::ExponentialCosine => "f7",
            TestFunction::AbsolutePowerProduct => "f10",
            TestFunction::WeightedQuartic => "f11",
            TestFunction::SchafferSix => "f12",
            TestFunction::ShiftedDifference => "f17",
            TestFunction::AxisCigar => "f21",
            TestFunction::ScaledSphere => "f24",
        }
    }

    /// Supported coordinate-count range, both ends inclusive.
    pub fn dimension_bounds(&self) -> (usize, usize) {
        match self {
            TestFunction::ExponentialCosine | TestFunction::SchafferSix => (2, 2),
            _ => (2, 100),
        }
    }

    /// Default domain interval.
    pub fn default_domain(&self) -> (f64, f64) {
        match self {
            TestFunction::Rastrigin => (-5.12, 5.12),
            TestFunction::ExponentialCosine
            | TestFunction::AbsolutePowerProduct
            | TestFunction::WeightedQuartic => (-10.0, 10.0),
            TestFunction::ScaledSphere => (-65.0, 65.0),
            _ => (-100.0, 100.0),
        }
    }

    /// Default convergence accuracy.
    pub fn default_accuracy(&self) -> f64 {
        match self {
            TestFunction::Sphere | TestFunction::ShiftedSphere => 1e-4,
            TestFunction::Rastrigin => 30.0,
            TestFunction::ExponentialCosine | TestFunction::AbsolutePowerProduct => 1e-6,
            TestFunction::WeightedQuartic => 1e-3,
            _ => 1e-5,
        }
    }

    /// Evaluates the function at `x`.
    ///
    /// The 2-dimensional functions and `AxisCigar` index the first two coordinates and
    /// reject shorter input; nothing rejects extra coordinates beyond the declared
    /// dimension bounds, which the solvers enforce at construction instead.
    pub fn eval(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
        match self {
            TestFunction::Sphere => Ok(x.iter().map(|v| v * v).sum()),
            TestFunction::ShiftedSphere => Ok(x
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let shifted = v - i as f64 - 1.0;
                    shifted * shifted
                })
                .sum()),
            TestFunction::CumulativeSquares => {
                let mut total = 0.0;
                let mut prefix = 0.0;
                for v in x.iter() {
                    total += prefix * prefix;
                    prefix += v;
                }
                Ok(total)
            }
            TestFunction::Rastrigin => Ok(x
                .iter()
                .map(|v| v * v - 10.0 * (2.0 * PI * v).cos() + 10.0)
                .sum()),
            TestFunction::ExponentialCosine => {
                let (x1, x2) = first_two(x)?;
                let e1 = (-x1 - PI) * (-x1 - PI);
                let e2 = (-x2 - PI) * (-x2 - PI);
                Ok(-x1.cos() * x2.cos() * (e1 - e2).exp())
            }
            TestFunction::AbsolutePowerProduct => {
                let squares: f64 = x.iter().map(|v| v.abs() * v.abs()).sum();
                let product: f64 = x.iter().map(|v| v.abs()).product();
                Ok(squares + product)
            }
            TestFunction::WeightedQuartic => {
                let weighted: f64 = x
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v * (i + 1) as f64 * 0.5)
                    .sum();
                let squared = weighted * weighted;
                Ok(-x.sum() + squared + squared * squared)
            }
            TestFunction::SchafferSix => {
                let (x1, x2) = first_two(x)?;
                let radius_sq = x1 * x1 + x2 * x2;
                let numerator = radius_sq.sqrt().sin().powi(2) - 0.5;
                let denominator = (1.0 + 0.001 * radius_sq).powi(2);
                Ok(0.5 + numerator / denominator)
            }
            TestFunction::ShiftedDifference => {
                let shifted: f64 = x.iter().map(|v| (v - 1.0) * (v - 1.0)).sum();
                let centered: f64 = x.iter().map(|v| v * v - 1.0).sum();
                Ok(shifted - centered)
            }
            TestFunction::AxisCigar => {
                let (_, x2) = first_two(x)?;
                let squares: f64 = x.iter().map(|v| v * v).sum();
                Ok(x2 + 1e6 * squares)
            }
            TestFunction::ScaledSphere => {
                let squares: f64 = x.iter().map(|v| v * v).sum();
                Ok(x.len() as f64 * squares)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Catalog function plus its effective metadata, usable as a [`Problem`]
pub struct Benchmark {
    function: TestFunction,
    domain: (f64, f64),
    accuracy: f64,
}

impl Benchmark {
    /// Creates a benchmark with the function's default domain and accuracy.
    pub fn new(function: TestFunction) -> Self {
        Self {
            function,
            domain: function.default_domain(),
            accuracy: function.default_accuracy(),
        }
    }

    /// Looks a benchmark up by its catalog id.
    pub fn from_id(id: &str) -> Result<Self, BenchmarkError> {
        ALL.iter()
            .find(|function| function.id() == id)
            .map(|function| Self::new(*function))
            .ok_or_else(|| BenchmarkError::UnknownId(id.to_string()))
    }

    /// Overrides the domain interval.
    pub fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = (lo, hi);
        self
    }

    /// Overrides the accuracy threshold.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Returns the underlying catalog function.
    pub fn function(&self) -> TestFunction {
        self.function
    }
}

impl Problem for Benchmark {
    fn objective(&self, x: &Array1<f64>) -> Result<f64, EvaluationError> {
        self.function.eval(x)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }

    fn dimension_bounds(&self) -> (usize, usize) {
        self.function.dimension_bounds()
    }
}

fn first_two(x: &Array1<f64>) -> Result<(f64, f64), EvaluationError> {
    if x.len() < 2 {
        return Err(EvaluationError::InvalidInput(format!(
            "expected at least 2 coordinates, got {}",
            x.len()
        )));
    }
    Ok((x[0], x[1]))
}
