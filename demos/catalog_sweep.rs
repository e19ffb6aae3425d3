/// Convergence-mode sweep of the whole benchmark catalog with one solver.
///
/// Runs GLPSO over every catalog function at its smallest supported dimension and prints
/// the terminating iteration and final best value per function.
use anyhow::Result;
use swarmsearch::benchmarks::{Benchmark, ALL};
use swarmsearch::core::Solver;
use swarmsearch::glpso::{GLPSOParams, GLPSO};

fn main() -> Result<()> {
    println!("{:<5} {:>10} {:>16}", "id", "iterations", "best value");
    for function in ALL {
        let problem = Benchmark::new(function);
        let (min_dim, _) = function.dimension_bounds();
        let mut solver = GLPSO::new(problem, 30, min_dim, GLPSOParams::default())?;
        let best = solver.evaluate(None)?;
        let log = solver.run_log();
        println!("{:<5} {:>10} {:>16.6e}", function.id(), log.iterations, best);
    }
    Ok(())
}
