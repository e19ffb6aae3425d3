/// Sphere function minimized with both PSO velocity-update rules.
///
/// The sphere (catalog id f1) is the simplest unimodal benchmark: the sum of squared
/// coordinates, with its global minimum 0 at the origin. Both runs use the convergence
/// mode, stopping once the best value settles within the accuracy threshold.
use anyhow::Result;
use swarmsearch::benchmarks::{Benchmark, TestFunction};
use swarmsearch::core::Solver;
use swarmsearch::pso::{PSOParams, UpdateRule, PSO};

fn main() -> Result<()> {
    let problem = Benchmark::new(TestFunction::Sphere)
        .with_domain(-10.0, 10.0)
        .with_accuracy(0.1);

    let mut solver = PSO::new(problem.clone(), 25, 2, PSOParams::default())?;
    let best = solver.evaluate(None)?;
    println!("local-global rule:");
    println!("  best value {best:.6e} at {}", solver.best_position());
    println!("{}", solver.run_log());

    let params = PSOParams::default().with_rule(UpdateRule::NeighborhoodAverage);
    let mut solver = PSO::new(problem, 25, 2, params)?;
    let best = solver.evaluate(None)?;
    println!("neighborhood-average rule:");
    println!("  best value {best:.6e} at {}", solver.best_position());
    println!("{}", solver.run_log());

    Ok(())
}
