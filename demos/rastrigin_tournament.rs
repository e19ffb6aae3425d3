/// Rastrigin function minimized with the two tournament solvers.
///
/// Rastrigin (catalog id f5) is highly multimodal: a sphere modulated by a cosine lattice
/// of local minima, global minimum 0 at the origin. The competitive solvers only ever move
/// tournament losers, so their leaders survive each generation untouched.
use anyhow::Result;
use swarmsearch::benchmarks::{Benchmark, TestFunction};
use swarmsearch::core::Solver;
use swarmsearch::cso::{CSOParams, CSO};
use swarmsearch::lcso::{LCSOParams, LCSO};

fn main() -> Result<()> {
    let problem = Benchmark::new(TestFunction::Rastrigin);

    let params = CSOParams::default().with_swarms(4).with_velocity_magnitude(0.1);
    let mut cso = CSO::new(problem.clone(), 40, 5, params)?;
    let best = cso.evaluate(Some(200))?;
    println!("CSO (pairwise tournaments):");
    println!("  best value {best:.6e} at {}", cso.best_position());

    let params = LCSOParams::default().with_swarms(4).with_velocity_magnitude(0.1);
    let mut lcso = LCSO::new(problem, 42, 5, params)?;
    let best = lcso.evaluate(Some(200))?;
    println!("LCSO (three-way tournaments):");
    println!("  best value {best:.6e} at {}", lcso.best_position());

    Ok(())
}
