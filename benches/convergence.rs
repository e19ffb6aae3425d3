/// Fixed-iteration comparison of the five solver variants on the sphere function.
///
/// Each target constructs a fresh solver and runs 100 generations over 10 dimensions, so
/// the measured cost covers initialization plus the per-generation update loops.
use anyhow::Result;
use criterion::{criterion_group, criterion_main, Criterion};
use swarmsearch::bat::{BatParams, BatSearch};
use swarmsearch::benchmarks::{Benchmark, TestFunction};
use swarmsearch::core::Solver;
use swarmsearch::cso::{CSOParams, CSO};
use swarmsearch::glpso::{GLPSOParams, GLPSO};
use swarmsearch::lcso::{LCSOParams, LCSO};
use swarmsearch::pso::{PSOParams, UpdateRule, PSO};

const POPULATION: usize = 40;
const DIMENSION: usize = 10;
const GENERATIONS: usize = 100;

fn sphere() -> Benchmark {
    Benchmark::new(TestFunction::Sphere)
}

fn pso_local_global() -> Result<f64> {
    let mut solver = PSO::new(sphere(), POPULATION, DIMENSION, PSOParams::default())?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn pso_neighborhood_average() -> Result<f64> {
    let params = PSOParams::default().with_rule(UpdateRule::NeighborhoodAverage);
    let mut solver = PSO::new(sphere(), POPULATION, DIMENSION, params)?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn glpso() -> Result<f64> {
    let mut solver = GLPSO::new(sphere(), POPULATION, DIMENSION, GLPSOParams::default())?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn bat() -> Result<f64> {
    let mut solver = BatSearch::new(sphere(), POPULATION, DIMENSION, BatParams::default())?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn cso() -> Result<f64> {
    let params = CSOParams::default().with_swarms(4);
    let mut solver = CSO::new(sphere(), POPULATION, DIMENSION, params)?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn lcso() -> Result<f64> {
    let params = LCSOParams::default().with_swarms(4);
    let mut solver = LCSO::new(sphere(), POPULATION, DIMENSION, params)?;
    Ok(solver.evaluate(Some(GENERATIONS))?)
}

fn run_convergence(c: &mut Criterion) {
    c.bench_function("pso_local_global", |b| b.iter(pso_local_global));
    c.bench_function("pso_neighborhood_average", |b| {
        b.iter(pso_neighborhood_average)
    });
    c.bench_function("glpso", |b| b.iter(glpso));
    c.bench_function("bat", |b| b.iter(bat));
    c.bench_function("cso", |b| b.iter(cso));
    c.bench_function("lcso", |b| b.iter(lcso));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = run_convergence
}
criterion_main!(benches);
