#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
pub mod bat;
pub mod benchmarks;
pub mod bounds;
pub mod core;
pub mod cso;
pub mod glpso;
pub mod lcso;
pub mod levy;
pub(crate) mod multiswarm;
pub mod problem;
pub mod pso;
pub mod types;
