//! Numerical building blocks.
//!
//! - [`interpolators`]: Log-linear discount factor interpolation
//! - [`linalg`]: Dense linear solves for small systems
//! - [`solvers`]: Nonlinear least-squares and constrained solvers

pub mod interpolators;
pub mod linalg;
pub mod solvers;
