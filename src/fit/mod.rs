//! Fitting functions, the least-squares engine and its result.

pub mod functions;
pub mod result;
pub mod solver;

pub use functions::{FitFunction, FunctionKind};
pub use result::FitResult;
pub use solver::fit_to_data;
