pub mod error;
pub mod geometry;
pub mod math;
pub mod solver;
pub mod tessellation;

pub use error::{CatenaryError, Result};
pub use geometry::{CatenaryCurve, CatenaryCurve2, CatenaryCurve3, CatenaryCurve4};
pub use solver::{CatenaryToPoint, Classification, SolveState, SolverSettings};
