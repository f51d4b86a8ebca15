pub mod root;
mod settings;
mod to_point;

pub use settings::{
    SolverSettings, DEFAULT_BISECTION_STEPS, DEFAULT_BRACKET_STEPS, DEFAULT_LINE_SEGMENT_RATIO,
    DEFAULT_ROOT_TOLERANCE, DEFAULT_VERTICAL_TOLERANCE,
};
pub use to_point::{CatenaryToPoint, CatenaryToPoint2, CatenaryToPoint3};

use crate::math::catenary::ScalarCatenaryParams;

/// Cached parameters of a solved catenary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatenaryParams {
    /// Shape parameter and offset placing the curve through both endpoints.
    pub curve: ScalarCatenaryParams,
    /// Arc length from the catenary's apex to the local origin.
    pub arc_length_offset: f64,
}

/// Outcome of solving a catenary towards a point.
///
/// A solver starts in `Unknown` and moves to one of the other variants the
/// first time it is solved. Changing its inputs replaces the whole state
/// with `Unknown` again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SolveState {
    #[default]
    Unknown,
    /// A true catenary through both endpoints.
    Catenary(CatenaryParams),
    /// The arc length is (nearly) taut; the curve is the straight chord.
    LineSegment,
    /// The target hangs (nearly) straight below; two vertical runs meeting
    /// at the bottom.
    LinearVertical,
}

impl SolveState {
    /// The classification of a solved state, or `None` while `Unknown`.
    #[must_use]
    pub fn classification(&self) -> Option<Classification> {
        match self {
            Self::Unknown => None,
            Self::Catenary(_) => Some(Classification::Catenary),
            Self::LineSegment => Some(Classification::LineSegment),
            Self::LinearVertical => Some(Classification::LinearVertical),
        }
    }
}

/// Which shape a solved curve takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Catenary,
    LineSegment,
    LinearVertical,
}
