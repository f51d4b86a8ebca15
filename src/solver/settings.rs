/// Arc length at most this multiple of the chord length is treated as taut.
pub const DEFAULT_LINE_SEGMENT_RATIO: f64 = 1.00005;

/// Horizontal offsets below this are treated as a chain hanging straight down.
pub const DEFAULT_VERTICAL_TOLERANCE: f64 = 0.001;

/// Power-of-two expansions tried while bracketing the shape parameter.
pub const DEFAULT_BRACKET_STEPS: u32 = 12;

/// Bisection iterations run on the bracket. Fixed; there is no early exit.
pub const DEFAULT_BISECTION_STEPS: u32 = 14;

/// Residual magnitude at which the initial guess is accepted outright.
pub const DEFAULT_ROOT_TOLERANCE: f64 = 1e-10;

/// Tuning knobs for [`CatenaryToPoint`](super::CatenaryToPoint).
///
/// The defaults are empirical. Raising the step counts trades a little
/// speed for accuracy or for reach on extreme sag ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// `arc_length <= |target| * line_segment_ratio` classifies as a line segment.
    pub line_segment_ratio: f64,
    /// Horizontal distance below which the chain is treated as vertical.
    pub vertical_tolerance: f64,
    /// Maximum number of doublings (or halvings) of the initial guess.
    pub bracket_steps: u32,
    /// Number of bisection iterations.
    pub bisection_steps: u32,
    /// Accept the initial guess when its residual is within this bound.
    pub root_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            line_segment_ratio: DEFAULT_LINE_SEGMENT_RATIO,
            vertical_tolerance: DEFAULT_VERTICAL_TOLERANCE,
            bracket_steps: DEFAULT_BRACKET_STEPS,
            bisection_steps: DEFAULT_BISECTION_STEPS,
            root_tolerance: DEFAULT_ROOT_TOLERANCE,
        }
    }
}
