//! Root search for monotonically decreasing scalar functions on `(0, ∞)`.

/// An interval `[low, high]` with `f(low) >= 0 >= f(high)` for a decreasing `f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
}

/// Brackets the root of a decreasing `f` by scaling a positive `guess` with
/// powers of two.
///
/// A positive residual at the guess means the root lies above it, so the
/// guess is doubled; a negative one halves it. The search stops at the
/// first sign change, at most `steps` trials away. When `|f(guess)|` is
/// within `tolerance` the guess is returned as a zero-width bracket.
///
/// Returns `None` if the guess is not a positive finite number, the residual
/// there is NaN, or no sign change is found.
#[must_use]
pub fn bracket_decreasing<F>(f: F, guess: f64, steps: u32, tolerance: f64) -> Option<Bracket>
where
    F: Fn(f64) -> f64,
{
    if !(guess.is_finite() && guess > 0.0) {
        return None;
    }
    let at_guess = f(guess);
    if at_guess.is_nan() {
        return None;
    }
    if at_guess.abs() <= tolerance {
        return Some(Bracket {
            low: guess,
            high: guess,
        });
    }

    let grow = at_guess > 0.0;
    let mut previous = guess;
    for _ in 0..steps {
        let trial = if grow { previous * 2.0 } else { previous * 0.5 };
        let value = f(trial);
        if grow && value <= 0.0 {
            return Some(Bracket {
                low: previous,
                high: trial,
            });
        }
        if !grow && value >= 0.0 {
            return Some(Bracket {
                low: trial,
                high: previous,
            });
        }
        previous = trial;
    }
    None
}

/// Runs exactly `iterations` bisection steps on `bracket` and returns the
/// midpoint of the final interval.
///
/// `f` must be decreasing across the bracket. A midpoint with a positive
/// residual replaces `low`, anything else replaces `high`, so a root sitting
/// exactly on either end is kept inside the interval.
#[must_use]
pub fn bisect<F>(f: F, bracket: Bracket, iterations: u32) -> f64
where
    F: Fn(f64) -> f64,
{
    let Bracket { mut low, mut high } = bracket;
    for _ in 0..iterations {
        let mid = 0.5 * (low + high);
        if f(mid) > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }
    0.5 * (low + high)
}
