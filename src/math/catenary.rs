//! Closed-form math for the canonical catenary `y = a * cosh(x / a)`.
//!
//! Everything here lives in the catenary's own frame: the apex sits at
//! `(0, a)` and arc length is measured from the apex, positive towards `+x`.
//! No function iterates or fails; callers guarantee `a > 0`.

use super::Vector2;

/// Height of the canonical catenary at `x`.
#[must_use]
pub fn eval(x: f64, a: f64) -> f64 {
    a * (x / a).cosh()
}

/// Slope `dy/dx` of the canonical catenary at `x`.
#[must_use]
pub fn slope(x: f64, a: f64) -> f64 {
    (x / a).sinh()
}

/// Signed arc length from the apex to `x`.
#[must_use]
pub fn arc_length(x: f64, a: f64) -> f64 {
    a * (x / a).sinh()
}

/// Horizontal position reached after travelling the signed arc length `s`
/// from the apex. Inverse of [`arc_length`].
#[must_use]
pub fn inverse_arc_length(s: f64, a: f64) -> f64 {
    a * (s / a).asinh()
}

/// The `order`-th derivative of the position `(x, y)` with respect to arc
/// length, evaluated at the signed arc length `s` from the apex.
///
/// Order 0 is the position itself. Orders 1 to 4 use closed forms; higher
/// orders fall back to [`derivative_by_recurrence`]. The first derivative is
/// always a unit vector.
#[must_use]
pub fn derivative_by_arc_length(s: f64, a: f64, order: u32) -> Vector2 {
    let q = a.hypot(s);
    match order {
        0 => Vector2::new(inverse_arc_length(s, a), q),
        1 => Vector2::new(a, s) / q,
        2 => Vector2::new(-a * s, a * a) / q.powi(3),
        3 => Vector2::new(a * (2.0 * s * s - a * a), -3.0 * a * a * s) / q.powi(5),
        4 => {
            Vector2::new(
                3.0 * a * s * (3.0 * a * a - 2.0 * s * s),
                3.0 * a * a * (4.0 * s * s - a * a),
            ) / q.powi(7)
        }
        _ => derivative_by_recurrence(s, a, order),
    }
}

/// Arc-length derivative of any order `>= 1` through the derivatives of
/// `g(s) = (a² + s²)^(-1/2)`.
///
/// With `dx/ds = a·g` and `dy/ds = s·g`, the n-th derivatives are
/// `a·g⁽ⁿ⁻¹⁾` and `s·g⁽ⁿ⁻¹⁾ + (n-1)·g⁽ⁿ⁻²⁾`.
#[must_use]
pub fn derivative_by_recurrence(s: f64, a: f64, order: u32) -> Vector2 {
    if order == 0 {
        return derivative_by_arc_length(s, a, 0);
    }
    let n = order as usize;
    let g = ReciprocalRootDerivatives::up_to(n - 1, s, a);
    let dx = a * g[n - 1];
    let dy = if n == 1 {
        s * g[0]
    } else {
        s * g[n - 1] + f64::from(order - 1) * g[n - 2]
    };
    Vector2::new(dx, dy)
}

/// Derivatives of `(a² + s²)^(-1/2)` written as `P_k(s) · (a² + s²)^(-(2k+1)/2)`,
/// with `P_0 = 1` and `P_{k+1} = P_k'·(a² + s²) − (2k+1)·s·P_k`.
struct ReciprocalRootDerivatives;

impl ReciprocalRootDerivatives {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn up_to(k_max: usize, s: f64, a: f64) -> Vec<f64> {
        let a_squared = a * a;
        let radius = a.hypot(s);
        let mut poly = vec![1.0];
        let mut values = Vec::with_capacity(k_max + 1);

        for k in 0..=k_max {
            let numerator = horner(&poly, s);
            values.push(numerator * radius.powi(-(2 * k as i32 + 1)));

            // P' * (a² + s²)
            let mut next = vec![0.0; poly.len() + 1];
            for (power, &coefficient) in poly.iter().enumerate().skip(1) {
                #[allow(clippy::cast_precision_loss)]
                let derived = coefficient * power as f64;
                next[power - 1] += a_squared * derived;
                next[power + 1] += derived;
            }
            // - (2k+1) * s * P
            #[allow(clippy::cast_precision_loss)]
            let factor = (2 * k + 1) as f64;
            for (power, &coefficient) in poly.iter().enumerate() {
                next[power + 1] -= factor * coefficient;
            }
            poly = next;
        }
        values
    }
}

fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// A catenary shifted so that `y = a·cosh((x − delta_x)/a) + delta_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarCatenaryParams {
    /// Shape parameter (always positive).
    pub a: f64,
    /// Horizontal position of the apex.
    pub delta_x: f64,
    /// Vertical shift applied to the canonical curve.
    pub delta_y: f64,
}

impl ScalarCatenaryParams {
    /// The catenary with shape `a` passing through the origin and `(x, y)`.
    ///
    /// `x` must be positive.
    #[must_use]
    pub fn through_origin_and(a: f64, x: f64, y: f64) -> Self {
        let delta_x = 0.5 * x - a * (y / (2.0 * a * (x / (2.0 * a)).sinh())).asinh();
        let delta_y = -eval(delta_x, a);
        Self {
            a,
            delta_x,
            delta_y,
        }
    }

    /// Height of the shifted curve at `x`.
    #[must_use]
    pub fn height(&self, x: f64) -> f64 {
        eval(x - self.delta_x, self.a) + self.delta_y
    }

    /// Point reached after travelling the signed arc length `s` from the apex.
    #[must_use]
    pub fn point_at_apex_arc_length(&self, s: f64) -> Vector2 {
        let x = inverse_arc_length(s, self.a) + self.delta_x;
        Vector2::new(x, self.height(x))
    }

    /// Returns `true` when every parameter is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.delta_x.is_finite() && self.delta_y.is_finite()
    }
}
