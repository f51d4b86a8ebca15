pub mod basis;
pub mod catenary;

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 4D point type.
pub type Point4 = nalgebra::Point4<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4D vector type.
pub type Vector4 = nalgebra::Vector4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Rejects NaN and infinite scalars.
pub(crate) fn ensure_finite(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { parameter, value }.into())
    }
}

/// Rejects vectors with any NaN or infinite component.
pub(crate) fn ensure_finite_vector<const N: usize>(
    parameter: &'static str,
    v: &nalgebra::SVector<f64, N>,
) -> Result<()> {
    match v.iter().find(|c| !c.is_finite()) {
        Some(&value) => Err(GeometryError::NonFinite { parameter, value }.into()),
        None => Ok(()),
    }
}

/// Rejects arc lengths that are not finite and strictly positive.
pub(crate) fn ensure_arc_length(value: f64) -> Result<f64> {
    let value = ensure_finite("arc_length", value)?;
    if value <= 0.0 {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: "arc_length",
            value,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into());
    }
    Ok(value)
}
