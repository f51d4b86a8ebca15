pub mod curve;
pub mod embedding;

pub use curve::{CatenaryCurve, CatenaryCurve2, CatenaryCurve3, CatenaryCurve4};
pub use curve::{Curve, CurveDomain};
pub use embedding::PlaneEmbedding;
