//! Common utilities and types for the trajectory spoofer

use std::f64::consts::TAU;

/// Common types used across the codebase
pub mod types {
    /// A planar position
    pub type Point2D = nalgebra::Point2<f64>;

    /// Heading stored as a 2D quaternion `(real, imag)`
    pub type Quaternion2D = (f64, f64);
}

use self::types::Quaternion2D;

/// Wrap an angle into `[0, 2pi)`
pub fn normalize_heading(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Encode a yaw angle as the half-angle complex number used by trajectory messages
pub fn to_quaternion_2d(yaw: f64) -> Quaternion2D {
    let half = yaw / 2.0;
    (half.cos(), half.sin())
}

/// Recover a yaw angle in `[0, 2pi)` from a 2D quaternion
pub fn from_quaternion_2d(quat: Quaternion2D) -> f64 {
    let (real, imag) = quat;
    let sin_y = 2.0 * real * imag;
    let cos_y = 1.0 - 2.0 * imag * imag;
    normalize_heading(sin_y.atan2(cos_y))
}
