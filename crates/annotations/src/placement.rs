//! Geographic placement: turn an (origin, target) pair into a local transform.
//!
//! The scene is right-handed and Y-up, with the session's initial forward
//! (`-Z`) aligned to true north, so `+X` is east. A target is placed on the
//! horizontal plane at its bearing, pushed out to its clamped distance, and
//! rotated so its own forward axis points away from the origin.

use foundation::math::{GeoCoordinate, Mat4, Vec3, distance_m, finite_or, initial_bearing_rad};

use crate::config::DistanceBounds;

/// Result of placing one target relative to an origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    /// Great-circle distance before clamping.
    pub true_distance_m: f64,
    /// Distance actually used, clamped into the configured bounds.
    pub distance_m: f64,
    /// Clockwise from north, in `[0, 2π)`.
    pub bearing_rad: f64,
    pub transform: Mat4,
}

/// Rotation about the vertical axis that turns `-Z` (north) clockwise, seen
/// from above, by `bearing_rad`.
pub fn bearing_rotation(bearing_rad: f64) -> Mat4 {
    // from_rotation_y is counter-clockwise; its inverse turns the other way.
    Mat4::from_rotation_y(bearing_rad).transpose()
}

/// Placement transform in the origin's local frame.
pub fn local_placement(distance_m: f64, bearing_rad: f64) -> Mat4 {
    bearing_rotation(bearing_rad) * Mat4::from_translation(Vec3::new(0.0, 0.0, -distance_m))
}

/// Place `target` relative to `origin`, expressed in `reference`'s frame.
///
/// `reference` is the identity for world-fixed placement.
pub fn plan_placement(
    reference: &Mat4,
    origin: GeoCoordinate,
    target: GeoCoordinate,
    bounds: DistanceBounds,
) -> Placement {
    let true_distance_m = finite_or(distance_m(origin, target), 0.0);
    let distance_m = bounds.clamp(true_distance_m);
    let bearing_rad = if true_distance_m > 0.0 {
        initial_bearing_rad(origin, target)
    } else {
        0.0
    };

    Placement {
        true_distance_m,
        distance_m,
        bearing_rad,
        transform: *reference * local_placement(distance_m, bearing_rad),
    }
}

/// World-fixed transform for an anchor at `target`, seen from `origin`.
pub fn compute_transform(
    origin: GeoCoordinate,
    target: GeoCoordinate,
    bounds: DistanceBounds,
) -> Mat4 {
    plan_placement(&Mat4::IDENTITY, origin, target, bounds).transform
}
