use glam::{Quat, Vec3};

/// Value types a [`KeyframeTrack`](crate::animation::KeyframeTrack) can carry.
///
/// Linear interpolation means different things per channel type: vectors use
/// a component-wise lerp, quaternions use a spherical lerp along the shortest
/// arc. Routing both through one trait keeps the track sampler generic.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    // glam's slerp negates the end quaternion when the dot product is
    // negative, so this always follows the shortest arc.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}
