use glam::{Quat, Vec3};

use crate::animation::values::Interpolatable;
use crate::skeleton::{BonePose, Pose};

/// Linear cross-fade between two sampled poses.
pub struct PoseBlender;

impl PoseBlender {
    /// Blends `from` toward `to` by `weight` (clamped to `[0, 1]`):
    /// positions and scales lerp, rotations slerp along the shortest arc.
    ///
    /// Output covers exactly the bones of `from`. A bone missing from `to`
    /// blends toward its own `from` pose, i.e. it holds still. This is what
    /// makes the blend asymmetric for clips with mismatched bone coverage:
    /// swapping the fill rule would make uncovered bones snap instead of
    /// hold.
    #[must_use]
    pub fn blend(from: &Pose, to: &Pose, weight: f32) -> Pose {
        let w = weight.clamp(0.0, 1.0);

        let mut out = Pose::with_capacity(from.len());
        for (bone, a) in from.iter() {
            let b = to.get(bone).unwrap_or(a);
            out.set(
                bone,
                BonePose::new(
                    Vec3::interpolate_linear(a.position, b.position, w),
                    Quat::interpolate_linear(a.rotation, b.rotation, w),
                    Vec3::interpolate_linear(a.scale, b.scale, w),
                ),
            );
        }
        out
    }
}
