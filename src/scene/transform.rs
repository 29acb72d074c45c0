use glam::{Affine3A, Mat4, Quat, Vec3};

use crate::skeleton::BonePose;

/// TRS transform component with cached local/world matrices and a
/// shadow-state dirty check.
///
/// The public `position`/`rotation`/`scale` fields are the node's local
/// (authored) values. The world matrix is produced by the scene-graph
/// refresh pass, or written directly through [`set_world_pose`] when a bone
/// is driven by an [`Animator`](crate::animation::Animator).
///
/// [`set_world_pose`]: Transform::set_world_pose
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // Shadow copies for the dirty check.
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_pose(pose: BonePose) -> Self {
        let mut transform = Self::new();
        transform.set_pose(pose);
        transform
    }

    /// Recomputes the local matrix if any TRS field changed since the last
    /// call. Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = Affine3A::from_scale_rotation_translation(
                self.scale,
                self.rotation,
                self.position,
            );

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// The local TRS as a [`BonePose`].
    #[must_use]
    pub fn pose(&self) -> BonePose {
        BonePose::new(self.position, self.rotation, self.scale)
    }

    /// Overwrites the local TRS.
    pub fn set_pose(&mut self, pose: BonePose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.scale = pose.scale;
    }

    /// World-space sink for animation: overwrites the cached world matrix
    /// with the given world TRS, leaving the local fields untouched.
    pub fn set_world_pose(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.world_matrix = Affine3A::from_scale_rotation_translation(scale, rotation, position);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// World matrix as `Mat4` for consumers that upload it.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    pub(crate) fn set_world_matrix(&mut self, matrix: Affine3A) {
        self.world_matrix = matrix;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
