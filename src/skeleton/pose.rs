use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

/// A sampled or blended transform for one bone: translation, rotation, scale.
///
/// The space (local or accumulated world) is whatever the producing call
/// says it is; the type itself is space-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BonePose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Decomposes an affine transform into a pose.
    ///
    /// Shear, if the matrix carries any, is lost; skeletal transforms are
    /// TRS by construction so this is lossless in practice.
    #[must_use]
    pub fn from_affine(affine: &Affine3A) -> Self {
        let (scale, rotation, position) = affine.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A full sampled pose: bone name to [`BonePose`].
#[derive(Debug, Clone, Default)]
pub struct Pose {
    bones: FxHashMap<String, BonePose>,
}

impl Pose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bones: FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher),
        }
    }

    pub fn set(&mut self, bone: impl Into<String>, pose: BonePose) {
        self.bones.insert(bone.into(), pose);
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone: &str) -> Option<&BonePose> {
        self.bones.get(bone)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, bone: &str) -> bool {
        self.bones.contains_key(bone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BonePose)> {
        self.bones.iter().map(|(name, pose)| (name.as_str(), pose))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
