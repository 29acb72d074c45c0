//! Skeleton data: the bind-pose bone hierarchy, pose types, skin-weight
//! building, and the per-frame skin-matrix palette.

mod hierarchy;
mod palette;
mod pose;
mod skinning;

pub use hierarchy::{BoneHierarchy, HierarchyNode, NodeId};
pub use palette::{MAX_PALETTE_BONES, SkinPalette};
pub use pose::{BonePose, Pose};
pub use skinning::{
    MAX_BONE_INFLUENCES, SkinWeightBuilder, SkinWeights, SkinnedVertex, VertexInfluences,
    WEIGHT_EPSILON,
};
