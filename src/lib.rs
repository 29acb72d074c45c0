#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod errors;
pub mod scene;
pub mod skeleton;

pub use animation::{
    AnimationClip, Animator, BoneTracks, ClipRegistry, InterpolationMode, KeyframeTrack, LoopMode,
    PoseBlender, PoseSampler, Rig,
};
pub use errors::{MarrowError, Result};
pub use scene::{Node, NodeHandle, SceneGraph, Transform};
pub use skeleton::{
    BoneHierarchy, BonePose, NodeId, Pose, SkinPalette, SkinWeightBuilder, SkinnedVertex,
};
