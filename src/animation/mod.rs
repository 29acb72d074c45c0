//! Clip playback: keyframe tracks, clips, sampling, blending, and the
//! animator state machine.

mod values;
pub mod tracks;
pub mod clip;
pub mod registry;
pub mod sampler;
pub mod blender;
pub mod animator;
pub mod binding;

pub use animator::{Animator, LoopMode};
pub use binding::{BoneBinding, Rig};
pub use blender::PoseBlender;
pub use clip::{AnimationClip, BoneTracks, DEFAULT_TICKS_PER_SECOND};
pub use registry::ClipRegistry;
pub use sampler::{PoseSampler, SamplerCursors};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
