use glam::Affine3A;
use rustc_hash::FxHashMap;

use crate::animation::clip::{AnimationClip, BoneTracks};
use crate::animation::tracks::KeyframeCursor;
use crate::errors::{MarrowError, Result};
use crate::skeleton::{BoneHierarchy, BonePose, Pose};

/// Cursors for the three channels of one bone.
#[derive(Debug, Clone, Default)]
pub struct ChannelCursors {
    pub translation: KeyframeCursor,
    pub rotation: KeyframeCursor,
    pub scale: KeyframeCursor,
}

/// Per-playback cursor state for a whole clip, keyed by bone name.
///
/// Owned by the playback side so the clip itself stays immutable and
/// shareable; discard (or [`reset`]) when switching clips.
///
/// [`reset`]: SamplerCursors::reset
#[derive(Debug, Clone, Default)]
pub struct SamplerCursors {
    cursors: FxHashMap<String, ChannelCursors>,
}

impl SamplerCursors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cursors.clear();
    }

    fn channels(&mut self, bone: &str) -> &mut ChannelCursors {
        self.cursors.entry(bone.to_string()).or_default()
    }
}

/// Samples an [`AnimationClip`] over a [`BoneHierarchy`] into world-space
/// poses.
///
/// Time flows: seconds → ticks (via the clip's tick rate, defaulting when
/// the importer left it at 0) → wrapped into the clip's duration for looping
/// playback. Bones the clip does not animate contribute their bind
/// transform; bones the clip animates but the hierarchy lacks are skipped
/// with a warning.
pub struct PoseSampler;

impl PoseSampler {
    /// Samples world-space poses at `time_seconds`, wrapping for looping
    /// playback (`sample(duration + x) == sample(x)`).
    pub fn sample(
        clip: &AnimationClip,
        hierarchy: &BoneHierarchy,
        time_seconds: f64,
    ) -> Result<Pose> {
        let ticks = wrap_ticks(clip, time_seconds)?;
        Ok(sample_world(clip, hierarchy, ticks, None))
    }

    /// As [`sample`], threading per-track cursors for O(1) sequential
    /// playback.
    ///
    /// [`sample`]: PoseSampler::sample
    pub fn sample_with_cursors(
        clip: &AnimationClip,
        hierarchy: &BoneHierarchy,
        time_seconds: f64,
        cursors: &mut SamplerCursors,
    ) -> Result<Pose> {
        let ticks = wrap_ticks(clip, time_seconds)?;
        Ok(sample_world(clip, hierarchy, ticks, Some(cursors)))
    }

    /// Samples world-space poses at an unwrapped tick value.
    ///
    /// Past the last key every track clamps, so sampling at
    /// `clip.duration_ticks` yields the clip's final keyed pose. This is
    /// the hold-at-end path for non-looping playback.
    pub fn sample_at_ticks(
        clip: &AnimationClip,
        hierarchy: &BoneHierarchy,
        ticks: f64,
    ) -> Result<Pose> {
        check_duration(clip)?;
        Ok(sample_world(clip, hierarchy, ticks, None))
    }

    /// Samples local-space poses at `time_seconds` (no hierarchy
    /// accumulation): the bind pose where the clip has no tracks, the
    /// interpolated channels where it does.
    pub fn sample_local(
        clip: &AnimationClip,
        hierarchy: &BoneHierarchy,
        time_seconds: f64,
    ) -> Result<Pose> {
        let ticks = wrap_ticks(clip, time_seconds)?;
        warn_unknown_bones(clip, hierarchy);

        let mut pose = Pose::with_capacity(hierarchy.len());
        for node in hierarchy.nodes() {
            let local = match clip.bone_tracks(&node.name) {
                Some(tracks) => sample_channels(tracks, ticks, None),
                None => BonePose::from_affine(&node.local_bind),
            };
            pose.set(node.name.clone(), local);
        }
        Ok(pose)
    }
}

fn check_duration(clip: &AnimationClip) -> Result<()> {
    if clip.duration_ticks <= 0.0 {
        return Err(MarrowError::InvalidClip {
            clip: clip.name.clone(),
            reason: format!("cannot sample a clip of duration {}", clip.duration_ticks),
        });
    }
    Ok(())
}

fn wrap_ticks(clip: &AnimationClip, time_seconds: f64) -> Result<f64> {
    check_duration(clip)?;
    Ok(clip.seconds_to_ticks(time_seconds).rem_euclid(clip.duration_ticks))
}

fn warn_unknown_bones(clip: &AnimationClip, hierarchy: &BoneHierarchy) {
    for (bone, _) in clip.tracks() {
        if hierarchy.find(bone).is_none() {
            log::warn!(
                "clip '{}' animates bone '{bone}' which is not in the hierarchy; ignoring",
                clip.name
            );
        }
    }
}

fn sample_channels(
    tracks: &BoneTracks,
    ticks: f64,
    cursors: Option<&mut ChannelCursors>,
) -> BonePose {
    match cursors {
        Some(c) => BonePose::new(
            tracks.translation.sample_with_cursor(ticks, &mut c.translation),
            tracks.rotation.sample_with_cursor(ticks, &mut c.rotation),
            tracks.scale.sample_with_cursor(ticks, &mut c.scale),
        ),
        None => BonePose::new(
            tracks.translation.sample(ticks),
            tracks.rotation.sample(ticks),
            tracks.scale.sample(ticks),
        ),
    }
}

fn sample_world(
    clip: &AnimationClip,
    hierarchy: &BoneHierarchy,
    ticks: f64,
    mut cursors: Option<&mut SamplerCursors>,
) -> Pose {
    warn_unknown_bones(clip, hierarchy);

    // Arena order is parents-first, so one forward pass accumulates world
    // transforms without recursion.
    let mut world: Vec<Affine3A> = Vec::with_capacity(hierarchy.len());
    for node in hierarchy.nodes() {
        let local = match clip.bone_tracks(&node.name) {
            Some(tracks) => {
                let channel_cursors = cursors.as_mut().map(|c| c.channels(&node.name));
                sample_channels(tracks, ticks, channel_cursors).to_affine()
            }
            None => node.local_bind,
        };

        let matrix = match node.parent {
            Some(parent) => world[parent.index()] * local,
            None => local,
        };
        world.push(matrix);
    }

    let mut pose = Pose::with_capacity(hierarchy.len());
    for (node, matrix) in hierarchy.nodes().iter().zip(&world) {
        pose.set(node.name.clone(), BonePose::from_affine(matrix));
    }
    pose
}
