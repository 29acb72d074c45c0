use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::tracks::KeyframeTrack;
use crate::errors::{MarrowError, Result};

/// Tick rate assumed for clips whose importer left `ticks_per_second` at 0.
pub const DEFAULT_TICKS_PER_SECOND: f64 = 60.0;

/// The three keyframed channels of one bone.
///
/// Importers always emit at least one key per channel; a constant channel is
/// a single key (see [`KeyframeTrack::constant`]).
#[derive(Debug, Clone)]
pub struct BoneTracks {
    pub translation: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
    pub scale: KeyframeTrack<Vec3>,
}

impl BoneTracks {
    #[must_use]
    pub fn new(
        translation: KeyframeTrack<Vec3>,
        rotation: KeyframeTrack<Quat>,
        scale: KeyframeTrack<Vec3>,
    ) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// A bone that holds one pose for the whole clip.
    #[must_use]
    pub fn constant(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation: KeyframeTrack::constant(translation),
            rotation: KeyframeTrack::constant(rotation),
            scale: KeyframeTrack::constant(scale),
        }
    }

    fn validate(&self, clip: &str, bone: &str) -> Result<()> {
        validate_channel(clip, bone, "translation", &self.translation.times, self.translation.values.len())?;
        validate_channel(clip, bone, "rotation", &self.rotation.times, self.rotation.values.len())?;
        validate_channel(clip, bone, "scale", &self.scale.times, self.scale.values.len())?;
        Ok(())
    }
}

fn validate_channel(
    clip: &str,
    bone: &str,
    channel: &str,
    times: &[f64],
    value_count: usize,
) -> Result<()> {
    let malformed = |reason: String| MarrowError::InvalidClip {
        clip: clip.to_string(),
        reason,
    };

    if times.is_empty() {
        return Err(malformed(format!("bone '{bone}' {channel} channel has no keyframes")));
    }
    if times.len() != value_count {
        return Err(malformed(format!(
            "bone '{bone}' {channel} channel has {} times but {value_count} values",
            times.len()
        )));
    }
    if times.windows(2).any(|w| w[1] < w[0]) {
        return Err(malformed(format!(
            "bone '{bone}' {channel} channel has decreasing key times"
        )));
    }
    Ok(())
}

/// A named, immutable animation asset: per-bone keyframe channels plus the
/// clip's own time base.
///
/// Clips are loaded once and shared read-only across every [`Animator`]
/// playing them (wrap in `Arc`, or store in a
/// [`ClipRegistry`](crate::animation::ClipRegistry) which does so for you).
///
/// [`Animator`]: crate::animation::Animator
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in ticks. Always positive; validated at construction.
    pub duration_ticks: f64,
    /// Tick rate. 0 is accepted and treated as [`DEFAULT_TICKS_PER_SECOND`].
    pub ticks_per_second: f64,
    tracks: FxHashMap<String, BoneTracks>,
}

impl AnimationClip {
    /// Builds and validates a clip.
    ///
    /// # Errors
    ///
    /// [`MarrowError::InvalidClip`] when the duration is not positive or any
    /// channel is empty, length-mismatched, or has decreasing key times.
    pub fn new(
        name: impl Into<String>,
        duration_ticks: f64,
        ticks_per_second: f64,
        tracks: FxHashMap<String, BoneTracks>,
    ) -> Result<Self> {
        let name = name.into();

        if duration_ticks <= 0.0 {
            return Err(MarrowError::InvalidClip {
                clip: name,
                reason: format!("duration must be positive (got {duration_ticks} ticks)"),
            });
        }
        if ticks_per_second < 0.0 {
            return Err(MarrowError::InvalidClip {
                clip: name,
                reason: format!("ticks_per_second must not be negative (got {ticks_per_second})"),
            });
        }
        for (bone, bone_tracks) in &tracks {
            bone_tracks.validate(&name, bone)?;
        }

        Ok(Self {
            name,
            duration_ticks,
            ticks_per_second,
            tracks,
        })
    }

    /// Tick rate with the zero-means-default rule applied.
    #[inline]
    #[must_use]
    pub fn effective_ticks_per_second(&self) -> f64 {
        if self.ticks_per_second == 0.0 {
            DEFAULT_TICKS_PER_SECOND
        } else {
            self.ticks_per_second
        }
    }

    /// Clip length in seconds.
    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ticks / self.effective_ticks_per_second()
    }

    /// Converts a playback time in seconds to clip ticks (unwrapped).
    #[inline]
    #[must_use]
    pub fn seconds_to_ticks(&self, time_seconds: f64) -> f64 {
        time_seconds * self.effective_ticks_per_second()
    }

    /// The channels for `bone`, if this clip animates it.
    #[inline]
    #[must_use]
    pub fn bone_tracks(&self, bone: &str) -> Option<&BoneTracks> {
        self.tracks.get(bone)
    }

    /// Iterates the animated bone names and their channels.
    pub fn tracks(&self) -> impl Iterator<Item = (&str, &BoneTracks)> {
        self.tracks.iter().map(|(name, t)| (name.as_str(), t))
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
