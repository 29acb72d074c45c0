use std::sync::Arc;

use crate::animation::binding::Rig;
use crate::animation::blender::PoseBlender;
use crate::animation::clip::AnimationClip;
use crate::animation::registry::ClipRegistry;
use crate::animation::sampler::{PoseSampler, SamplerCursors};
use crate::errors::{MarrowError, Result};
use crate::scene::SceneGraph;
use crate::skeleton::{BoneHierarchy, Pose};

/// What happens when playback reaches the end of the current clip (and no
/// queued transition consumes the boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Clamp at the end and hold the final pose.
    Once,
    /// Wrap back to the start.
    Loop,
}

/// One clip being played: the shared clip, a playback cursor in seconds,
/// and the per-track sampling cursors.
#[derive(Debug)]
struct ClipPlayback {
    clip: Arc<AnimationClip>,
    time: f64,
    cursors: SamplerCursors,
}

impl ClipPlayback {
    fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            cursors: SamplerCursors::new(),
        }
    }
}

/// A transition armed while a clip plays, fired at its loop boundary.
#[derive(Debug)]
struct QueuedClip {
    clip: Arc<AnimationClip>,
    blend_seconds: f32,
}

/// The `from` side of an active blend: either a clip playback frozen at its
/// transition time, or a pose snapshot adopted when a blend was interrupted
/// by another play request.
#[derive(Debug)]
enum BlendSource {
    Clip(ClipPlayback),
    Snapshot(Pose),
}

#[derive(Debug)]
enum PlaybackState {
    Idle,
    Playing {
        playback: ClipPlayback,
        queued: Option<QueuedClip>,
    },
    Blending {
        from: BlendSource,
        to: ClipPlayback,
        elapsed: f32,
        duration: f32,
    },
}

/// Per-character playback orchestrator.
///
/// Owns its playback cursor state exclusively; the clip registry and bone
/// hierarchy it references are immutable and shared across every animator
/// driving the same model. One [`update`] per simulation tick advances the
/// state machine, samples (and blends, mid-transition), and writes the
/// resulting world poses through a [`Rig`] into the scene graph.
///
/// [`update`]: Animator::update
#[derive(Debug)]
pub struct Animator {
    registry: Arc<ClipRegistry>,
    hierarchy: Arc<BoneHierarchy>,
    state: PlaybackState,
    /// Playback speed multiplier. 1.0 is authored speed.
    pub speed: f32,
    pub loop_mode: LoopMode,
}

impl Animator {
    #[must_use]
    pub fn new(registry: Arc<ClipRegistry>, hierarchy: Arc<BoneHierarchy>) -> Self {
        Self {
            registry,
            hierarchy,
            state: PlaybackState::Idle,
            speed: 1.0,
            loop_mode: LoopMode::Loop,
        }
    }

    /// Starts playing `name`, cross-fading over `blend_seconds`.
    ///
    /// With a non-positive blend, or when nothing is playing yet, the switch
    /// is immediate (new clip at time 0, no blend). Otherwise the current
    /// output becomes the blend source: a playing clip is frozen at its
    /// current time, and an in-flight blend is snapshotted as-is and the new
    /// blend starts fresh from it.
    ///
    /// # Errors
    ///
    /// [`MarrowError::ClipNotFound`] when `name` is not registered; a
    /// warning is logged and the current state is untouched.
    pub fn play(&mut self, name: &str, blend_seconds: f32) -> Result<()> {
        let Some(clip) = self.registry.get(name) else {
            log::warn!("play: clip '{name}' not found; keeping current state");
            return Err(MarrowError::ClipNotFound(name.to_string()));
        };

        // Interrupting an active blend adopts its current output as the new
        // source. Sample before touching the state so a sampling error
        // leaves the animator unchanged.
        let snapshot = if blend_seconds > 0.0 && self.is_blending() {
            self.sample_pose()?
        } else {
            None
        };

        let state = std::mem::replace(&mut self.state, PlaybackState::Idle);
        self.state = match state {
            PlaybackState::Idle => PlaybackState::Playing {
                playback: ClipPlayback::new(clip),
                queued: None,
            },
            _ if blend_seconds <= 0.0 => PlaybackState::Playing {
                playback: ClipPlayback::new(clip),
                queued: None,
            },
            PlaybackState::Playing { playback, .. } => PlaybackState::Blending {
                from: BlendSource::Clip(playback),
                to: ClipPlayback::new(clip),
                elapsed: 0.0,
                duration: blend_seconds,
            },
            PlaybackState::Blending { .. } => {
                // Snapshot was computed above; the interrupted blend's
                // target playback is discarded with the old state.
                let pose = snapshot.unwrap_or_default();
                PlaybackState::Blending {
                    from: BlendSource::Snapshot(pose),
                    to: ClipPlayback::new(clip),
                    elapsed: 0.0,
                    duration: blend_seconds,
                }
            }
        };
        Ok(())
    }

    /// Arms a transition to `name` that fires when the current clip next
    /// reaches its end, instead of wrapping. Replaces any previously queued
    /// transition.
    ///
    /// # Errors
    ///
    /// [`MarrowError::ClipNotFound`] for an unknown name;
    /// [`MarrowError::InvalidArgument`] when nothing is playing (there is no
    /// boundary to fire at). Both leave the state untouched.
    pub fn queue_next(&mut self, name: &str, blend_seconds: f32) -> Result<()> {
        let Some(clip) = self.registry.get(name) else {
            log::warn!("queue_next: clip '{name}' not found; keeping current state");
            return Err(MarrowError::ClipNotFound(name.to_string()));
        };

        match &mut self.state {
            PlaybackState::Playing { queued, .. } => {
                *queued = Some(QueuedClip {
                    clip,
                    blend_seconds,
                });
                Ok(())
            }
            _ => {
                log::warn!("queue_next: no clip playing; '{name}' not queued");
                Err(MarrowError::InvalidArgument(
                    "queue_next requires a playing clip".to_string(),
                ))
            }
        }
    }

    /// Drops whatever is playing and returns to `Idle`.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
    }

    /// Advances the state machine by `dt` seconds (scaled by [`speed`]).
    ///
    /// In `Playing`, crossing the clip's end consumes a queued transition if
    /// one is armed, otherwise wraps or clamps per [`LoopMode`]. In
    /// `Blending`, the tick where the weight reaches 1 collapses to
    /// `Playing` on the target; the source and its pose are discarded in
    /// the same tick, so no partial blend leaks into the next frame.
    ///
    /// [`speed`]: Animator::speed
    pub fn advance(&mut self, dt: f32) {
        let dt = dt * self.speed;

        let state = std::mem::replace(&mut self.state, PlaybackState::Idle);
        self.state = match state {
            PlaybackState::Idle => PlaybackState::Idle,

            PlaybackState::Playing {
                mut playback,
                mut queued,
            } => {
                let duration = playback.clip.duration_seconds();
                playback.time += f64::from(dt);

                if playback.time < duration {
                    PlaybackState::Playing { playback, queued }
                } else if let Some(next) = queued.take() {
                    // The loop boundary consumes the queued transition.
                    playback.time = duration;
                    if next.blend_seconds <= 0.0 {
                        PlaybackState::Playing {
                            playback: ClipPlayback::new(next.clip),
                            queued: None,
                        }
                    } else {
                        PlaybackState::Blending {
                            from: BlendSource::Clip(playback),
                            to: ClipPlayback::new(next.clip),
                            elapsed: 0.0,
                            duration: next.blend_seconds,
                        }
                    }
                } else {
                    match self.loop_mode {
                        LoopMode::Loop => {
                            playback.time = playback.time.rem_euclid(duration);
                            PlaybackState::Playing { playback, queued }
                        }
                        LoopMode::Once => {
                            playback.time = duration;
                            PlaybackState::Playing { playback, queued }
                        }
                    }
                }
            }

            PlaybackState::Blending {
                from,
                mut to,
                mut elapsed,
                duration,
            } => {
                elapsed += dt;
                to.time += f64::from(dt);

                let weight = (elapsed / duration).clamp(0.0, 1.0);
                if weight >= 1.0 {
                    PlaybackState::Playing {
                        playback: to,
                        queued: None,
                    }
                } else {
                    PlaybackState::Blending {
                        from,
                        to,
                        elapsed,
                        duration,
                    }
                }
            }
        };
    }

    /// Samples the pose for the current state: the playing clip's pose, or
    /// the blended pose mid-transition. `None` while `Idle`.
    pub fn sample_pose(&mut self) -> Result<Option<Pose>> {
        match &mut self.state {
            PlaybackState::Idle => Ok(None),

            PlaybackState::Playing { playback, .. } => {
                let hold = self.loop_mode == LoopMode::Once;
                let pose = sample_playback(&self.hierarchy, playback, hold)?;
                Ok(Some(pose))
            }

            PlaybackState::Blending {
                from,
                to,
                elapsed,
                duration,
            } => {
                let weight = (*elapsed / *duration).clamp(0.0, 1.0);
                let from_pose = match from {
                    BlendSource::Clip(playback) => {
                        sample_playback(&self.hierarchy, playback, true)?
                    }
                    BlendSource::Snapshot(pose) => pose.clone(),
                };
                let to_pose = sample_playback(&self.hierarchy, to, false)?;
                Ok(Some(PoseBlender::blend(&from_pose, &to_pose, weight)))
            }
        }
    }

    /// One full tick: advance, sample, and write the result through `rig`
    /// into the scene graph. Bones the rig could not bind are skipped.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph, rig: &Rig) -> Result<()> {
        self.advance(dt);
        if let Some(pose) = self.sample_pose()? {
            rig.apply(scene, &pose);
        }
        Ok(())
    }

    // ========================================================================
    // State inspection
    // ========================================================================

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, PlaybackState::Idle)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    #[must_use]
    pub fn is_blending(&self) -> bool {
        matches!(self.state, PlaybackState::Blending { .. })
    }

    /// Name of the clip driving the output: the playing clip, or the blend
    /// target mid-transition.
    #[must_use]
    pub fn current_clip(&self) -> Option<&str> {
        match &self.state {
            PlaybackState::Idle => None,
            PlaybackState::Playing { playback, .. } => Some(&playback.clip.name),
            PlaybackState::Blending { to, .. } => Some(&to.clip.name),
        }
    }

    /// Playback time in seconds of the clip named by [`current_clip`].
    ///
    /// [`current_clip`]: Animator::current_clip
    #[must_use]
    pub fn current_time(&self) -> Option<f64> {
        match &self.state {
            PlaybackState::Idle => None,
            PlaybackState::Playing { playback, .. } => Some(playback.time),
            PlaybackState::Blending { to, .. } => Some(to.time),
        }
    }

    /// The active blend weight, `None` outside `Blending`.
    #[must_use]
    pub fn blend_weight(&self) -> Option<f32> {
        match &self.state {
            PlaybackState::Blending {
                elapsed, duration, ..
            } => Some((elapsed / duration).clamp(0.0, 1.0)),
            _ => None,
        }
    }

    /// Name of the queued next clip, if one is armed.
    #[must_use]
    pub fn queued_clip(&self) -> Option<&str> {
        match &self.state {
            PlaybackState::Playing {
                queued: Some(next), ..
            } => Some(&next.clip.name),
            _ => None,
        }
    }
}

/// Samples one clip playback. With `hold_at_end`, a playback cursor at or
/// past the clip's end samples the final keyed pose (unwrapped ticks clamp
/// per track) instead of wrapping to the start.
fn sample_playback(
    hierarchy: &BoneHierarchy,
    playback: &mut ClipPlayback,
    hold_at_end: bool,
) -> Result<Pose> {
    if hold_at_end && playback.time >= playback.clip.duration_seconds() {
        PoseSampler::sample_at_ticks(&playback.clip, hierarchy, playback.clip.duration_ticks)
    } else {
        PoseSampler::sample_with_cursors(
            &playback.clip,
            hierarchy,
            playback.time,
            &mut playback.cursors,
        )
    }
}
