use crate::animation::values::Interpolatable;

/// How values between two keyframes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Lerp (vectors) / shortest-arc slerp (quaternions) between keys.
    Linear,
    /// Hold the left key until the next key time is reached.
    Step,
}

/// How far `sample_with_cursor` scans linearly before falling back to a
/// binary search. Covers normal frame-to-frame advancement; anything larger
/// is a scrub or a loop reset.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembered bracket index for one track, owned by the playback side
/// (tracks themselves stay immutable and shareable).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// An ordered run of keyframes for a single channel of a single bone.
///
/// `times` are clip ticks (non-decreasing); `values` is the parallel value
/// array. Construction does not validate; [`AnimationClip`] validation does,
/// once, when the clip is assembled.
///
/// [`AnimationClip`]: crate::animation::AnimationClip
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f64>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f64>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Single-key convenience: a constant channel.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
            interpolation: InterpolationMode::Linear,
        }
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.times.len()
    }

    /// Stateless sample at tick `time`.
    ///
    /// Before the first key this clamps to the first value, past the last key
    /// it clamps to the last value. A single-key track returns its key for
    /// every `time`.
    #[must_use]
    pub fn sample(&self, time: f64) -> T {
        assert!(!self.times.is_empty(), "track has no keyframes");

        // partition_point yields the first index with t > time, i.e. the
        // right edge of the bracket.
        let next_idx = self.times.partition_point(|&t| t <= time);
        let idx = next_idx.saturating_sub(1);
        self.sample_at_frame(idx, time)
    }

    /// Cursor-accelerated sample for monotonically advancing playback.
    ///
    /// A short linear scan from the cursor's last bracket handles the common
    /// per-frame advance in O(1); a large jump (scrubbing, loop reset) falls
    /// back to a binary search. Results are identical to [`sample`].
    ///
    /// [`sample`]: KeyframeTrack::sample
    pub fn sample_with_cursor(&self, time: f64, cursor: &mut KeyframeCursor) -> T {
        assert!(!self.times.is_empty(), "track has no keyframes");

        let len = self.times.len();
        if len == 1 {
            return self.values[0];
        }

        let i = cursor.last_index;
        // The cursor may point past the end if it was built for another
        // track; treat that as a cold start.
        let t_curr = *self.times.get(i).unwrap_or(&self.times[0]);

        let found_index = if time >= t_curr {
            // Playback advancing: scan forward a few brackets.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Time moved backwards (loop wrap, reverse scrub): scan back.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let final_index = match found_index {
            Some(idx) => {
                cursor.last_index = idx;
                idx
            }
            None => {
                // Large jump: binary search, then re-seed the cursor.
                let next_idx = self.times.partition_point(|&t| t <= time);
                let idx = next_idx.saturating_sub(1);
                cursor.last_index = idx;
                idx
            }
        };

        self.sample_at_frame(final_index, time)
    }

    fn sample_at_frame(&self, index: usize, time: f64) -> T {
        let len = self.times.len();

        // No bracket to the right: clamp to the last key.
        if index >= len - 1 {
            return self.values[len - 1];
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;

        // Equal-time guard, and clamp for floating-point overshoot (also
        // covers `time` before the first key, where the factor goes negative).
        let f = if dt > 1e-9 { (time - t0) / dt } else { 0.0 };
        let f = f.clamp(0.0, 1.0) as f32;

        match self.interpolation {
            InterpolationMode::Step => self.values[index],
            InterpolationMode::Linear => {
                T::interpolate_linear(self.values[index], self.values[index + 1], f)
            }
        }
    }
}
