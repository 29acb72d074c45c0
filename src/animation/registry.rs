use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::animation::clip::AnimationClip;
use crate::errors::{MarrowError, Result};

/// Shared, name-keyed store of loaded clips.
///
/// This is the explicit replacement for a process-global clip cache: build
/// one per loaded model, populate it at load time, and hand an
/// `Arc<ClipRegistry>` to every [`Animator`](crate::animation::Animator)
/// driving that model. After population the registry is effectively
/// read-only; reads take a short shared lock and clone an `Arc`.
///
/// Insertion is first-writer-wins, so concurrent first-time loads of the
/// same clip name deduplicate: everyone ends up holding the same
/// `Arc<AnimationClip>`.
#[derive(Debug, Default)]
pub struct ClipRegistry {
    clips: RwLock<FxHashMap<String, Arc<AnimationClip>>>,
}

impl ClipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `clip` under its own name and returns the shared handle.
    ///
    /// If the name is already registered, the existing clip wins and is
    /// returned; the argument is dropped. Clip content for a given name is
    /// identical by contract, so either resolution order is correct.
    pub fn insert(&self, clip: AnimationClip) -> Arc<AnimationClip> {
        let mut clips = self.clips.write();
        Arc::clone(
            clips
                .entry(clip.name.clone())
                .or_insert_with(|| Arc::new(clip)),
        )
    }

    /// Looks up a clip by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.read().get(name).cloned()
    }

    /// Looks up a clip by name, producing [`MarrowError::ClipNotFound`] on a
    /// miss.
    pub fn get_or_err(&self, name: &str) -> Result<Arc<AnimationClip>> {
        self.get(name)
            .ok_or_else(|| MarrowError::ClipNotFound(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clips.read().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.read().is_empty()
    }

    /// Sorted list of registered clip names (diagnostics, inspectors).
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clips.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
