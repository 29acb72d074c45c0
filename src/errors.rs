//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`MarrowError`] covers all failure modes including:
//! - Clip validation failures (zero duration, malformed tracks)
//! - Name lookup misses (clips, bones)
//! - Programmer misuse of the skin-weight builder
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarrowError>`.
//!
//! Per-bone problems (a track naming a bone the hierarchy does not have, a
//! rig binding whose scene node disappeared) are not errors: those degrade
//! gracefully and are reported through the `log` crate instead, so a single
//! bad track never stops the whole rig from animating.

use thiserror::Error;

/// The main error type for the marrow animation core.
///
/// Each variant provides specific context about what went wrong.
#[derive(Error, Debug)]
pub enum MarrowError {
    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// The clip is structurally unusable (zero/negative duration, empty or
    /// non-monotonic channel).
    #[error("Invalid clip '{clip}': {reason}")]
    InvalidClip {
        /// Name of the offending clip
        clip: String,
        /// What made it invalid
        reason: String,
    },

    /// The requested clip name is not present in the registry.
    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    // ========================================================================
    // Skeleton Errors
    // ========================================================================
    /// A bone name could not be resolved against the hierarchy.
    #[error("Bone not found: {0}")]
    BoneNotFound(String),

    // ========================================================================
    // Skinning Errors
    // ========================================================================
    /// An index was outside the valid range for the call.
    #[error("Index out of range: {context} (index: {index}, len: {len})")]
    IndexOutOfRange {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
        /// The valid length
        len: usize,
    },

    /// A caller-supplied value violated the call's contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
