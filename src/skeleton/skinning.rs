use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{MarrowError, Result};

/// Bone influences kept per vertex. Influences beyond the four strongest are
/// discarded at build time (a fidelity/perf tradeoff, matched by the vertex
/// layout the skin shader consumes).
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Kept-weight sums at or below this are considered degenerate and left
/// unnormalized.
pub const WEIGHT_EPSILON: f32 = 1e-6;

/// One vertex of a skinned mesh as the vertex-buffer builder consumes it.
///
/// Unused influence slots hold index 0 / weight 0; whenever any weight is
/// positive the four weights sum to 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub bone_indices: [i32; MAX_BONE_INFLUENCES],
    pub bone_weights: [f32; MAX_BONE_INFLUENCES],
}

impl SkinnedVertex {
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, texcoord: Vec2, influences: VertexInfluences) -> Self {
        Self {
            position,
            normal,
            texcoord,
            bone_indices: influences.bone_indices,
            bone_weights: influences.bone_weights,
        }
    }
}

/// The influence slots of one vertex, in descending-weight order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexInfluences {
    pub bone_indices: [i32; MAX_BONE_INFLUENCES],
    pub bone_weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexInfluences {
    #[must_use]
    pub fn weight_sum(&self) -> f32 {
        self.bone_weights.iter().sum()
    }
}

/// Build output: per-vertex influence slots plus the index→name side map
/// used later to resolve a final bone transform per palette index without
/// storing strings per vertex.
#[derive(Debug, Clone)]
pub struct SkinWeights {
    pub vertices: Vec<VertexInfluences>,
    pub bone_names: FxHashMap<i32, String>,
}

#[derive(Debug, Clone, Copy)]
struct RawInfluence {
    bone_index: i32,
    weight: f32,
}

/// Accumulates raw `(vertex, bone, weight)` triples from the importer and
/// packs them into normalized per-vertex influence slots.
///
/// Runs once at mesh-load time, independent of playback.
#[derive(Debug)]
pub struct SkinWeightBuilder {
    vertex_count: usize,
    // Inline capacity covers the common rig; over-subscribed vertices spill.
    influences: Vec<SmallVec<[RawInfluence; MAX_BONE_INFLUENCES]>>,
    bone_names: FxHashMap<i32, String>,
}

impl SkinWeightBuilder {
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            influences: vec![SmallVec::new(); vertex_count],
            bone_names: FxHashMap::default(),
        }
    }

    /// Records one `(vertex, bone, weight)` triple.
    ///
    /// # Errors
    ///
    /// [`MarrowError::IndexOutOfRange`] for a vertex index at or past
    /// `vertex_count`; [`MarrowError::InvalidArgument`] for a negative bone
    /// index or weight. Both are programmer errors in the importer, fatal to
    /// the call only.
    pub fn add_influence(
        &mut self,
        vertex_index: usize,
        bone_index: i32,
        bone_name: &str,
        weight: f32,
    ) -> Result<()> {
        if vertex_index >= self.vertex_count {
            return Err(MarrowError::IndexOutOfRange {
                context: "skin weight vertex".to_string(),
                index: vertex_index,
                len: self.vertex_count,
            });
        }
        if bone_index < 0 {
            return Err(MarrowError::InvalidArgument(format!(
                "negative bone index {bone_index} for bone '{bone_name}'"
            )));
        }
        if weight < 0.0 {
            return Err(MarrowError::InvalidArgument(format!(
                "negative weight {weight} for bone '{bone_name}' on vertex {vertex_index}"
            )));
        }

        self.influences[vertex_index].push(RawInfluence { bone_index, weight });
        self.bone_names
            .entry(bone_index)
            .or_insert_with(|| bone_name.to_string());
        Ok(())
    }

    /// Sorts, truncates to the top [`MAX_BONE_INFLUENCES`], normalizes, and
    /// packs every vertex's influences.
    ///
    /// A vertex whose kept weights sum to [`WEIGHT_EPSILON`] or less keeps
    /// its raw weights: detecting zero-influence vertices is the caller's
    /// responsibility, and scaling noise up to 1.0 would invent influence
    /// that was never authored.
    #[must_use]
    pub fn build(self) -> SkinWeights {
        let vertices = self
            .influences
            .into_iter()
            .map(|mut raw| {
                // Stable sort: equal weights keep importer order, so output
                // is deterministic across runs.
                raw.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                raw.truncate(MAX_BONE_INFLUENCES);

                let sum: f32 = raw.iter().map(|i| i.weight).sum();
                let normalize = sum > WEIGHT_EPSILON;

                let mut out = VertexInfluences::default();
                for (slot, influence) in raw.iter().enumerate() {
                    out.bone_indices[slot] = influence.bone_index;
                    out.bone_weights[slot] = if normalize {
                        // Clamp absorbs floating-point overshoot from the
                        // division.
                        (influence.weight / sum).clamp(0.0, 1.0)
                    } else {
                        influence.weight
                    };
                }
                out
            })
            .collect();

        SkinWeights {
            vertices,
            bone_names: self.bone_names,
        }
    }
}
