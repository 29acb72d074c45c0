use glam::{Affine3A, Mat4};
use uuid::Uuid;

use crate::errors::{MarrowError, Result};
use crate::scene::{NodeHandle, SceneGraph};

/// Fixed capacity of the skin-matrix array handed to the renderer.
pub const MAX_PALETTE_BONES: usize = 100;

/// Per-frame skin matrices for one skinned mesh.
///
/// `matrices[i]` belongs to bone index `i` as assigned by the skin-weight
/// builder. Slots past the rig's bone count stay identity, so the renderer
/// can consume the whole fixed-size array unconditionally.
#[derive(Debug, Clone)]
pub struct SkinPalette {
    pub id: Uuid,
    pub name: String,

    // Bone list: ordered array, index-matched to the skin weights.
    bones: Vec<NodeHandle>,

    // Importer-supplied bone offset matrices (mesh space -> bone local
    // space in the bind pose). Static after load.
    offset_matrices: Vec<Affine3A>,

    // Recomputed every frame, uploaded by the renderer.
    matrices: Vec<Mat4>,
}

impl SkinPalette {
    /// # Errors
    ///
    /// [`MarrowError::InvalidArgument`] when `bones` and `offset_matrices`
    /// disagree in length, [`MarrowError::IndexOutOfRange`] when the rig has
    /// more bones than [`MAX_PALETTE_BONES`].
    pub fn new(
        name: impl Into<String>,
        bones: Vec<NodeHandle>,
        offset_matrices: Vec<Affine3A>,
    ) -> Result<Self> {
        let name = name.into();

        if bones.len() != offset_matrices.len() {
            return Err(MarrowError::InvalidArgument(format!(
                "palette '{name}': {} bones but {} offset matrices",
                bones.len(),
                offset_matrices.len()
            )));
        }
        if bones.len() > MAX_PALETTE_BONES {
            return Err(MarrowError::IndexOutOfRange {
                context: format!("palette '{name}' bone count"),
                index: bones.len(),
                len: MAX_PALETTE_BONES,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            bones,
            offset_matrices,
            matrices: vec![Mat4::IDENTITY; MAX_PALETTE_BONES],
        })
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Recomputes the skin matrices from current bone world transforms.
    ///
    /// `mesh_world_inv` is the inverse world matrix of the node carrying the
    /// skinned mesh; it cancels the mesh's own transform so skinning happens
    /// in mesh-local space. Bones whose scene node is gone are skipped and
    /// keep their previous matrix.
    pub fn compute(&mut self, scene: &SceneGraph, mesh_world_inv: Affine3A) {
        for (i, &bone_handle) in self.bones.iter().enumerate() {
            let Some(bone_node) = scene.get_node(bone_handle) else {
                continue;
            };
            let bone_world = *bone_node.transform.world_matrix();
            let offset = self.offset_matrices[i];

            // Offset first (into bone-local bind space), then the bone's
            // current world transform, then cancel the mesh transform.
            self.matrices[i] = Mat4::from(mesh_world_inv * bone_world * offset);
        }
    }

    /// The full fixed-size matrix array, column-major.
    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Transposed view for renderers that consume row-major matrices.
    pub fn matrices_transposed(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.matrices.iter().map(Mat4::transpose)
    }
}
