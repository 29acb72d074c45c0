use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, SceneGraph};
use crate::skeleton::{BoneHierarchy, BonePose, Pose};

/// One bone's runtime binding: a hierarchy bone name resolved to a live
/// scene node, plus the node's local pose captured at bind time.
///
/// The captured rest pose is what gets written back before scene state is
/// persisted, so animated runtime values never leak into saved scenes.
#[derive(Debug, Clone)]
pub struct BoneBinding {
    pub name: String,
    pub node: NodeHandle,
    pub rest_pose: BonePose,
}

/// All bone bindings for one character instance, with a precomputed
/// name → binding index map (resolution happens once at bind time, not per
/// bone per frame).
#[derive(Debug, Default)]
pub struct Rig {
    bindings: Vec<BoneBinding>,
    by_name: FxHashMap<String, usize>,
}

impl Rig {
    /// Resolves every hierarchy bone against the scene subtree under
    /// `root`, by name. Bones without a matching scene node are left
    /// unbound (rigs may carry nodes a particular scene does not
    /// instantiate) and later skipped by [`apply`].
    ///
    /// [`apply`]: Rig::apply
    #[must_use]
    pub fn bind(scene: &SceneGraph, root: NodeHandle, hierarchy: &BoneHierarchy) -> Self {
        let mut bindings = Vec::with_capacity(hierarchy.len());
        let mut by_name =
            FxHashMap::with_capacity_and_hasher(hierarchy.len(), rustc_hash::FxBuildHasher);

        for bone in hierarchy.nodes() {
            let Some(handle) = scene.find_by_name(root, &bone.name) else {
                log::debug!("rig bind: no scene node named '{}'", bone.name);
                continue;
            };
            let rest_pose = scene
                .get_node(handle)
                .map(|node| node.transform.pose())
                .unwrap_or_default();

            by_name.insert(bone.name.clone(), bindings.len());
            bindings.push(BoneBinding {
                name: bone.name.clone(),
                node: handle,
                rest_pose,
            });
        }

        Self { bindings, by_name }
    }

    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[BoneBinding] {
        &self.bindings
    }

    #[inline]
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&BoneBinding> {
        self.by_name.get(name).map(|&i| &self.bindings[i])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Writes a sampled world pose into the bound scene nodes. Bones the
    /// pose does not cover, and bindings whose node has been removed, are
    /// skipped.
    pub fn apply(&self, scene: &mut SceneGraph, pose: &Pose) {
        for binding in &self.bindings {
            let Some(bone_pose) = pose.get(&binding.name) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(binding.node) else {
                log::debug!("rig apply: scene node for '{}' is gone", binding.name);
                continue;
            };
            node.transform
                .set_world_pose(bone_pose.position, bone_pose.rotation, bone_pose.scale);
        }
    }

    /// Restores every bound node's local TRS to the pose captured at bind
    /// time. Call before serializing scene state.
    pub fn restore_rest_pose(&self, scene: &mut SceneGraph) {
        for binding in &self.bindings {
            if let Some(node) = scene.get_node_mut(binding.node) {
                node.transform.set_pose(binding.rest_pose);
            }
        }
    }
}
