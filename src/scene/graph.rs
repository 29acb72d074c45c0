use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::skeleton::{BoneHierarchy, BonePose};

slotmap::new_key_type! {
    /// Handle to a [`Node`] in a [`SceneGraph`].
    pub struct NodeHandle;
}

/// Minimal scene graph: slotmap node storage, parent/child links, and a
/// parent-first world-matrix refresh.
///
/// This is the transform-system collaborator the animation core writes into.
/// The intended per-tick order is: [`update_world_transforms`], then
/// [`Animator::update`] (which overwrites bone world matrices), then any
/// consumer of world matrices such as
/// [`SkinPalette::compute`](crate::skeleton::SkinPalette::compute).
///
/// [`update_world_transforms`]: SceneGraph::update_world_transforms
/// [`Animator::update`]: crate::animation::Animator::update
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    roots: Vec<NodeHandle>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parentless node.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeHandle {
        let handle = self.nodes.insert(Node::new(name));
        self.roots.push(handle);
        handle
    }

    /// Adds a node under `parent`. A stale parent handle falls back to a
    /// root node.
    pub fn add_child(&mut self, parent: NodeHandle, name: impl Into<String>) -> NodeHandle {
        let handle = self.nodes.insert(Node::new(name));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            self.roots.push(handle);
        }
        handle
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    #[must_use]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first name lookup in the subtree rooted at `current`.
    #[must_use]
    pub fn find_by_name(&self, current: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(current)?;
        if node.name == name {
            return Some(current);
        }
        for &child in &node.children {
            if let Some(found) = self.find_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Instantiates scene nodes mirroring a [`BoneHierarchy`]: same names,
    /// same topology, bind pose as the local TRS. Returns the scene handle
    /// of the hierarchy root.
    pub fn instantiate_hierarchy(&mut self, hierarchy: &BoneHierarchy) -> NodeHandle {
        let mut handles = Vec::with_capacity(hierarchy.len());

        // Arena order is parents-first, so the parent handle always exists.
        for bone in hierarchy.nodes() {
            let handle = match bone.parent {
                Some(parent_id) => self.add_child(handles[parent_id.index()], bone.name.as_str()),
                None => self.add_root(bone.name.as_str()),
            };
            self.nodes[handle].transform =
                Transform::from_pose(BonePose::from_affine(&bone.local_bind));
            handles.push(handle);
        }

        handles[hierarchy.root().index()]
    }

    /// Recomputes world matrices for every node, parents before children.
    pub fn update_world_transforms(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A)> = self
            .roots
            .iter()
            .map(|&handle| (handle, Affine3A::IDENTITY))
            .collect();

        while let Some((handle, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            node.transform.update_local_matrix();
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);

            for &child in &self.nodes[handle].children {
                stack.push((child, world));
            }
        }
    }
}
