use glam::Affine3A;
use rustc_hash::FxHashMap;

use crate::errors::{MarrowError, Result};

/// Index of a node inside a [`BoneHierarchy`] arena.
///
/// Stable for the lifetime of the hierarchy (nodes are never removed), so it
/// can be held across frames and shared freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the bind-pose skeleton tree.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub name: String,
    /// Local transform relative to the parent in the bind (rest) pose.
    pub local_bind: Affine3A,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The bind-pose skeleton: a tree of named nodes stored as a flat arena.
///
/// Built once from the imported model skeleton and read-only afterwards.
/// Children are always appended after their parent, so iterating the arena in
/// index order visits parents before children; world-pose accumulation is a
/// single forward pass, no recursion.
///
/// Integer indices instead of node references keep the tree trivially
/// acyclic and safe to read from many samplers at once.
#[derive(Debug, Clone)]
pub struct BoneHierarchy {
    nodes: Vec<HierarchyNode>,
    by_name: FxHashMap<String, NodeId>,
}

impl BoneHierarchy {
    /// Starts a hierarchy with its root node.
    #[must_use]
    pub fn with_root(name: impl Into<String>, local_bind: Affine3A) -> Self {
        let name = name.into();
        let mut by_name = FxHashMap::default();
        by_name.insert(name.clone(), NodeId(0));

        Self {
            nodes: vec![HierarchyNode {
                name,
                local_bind,
                parent: None,
                children: Vec::new(),
            }],
            by_name,
        }
    }

    /// Appends a child node under `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// [`MarrowError::IndexOutOfRange`] for a foreign `parent` id,
    /// [`MarrowError::InvalidArgument`] for a duplicate node name (names are
    /// the join key against clips and scene nodes, so they must be unique).
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local_bind: Affine3A,
    ) -> Result<NodeId> {
        let name = name.into();

        if parent.index() >= self.nodes.len() {
            return Err(MarrowError::IndexOutOfRange {
                context: "hierarchy parent node".to_string(),
                index: parent.index(),
                len: self.nodes.len(),
            });
        }
        if self.by_name.contains_key(&name) {
            return Err(MarrowError::InvalidArgument(format!(
                "duplicate bone name '{name}' in hierarchy"
            )));
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HierarchyNode {
            name: name.clone(),
            local_bind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// The root node id (always the first arena slot).
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.index())
    }

    /// Resolves a bone name to its node id.
    #[inline]
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// All nodes in arena order (parents before children).
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A hierarchy always has at least its root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
