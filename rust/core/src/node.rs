// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene graph nodes
//!
//! A [`SceneNode`] owns its children, so every tree is acyclic by
//! construction and a node can be attached to at most one parent.
//! Traversal order is parent-before-children.

use crate::color::Color;
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a node, used by renderers to key uploaded resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Light source parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
}

/// Reference grid drawn on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHelper {
    /// Edge length of the whole grid
    pub size: f64,
    pub divisions: u32,
    /// Colour of the two centre lines
    pub center_color: Color,
    pub line_color: Color,
}

/// What a node contributes to the rendered scene
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node
    Group,
    Mesh(Mesh),
    AmbientLight(Light),
    /// Directional light shining from the node's position towards the origin
    DirectionalLight(Light),
    Grid(GridHelper),
}

/// A node in the scene graph
#[derive(Debug)]
pub struct SceneNode {
    id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Local-to-parent transform
    pub transform: Matrix4<f64>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a node of any kind with an identity transform
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            kind,
            transform: Matrix4::identity(),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, NodeKind::Mesh(mesh))
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Builder-style child attachment
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style translation
    pub fn with_position(mut self, position: Point3<f64>) -> Self {
        self.set_position(position);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Detach and return the child with `id`, if it is a direct child
    pub fn remove_child(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(index))
    }

    /// Replace the translation part of the local transform
    pub fn set_position(&mut self, position: Point3<f64>) {
        self.transform[(0, 3)] = position.x;
        self.transform[(1, 3)] = position.y;
        self.transform[(2, 3)] = position.z;
    }

    /// Translation part of the local transform
    pub fn position(&self) -> Point3<f64> {
        Point3::new(
            self.transform[(0, 3)],
            self.transform[(1, 3)],
            self.transform[(2, 3)],
        )
    }

    /// Post-multiply a translation onto the local transform
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.transform *= Matrix4::new_translation(&offset);
    }

    #[inline]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// Mesh payload, if this node carries geometry
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Depth-first, parent-before-children traversal of this subtree
    /// (including `self`)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Find a node anywhere in this subtree
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.descendants().find(|node| node.id == id)
    }
}

/// Iterator returned by [`SceneNode::descendants`]
///
/// Uses an explicit stack so arbitrarily deep trees cannot overflow the
/// call stack.
pub struct Descendants<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = SceneNode::group("a");
        let b = SceneNode::group("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_descendants_parent_before_children() {
        let root = SceneNode::group("root")
            .with_child(SceneNode::group("a").with_child(SceneNode::group("a1")))
            .with_child(SceneNode::group("b"));

        let names: Vec<_> = root.descendants().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_remove_child() {
        let child = SceneNode::group("child");
        let child_id = child.id();
        let mut root = SceneNode::group("root").with_child(child);

        let removed = root.remove_child(child_id).unwrap();
        assert_eq!(removed.name, "child");
        assert!(root.children().is_empty());
        assert!(root.remove_child(child_id).is_none());
    }

    #[test]
    fn test_position_roundtrip() {
        let mut node = SceneNode::group("n").with_position(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(node.position(), Point3::new(1.0, 2.0, 3.0));

        node.translate(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(node.position(), Point3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_deep_tree_traversal() {
        let mut node = SceneNode::group("leaf");
        for i in 0..10_000 {
            node = SceneNode::group(format!("level-{i}")).with_child(node);
        }
        assert_eq!(node.descendants().count(), 10_001);
        // Drop iteratively to keep the test independent of the default
        // recursive drop depth.
        let mut current = Some(node);
        while let Some(mut n) = current {
            current = n.children.pop();
        }
    }
}
