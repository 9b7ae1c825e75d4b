// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounds of scene graph subtrees
//!
//! Bounds are accumulated in f64 world space: each mesh vertex is pushed
//! through the product of the transforms from the subtree root down to its
//! node. Only [`NodeKind::Mesh`](crate::NodeKind::Mesh) nodes contribute
//! geometry.

use crate::node::SceneNode;
use nalgebra::{Matrix4, Point3, Vector3};

/// Running min/max accumulator in f64 precision
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
    /// Number of points added
    pub sample_count: usize,
}

impl Bounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point; non-finite points are skipped
    #[inline]
    pub fn expand(&mut self, point: &Point3<f64>) {
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return;
        }
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
        self.sample_count += 1;
    }

    /// Centre of the box, origin when empty
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        if !self.is_valid() {
            return Point3::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis extents, zero when empty
    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        if !self.is_valid() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    pub fn extent(&self) -> BoxExtent {
        BoxExtent {
            center: self.center(),
            size: self.size(),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounding box expressed as centre point and per-axis size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxExtent {
    pub center: Point3<f64>,
    pub size: Vector3<f64>,
}

impl BoxExtent {
    /// Largest of the three extents
    #[inline]
    pub fn max_dimension(&self) -> f64 {
        self.size.x.max(self.size.y).max(self.size.z)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.max_dimension() > 0.0)
    }
}

/// Minimal axis-aligned box enclosing all geometry below `node`.
///
/// The root's own transform is applied. A subtree without geometry yields a
/// zero-sized box at the origin.
pub fn compute_bounds(node: &SceneNode) -> BoxExtent {
    accumulate_bounds(node).extent()
}

/// Same traversal as [`compute_bounds`] but returns the raw accumulator
pub fn accumulate_bounds(node: &SceneNode) -> Bounds {
    let mut bounds = Bounds::new();
    let mut stack: Vec<(&SceneNode, Matrix4<f64>)> = vec![(node, node.transform)];

    while let Some((current, world)) = stack.pop() {
        if let Some(mesh) = current.as_mesh() {
            for point in mesh.transformed_vertices(&world) {
                bounds.expand(&point);
            }
        }
        for child in current.children() {
            stack.push((child, world * child.transform));
        }
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use approx::assert_relative_eq;

    fn unit_box() -> Mesh {
        Mesh::cuboid(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.center(), Point3::origin());
        assert_eq!(bounds.size(), Vector3::zeros());
    }

    #[test]
    fn test_expand_skips_non_finite() {
        let mut bounds = Bounds::new();
        bounds.expand(&Point3::new(f64::NAN, 0.0, 0.0));
        assert!(!bounds.is_valid());
        bounds.expand(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.sample_count, 1);
        assert_eq!(bounds.size(), Vector3::zeros());
    }

    #[test]
    fn test_single_mesh() {
        let node = SceneNode::mesh("box", unit_box());
        let extent = compute_bounds(&node);
        assert_relative_eq!(extent.center, Point3::origin());
        assert_relative_eq!(extent.size, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_nested_transforms_accumulate() {
        let root = SceneNode::group("root")
            .with_position(Point3::new(10.0, 0.0, 0.0))
            .with_child(
                SceneNode::group("storey")
                    .with_position(Point3::new(0.0, 3.0, 0.0))
                    .with_child(SceneNode::mesh("box", unit_box())),
            );

        let extent = compute_bounds(&root);
        assert_relative_eq!(extent.center, Point3::new(10.0, 3.0, 0.0));
        assert_relative_eq!(extent.size, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_union_of_siblings() {
        let root = SceneNode::group("root")
            .with_child(SceneNode::mesh("a", unit_box()).with_position(Point3::new(-2.0, 0.0, 0.0)))
            .with_child(SceneNode::mesh("b", unit_box()).with_position(Point3::new(2.0, 0.0, 4.0)));

        let extent = compute_bounds(&root);
        assert_relative_eq!(extent.center, Point3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(extent.size, Vector3::new(5.0, 1.0, 5.0));
        assert_relative_eq!(extent.max_dimension(), 5.0);
    }

    #[test]
    fn test_groups_without_geometry_are_degenerate() {
        let root = SceneNode::group("root").with_child(SceneNode::group("empty"));
        let extent = compute_bounds(&root);
        assert!(extent.is_degenerate());
        assert_eq!(extent.center, Point3::origin());
    }
}
