// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Core
//!
//! Scene graph and camera math for the IFC-View model viewer.
//!
//! ## Overview
//!
//! This crate is pure and synchronous. It provides:
//!
//! - **Scene graph**: owned, acyclic [`SceneNode`] trees with local transforms
//! - **Bounds**: axis-aligned boxes over a subtree's geometry ([`compute_bounds`])
//! - **Camera**: a perspective camera and damped [`OrbitControls`]
//! - **Framing**: bounding-box driven camera placement ([`frame`])
//! - **Metadata**: element and node counts for a loaded model ([`ModelMetadata`])
//!
//! ## Quick Start
//!
//! ```rust
//! use ifcview_core::{compute_bounds, compute_frame_distance, frame, Mesh, OrbitControls,
//!     PerspectiveCamera, Point3, SceneNode};
//!
//! let root = SceneNode::group("model")
//!     .with_child(SceneNode::mesh("slab", Mesh::cuboid(Point3::new(-5.0, 0.0, -5.0), Point3::new(5.0, 1.0, 5.0))));
//!
//! let mut camera = PerspectiveCamera::default();
//! let mut controls = OrbitControls::default();
//!
//! let extent = compute_bounds(&root);
//! let distance = compute_frame_distance(&extent.size, camera.fov_radians());
//! frame(&mut camera, &mut controls, extent.center, distance);
//! assert_eq!(camera.target, extent.center);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`ModelMetadata`] and [`Color`]

pub mod bounds;
pub mod camera;
pub mod color;
pub mod controls;
pub mod framing;
pub mod mesh;
pub mod metadata;
pub mod node;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use bounds::{compute_bounds, BoxExtent, Bounds};
pub use camera::PerspectiveCamera;
pub use color::Color;
pub use controls::OrbitControls;
pub use framing::{compute_frame_distance, frame, CameraFrame, MARGIN_FACTOR, MIN_FRAME_DISTANCE};
pub use mesh::Mesh;
pub use metadata::{count_nodes, ModelMetadata};
pub use node::{Descendants, GridHelper, Light, NodeId, NodeKind, SceneNode};
