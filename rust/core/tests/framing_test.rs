// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use ifcview_core::{
    compute_bounds, compute_frame_distance, CameraFrame, Mesh, OrbitControls, PerspectiveCamera,
    Point3, SceneNode, Vector3, MIN_FRAME_DISTANCE,
};

fn building() -> SceneNode {
    // 20 x 9 x 12 footprint offset from the origin, split across storeys
    SceneNode::group("building")
        .with_position(Point3::new(100.0, 0.0, -40.0))
        .with_child(SceneNode::mesh(
            "ground",
            Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 3.0, 12.0)),
        ))
        .with_child(
            SceneNode::group("upper")
                .with_position(Point3::new(0.0, 3.0, 0.0))
                .with_child(SceneNode::mesh(
                    "storey",
                    Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 6.0, 12.0)),
                )),
        )
}

#[test]
fn frames_building_from_diagonal() {
    let root = building();
    let mut camera = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 1000.0);
    let mut controls = OrbitControls::default();
    controls.enable_damping = true;

    let extent = compute_bounds(&root);
    assert_relative_eq!(extent.center, Point3::new(110.0, 4.5, -34.0), epsilon = 1e-6);
    assert_relative_eq!(extent.size, Vector3::new(20.0, 9.0, 12.0), epsilon = 1e-6);

    let frame = CameraFrame::from_extent(&extent, camera.fov_radians());
    assert_relative_eq!(frame.max_dimension, 20.0, epsilon = 1e-6);
    frame.apply(&mut camera, &mut controls);

    let offset = camera.position - extent.center;
    assert_relative_eq!(offset.x, frame.distance, epsilon = 1e-9);
    assert_relative_eq!(offset.y, frame.distance, epsilon = 1e-9);
    assert_relative_eq!(offset.z, frame.distance, epsilon = 1e-9);
    assert_eq!(controls.target, extent.center);

    // A damped update right after framing must not drift the camera
    controls.update(&mut camera);
    assert_relative_eq!(camera.position - extent.center, offset, epsilon = 1e-6);
}

#[test]
fn empty_model_uses_minimum_distance() {
    let root = SceneNode::group("empty").with_child(SceneNode::group("no-geometry"));
    let extent = compute_bounds(&root);
    let distance = compute_frame_distance(&extent.size, 45f64.to_radians());
    assert_eq!(distance, MIN_FRAME_DISTANCE);
}
