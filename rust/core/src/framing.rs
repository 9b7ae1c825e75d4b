// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera auto-framing
//!
//! The camera is placed on the fixed `(+1, +1, +1)` diagonal from the model
//! centre, far enough that the largest model dimension fits the vertical
//! field of view with [`MARGIN_FACTOR`] breathing room. Any orientation the
//! user had before is discarded.

use crate::bounds::BoxExtent;
use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;
use nalgebra::{Point3, Vector3};

/// Multiplier on the exact fit distance
pub const MARGIN_FACTOR: f64 = 2.0;

/// Distance used when the bounds are empty or the computation degenerates
pub const MIN_FRAME_DISTANCE: f64 = 10.0;

/// Derived framing parameters for one bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub center: Point3<f64>,
    pub max_dimension: f64,
    pub distance: f64,
}

impl CameraFrame {
    pub fn from_extent(extent: &BoxExtent, fov_radians: f64) -> Self {
        Self {
            center: extent.center,
            max_dimension: extent.max_dimension(),
            distance: compute_frame_distance(&extent.size, fov_radians),
        }
    }

    /// Apply this frame to a camera and its controls
    pub fn apply(&self, camera: &mut PerspectiveCamera, controls: &mut OrbitControls) {
        frame(camera, controls, self.center, self.distance);
    }
}

/// Distance along each diagonal axis at which a box of `size` fits the
/// vertical field of view.
///
/// Always strictly positive and finite: empty or degenerate boxes, and
/// field-of-view values that make the tangent blow up, return
/// [`MIN_FRAME_DISTANCE`].
pub fn compute_frame_distance(size: &Vector3<f64>, fov_radians: f64) -> f64 {
    let max_dim = size.x.max(size.y).max(size.z);
    if !(max_dim > 0.0) || !max_dim.is_finite() {
        return MIN_FRAME_DISTANCE;
    }

    let distance = (max_dim / 2.0 / (fov_radians / 2.0).tan()).abs() * MARGIN_FACTOR;
    if distance.is_finite() && distance > 0.0 {
        distance
    } else {
        MIN_FRAME_DISTANCE
    }
}

/// Place `camera` at `center + (distance, distance, distance)`, aim it at
/// `center` and move the orbit target there.
///
/// Deterministic and idempotent for the same inputs.
pub fn frame(
    camera: &mut PerspectiveCamera,
    controls: &mut OrbitControls,
    center: Point3<f64>,
    distance: f64,
) {
    camera.position = center + Vector3::new(distance, distance, distance);
    camera.look_at(center);
    controls.sync_target(center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FOV_45: f64 = std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_distance_formula() {
        let size = Vector3::new(10.0, 4.0, 2.0);
        let expected = 5.0 / (FOV_45 / 2.0).tan() * 2.0;
        assert_relative_eq!(compute_frame_distance(&size, FOV_45), expected);
    }

    #[test]
    fn test_distance_uses_largest_axis() {
        let a = compute_frame_distance(&Vector3::new(1.0, 8.0, 3.0), FOV_45);
        let b = compute_frame_distance(&Vector3::new(8.0, 1.0, 1.0), FOV_45);
        assert_relative_eq!(a, b);
    }

    #[test]
    fn test_distance_positive_for_non_empty() {
        for dim in [1e-9, 0.5, 1.0, 37.0, 1e6] {
            let distance = compute_frame_distance(&Vector3::new(dim, dim / 2.0, 0.0), FOV_45);
            assert!(distance.is_finite());
            assert!(distance > 0.0, "dim {dim} gave {distance}");
        }
    }

    #[test]
    fn test_degenerate_falls_back() {
        assert_eq!(compute_frame_distance(&Vector3::zeros(), FOV_45), MIN_FRAME_DISTANCE);
        assert_eq!(
            compute_frame_distance(&Vector3::new(f64::NAN, 0.0, 0.0), FOV_45),
            MIN_FRAME_DISTANCE
        );
        // tan(0) makes the fit distance infinite
        assert_eq!(compute_frame_distance(&Vector3::new(1.0, 1.0, 1.0), 0.0), MIN_FRAME_DISTANCE);
    }

    #[test]
    fn test_frame_places_camera_on_diagonal() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        let center = Point3::new(1.0, 2.0, 3.0);

        frame(&mut camera, &mut controls, center, 4.0);

        assert_eq!(camera.position, Point3::new(5.0, 6.0, 7.0));
        assert_eq!(camera.target, center);
        assert_eq!(controls.target, center);
    }

    #[test]
    fn test_frame_is_idempotent_and_ignores_prior_orientation() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        camera.position = Point3::new(-50.0, 3.0, 12.0);
        controls.rotate(0.7, 0.2);

        let frame_params = CameraFrame {
            center: Point3::origin(),
            max_dimension: 1.0,
            distance: 2.5,
        };
        frame_params.apply(&mut camera, &mut controls);
        let first = (camera.position, camera.target, controls.target);

        frame_params.apply(&mut camera, &mut controls);
        assert_eq!((camera.position, camera.target, controls.target), first);
        assert!(!controls.is_moving());
    }
}
