// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Perspective camera

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// Right-handed, Y-up perspective camera.
///
/// `fov` is the vertical field of view in degrees. The projection matrix is
/// cached and only recomputed by [`update_projection_matrix`](Self::update_projection_matrix),
/// so callers changing `aspect`, `fov`, `near` or `far` must call it.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
    pub up: Vector3<f64>,
    /// Point the camera is oriented towards
    pub target: Point3<f64>,
    projection: Matrix4<f64>,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Point3::origin(),
            up: Vector3::y(),
            target: Point3::new(0.0, 0.0, -1.0),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    #[inline]
    pub fn fov_radians(&self) -> f64 {
        self.fov.to_radians()
    }

    /// Orient the camera towards `target` without moving it
    pub fn look_at(&mut self, target: Point3<f64>) {
        self.target = target;
    }

    /// Recompute the cached projection from fov/aspect/near/far.
    ///
    /// Degenerate parameters (zero aspect, zero fov, near >= far) leave the
    /// previous projection in place.
    pub fn update_projection_matrix(&mut self) {
        let fovy = self.fov_radians();
        let valid = self.aspect.is_finite()
            && self.aspect > 0.0
            && fovy > 0.0
            && fovy < std::f64::consts::PI
            && self.near > 0.0
            && self.far > self.near;
        if valid {
            self.projection = Perspective3::new(self.aspect, fovy, self.near, self.far).into_inner();
        }
    }

    #[inline]
    pub fn projection_matrix(&self) -> &Matrix4<f64> {
        &self.projection
    }

    /// World-to-view transform. Falls back to identity when the camera sits
    /// on its own target.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        if (self.target - self.position).norm_squared() <= f64::EPSILON {
            return Matrix4::identity();
        }
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection * self.view_matrix()
    }

    /// Unit vector from the camera towards its target
    pub fn direction(&self) -> Vector3<f64> {
        (self.target - self.position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| -Vector3::z())
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 1.0, 0.1, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_projection_tracks_aspect() {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 1000.0);
        let square = *camera.projection_matrix();

        camera.aspect = 2.0;
        camera.update_projection_matrix();
        assert_relative_eq!(camera.projection_matrix()[(0, 0)], square[(0, 0)] / 2.0);
        assert_relative_eq!(camera.projection_matrix()[(1, 1)], square[(1, 1)]);
    }

    #[test]
    fn test_degenerate_aspect_keeps_projection() {
        let mut camera = PerspectiveCamera::default();
        let before = *camera.projection_matrix();

        camera.aspect = 0.0;
        camera.update_projection_matrix();
        assert_eq!(*camera.projection_matrix(), before);
    }

    #[test]
    fn test_look_at_direction() {
        let mut camera = PerspectiveCamera::default();
        camera.position = Point3::new(1.0, 1.0, 1.0);
        camera.look_at(Point3::origin());

        let expected = -Vector3::new(1.0, 1.0, 1.0).normalize();
        assert_relative_eq!(camera.direction(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_view_matrix_maps_target_onto_negative_z() {
        let mut camera = PerspectiveCamera::default();
        camera.position = Point3::new(0.0, 0.0, 10.0);
        camera.look_at(Point3::origin());

        let in_view = camera.view_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(in_view, Point3::new(0.0, 0.0, -10.0), epsilon = 1e-12);
    }
}
