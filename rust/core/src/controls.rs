// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orbit controls
//!
//! User input only accumulates deltas; nothing touches the camera until
//! [`OrbitControls::update`] runs, normally once per rendered frame.
//! With damping enabled the deltas decay over subsequent frames instead of
//! being consumed at once.

use crate::camera::PerspectiveCamera;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Keeps the polar angle away from the poles where `look_at` degenerates
const POLAR_EPSILON: f64 = 1e-6;

/// Residual motion below this is dropped
const MOTION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around
    pub target: Point3<f64>,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping
    pub damping_factor: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Pending azimuth change (radians, around +Y)
    theta_delta: f64,
    /// Pending polar change (radians, from +Y)
    phi_delta: f64,
    /// Pending distance multiplier
    scale: f64,
    pan_offset: Vector3<f64>,
}

impl OrbitControls {
    pub fn new(target: Point3<f64>) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vector3::zeros(),
        }
    }

    /// Queue an orbit by `theta` (azimuth) and `phi` (polar) radians
    pub fn rotate(&mut self, theta: f64, phi: f64) {
        self.theta_delta += theta;
        self.phi_delta += phi;
    }

    /// Queue a distance change; `scale < 1` moves closer
    pub fn dolly(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale *= scale;
        }
    }

    /// Queue a translation of both target and camera
    pub fn pan(&mut self, offset: Vector3<f64>) {
        self.pan_offset += offset;
    }

    /// Move the orbit centre and drop any motion still in flight
    pub fn sync_target(&mut self, target: Point3<f64>) {
        self.target = target;
        self.clear_motion();
    }

    pub fn clear_motion(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vector3::zeros();
    }

    /// Whether any queued motion remains
    pub fn is_moving(&self) -> bool {
        self.theta_delta.abs() > MOTION_EPSILON
            || self.phi_delta.abs() > MOTION_EPSILON
            || (self.scale - 1.0).abs() > MOTION_EPSILON
            || self.pan_offset.norm() > MOTION_EPSILON
    }

    /// Apply pending motion to `camera` and re-aim it at the target.
    ///
    /// Returns true if the camera position changed.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let offset = camera.position - self.target;
        let radius = offset.norm();

        let (step_theta, step_phi, step_pan) = if self.enable_damping {
            (
                self.theta_delta * self.damping_factor,
                self.phi_delta * self.damping_factor,
                self.pan_offset * self.damping_factor,
            )
        } else {
            (self.theta_delta, self.phi_delta, self.pan_offset)
        };

        self.target += step_pan;

        if radius > f64::EPSILON {
            // Spherical coordinates around +Y
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            theta += step_theta;
            phi = (phi + step_phi).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

            let new_radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
            let sin_phi = phi.sin();
            let new_offset = Vector3::new(
                new_radius * sin_phi * theta.sin(),
                new_radius * phi.cos(),
                new_radius * sin_phi * theta.cos(),
            );
            camera.position = self.target + new_offset;
        } else {
            camera.position += step_pan;
        }
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
            self.scale = 1.0;
            if !self.is_moving() {
                self.clear_motion();
            }
        } else {
            self.clear_motion();
        }

        (camera.position - before).norm_squared() > MOTION_EPSILON * MOTION_EPSILON
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: Point3<f64>) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::default();
        camera.position = position;
        camera.look_at(Point3::origin());
        camera
    }

    #[test]
    fn test_idle_update_keeps_camera() {
        let mut camera = camera_at(Point3::new(20.0, 20.0, 20.0));
        let mut controls = OrbitControls::default();

        controls.update(&mut camera);
        assert_relative_eq!(camera.position, Point3::new(20.0, 20.0, 20.0), epsilon = 1e-9);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_rotate_without_damping_is_immediate() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::default();

        controls.rotate(std::f64::consts::FRAC_PI_2, 0.0);
        assert!(controls.update(&mut camera));
        assert_relative_eq!(camera.position, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-9);
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_damping_spreads_motion_over_frames() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        controls.damping_factor = 0.5;

        controls.rotate(1.0, 0.0);
        controls.update(&mut camera);
        assert!(controls.is_moving());

        let first_angle = camera.position.x.atan2(camera.position.z);
        assert_relative_eq!(first_angle, 0.5, epsilon = 1e-9);

        controls.update(&mut camera);
        let second_angle = camera.position.x.atan2(camera.position.z);
        assert_relative_eq!(second_angle, 0.75, epsilon = 1e-9);

        // Distance to the target is preserved while orbiting
        assert_relative_eq!((camera.position - controls.target).norm(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::default();

        controls.rotate(0.0, -10.0);
        controls.update(&mut camera);
        assert!(camera.position.x.is_finite());
        assert!(camera.position.y < 10.0 && camera.position.y > 9.99);
    }

    #[test]
    fn test_dolly_respects_limits() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::default();
        controls.min_distance = 4.0;

        controls.dolly(0.1);
        controls.update(&mut camera);
        assert_relative_eq!((camera.position - controls.target).norm(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sync_target_drops_pending_motion() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::default();

        controls.rotate(1.0, 0.5);
        controls.pan(Vector3::new(1.0, 0.0, 0.0));
        controls.sync_target(Point3::new(0.0, 0.0, 5.0));
        assert!(!controls.is_moving());

        controls.update(&mut camera);
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_eq!(camera.target, Point3::new(0.0, 0.0, 5.0));
    }
}
