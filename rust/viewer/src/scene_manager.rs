// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistent rendering state for one mounted viewport
//!
//! The host drives the render loop: it calls [`SceneManager::on_frame`] on
//! every display refresh and [`SceneManager::on_resize`] whenever the
//! surface changes size. Both are cheap no-ops when there is nothing to do.

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::render::{RenderBackend, RenderStats, Renderer};
use crate::scene::Scene;
use crate::timing::{FrameStats, FrameTiming};
use ifcview_core::{compute_bounds, CameraFrame, OrbitControls, PerspectiveCamera, SceneNode};
use std::time::Instant;

/// Camera, render surface and controls, created together by `initialize`.
pub struct Viewport {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    renderer: Box<dyn Renderer>,
}

impl Viewport {
    pub fn renderer(&self) -> &dyn Renderer {
        &*self.renderer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Faulted,
    Disposed,
}

/// Owns the scene graph, camera, renderer, controls and render loop state.
pub struct SceneManager {
    config: ViewerConfig,
    backend: Box<dyn RenderBackend>,
    scene: Scene,
    viewport: Option<Viewport>,
    lifecycle: Lifecycle,
    fault: Option<String>,
    loop_running: bool,
    resize_attached: bool,
    timing: FrameTiming,
}

impl SceneManager {
    pub fn new(config: ViewerConfig, backend: Box<dyn RenderBackend>) -> Self {
        let scene = Scene::new(config.background);
        Self {
            config,
            backend,
            scene,
            viewport: None,
            lifecycle: Lifecycle::Uninitialized,
            fault: None,
            loop_running: false,
            resize_attached: false,
            timing: FrameTiming::new(),
        }
    }

    /// Create the camera, render surface, controls and scene furniture, then
    /// start the render loop.
    ///
    /// Idempotent: a second call while initialized does nothing. Zero
    /// dimensions fall back to the configured surface size. A failed surface
    /// creation is fatal; later calls report it without retrying.
    pub fn initialize(&mut self, surface_width: u32, surface_height: u32) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Ready => {
                tracing::debug!("Scene already initialized");
                return Ok(());
            }
            Lifecycle::Faulted => {
                return Err(ViewerError::Faulted(self.fault.clone().unwrap_or_default()));
            }
            Lifecycle::Disposed => return Err(ViewerError::Disposed),
            Lifecycle::Uninitialized => {}
        }

        let width = if surface_width == 0 { self.config.fallback_width } else { surface_width };
        let height = if surface_height == 0 { self.config.fallback_height } else { surface_height };

        let mut renderer = match self.backend.create_renderer(width, height, self.config.pixel_ratio) {
            Ok(renderer) => renderer,
            Err(err) => {
                tracing::error!(error = %err, width, height, "Render surface creation failed");
                self.lifecycle = Lifecycle::Faulted;
                self.fault = Some(err.to_string());
                return Err(err);
            }
        };
        renderer.set_pixel_ratio(self.config.pixel_ratio);
        renderer.set_size(width, height);

        let mut camera = PerspectiveCamera::new(
            self.config.camera_fov,
            width as f64 / height as f64,
            self.config.camera_near,
            self.config.camera_far,
        );
        camera.position = self.config.initial_camera_position;

        let mut controls = OrbitControls::default();
        controls.enable_damping = self.config.enable_damping;
        controls.damping_factor = self.config.damping_factor;
        camera.look_at(controls.target);

        let model = self.scene.replace_model(None);
        self.scene = Scene::with_default_furniture(self.config.background);
        self.scene.replace_model(model);

        self.viewport = Some(Viewport {
            camera,
            controls,
            renderer,
        });
        self.lifecycle = Lifecycle::Ready;
        self.resize_attached = true;

        tracing::info!(width, height, pixel_ratio = self.config.pixel_ratio, "Scene initialized");
        self.start_render_loop();
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    #[inline]
    pub fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        self.viewport.as_mut()
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.viewport.as_ref().map(|v| &v.camera)
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.viewport.as_ref().map(|v| &v.controls)
    }

    pub fn render_stats(&self) -> Option<RenderStats> {
        self.viewport.as_ref().map(|v| v.renderer.stats())
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.timing.stats()
    }

    /// Detach and release the current model, then attach `model` as the only
    /// model subtree. `None` leaves the scene empty.
    pub fn replace_model(&mut self, model: Option<SceneNode>) {
        if self.is_disposed() {
            tracing::warn!("Ignoring model replacement on disposed scene");
            return;
        }

        if let Some(previous) = self.scene.replace_model(model) {
            if let Some(viewport) = self.viewport.as_mut() {
                viewport.renderer.release(&previous);
            }
            tracing::debug!(name = %previous.name, "Released previous model");
        }
    }

    /// Frame the camera on the current model's bounding box.
    ///
    /// Returns the applied frame, or `None` without a model or viewport.
    pub fn frame_model(&mut self) -> Option<CameraFrame> {
        let model = self.scene.model()?;
        let viewport = self.viewport.as_mut()?;

        let extent = compute_bounds(model);
        let frame = CameraFrame::from_extent(&extent, viewport.camera.fov_radians());
        frame.apply(&mut viewport.camera, &mut viewport.controls);
        viewport.controls.update(&mut viewport.camera);

        tracing::debug!(
            center = ?frame.center,
            max_dimension = frame.max_dimension,
            distance = frame.distance,
            "Framed camera on model"
        );
        Some(frame)
    }

    /// Returns false if the loop cannot run (not initialized or disposed)
    pub fn start_render_loop(&mut self) -> bool {
        if !self.is_initialized() {
            return false;
        }
        if !self.loop_running {
            self.loop_running = true;
            self.timing.reset_cadence();
            tracing::debug!("Render loop started");
        }
        true
    }

    pub fn stop_render_loop(&mut self) {
        if self.loop_running {
            self.loop_running = false;
            tracing::debug!("Render loop stopped");
        }
    }

    #[inline]
    pub fn is_render_loop_running(&self) -> bool {
        self.loop_running
    }

    /// One display refresh: update controls, then render.
    ///
    /// Returns whether a frame was drawn. Refreshes arriving while the loop
    /// is stopped are dropped, not queued.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.loop_running {
            return false;
        }
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };

        viewport.controls.update(&mut viewport.camera);
        viewport.renderer.render(&self.scene, &viewport.camera);
        self.timing.record(now);
        true
    }

    /// Track a new surface size.
    ///
    /// A zero width or a zero height is a transient layout state: the call is
    /// a no-op and the previous aspect ratio and surface size are kept.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if !self.resize_attached {
            return;
        }
        let Some(viewport) = self.viewport.as_mut() else {
            return;
        };
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "Ignoring zero-size resize");
            return;
        }

        viewport.camera.aspect = width as f64 / height as f64;
        viewport.camera.update_projection_matrix();
        viewport.renderer.set_size(width, height);
    }

    /// Stop the loop, release the surface and detach resize handling.
    /// Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }

        self.stop_render_loop();
        self.resize_attached = false;
        if let Some(viewport) = self.viewport.as_mut() {
            if let Some(model) = self.scene.replace_model(None) {
                viewport.renderer.release(&model);
            }
            viewport.renderer.dispose();
        }
        self.lifecycle = Lifecycle::Disposed;
        tracing::info!("Scene disposed");
    }
}

impl Drop for SceneManager {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use approx::assert_relative_eq;
    use ifcview_core::{Mesh, Point3};

    fn manager() -> (SceneManager, HeadlessBackend) {
        let backend = HeadlessBackend::new();
        let manager = SceneManager::new(ViewerConfig::default(), Box::new(backend.clone()));
        (manager, backend)
    }

    fn cube_model(name: &str) -> SceneNode {
        SceneNode::group(name).with_child(SceneNode::mesh(
            "cube",
            Mesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0)),
        ))
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (mut manager, backend) = manager();
        manager.initialize(800, 600).unwrap();
        manager.initialize(1024, 768).unwrap();

        assert_eq!(backend.surfaces_created(), 1);
        assert_eq!(manager.render_stats().unwrap().width, 800);
        assert!(manager.is_render_loop_running());
        assert_eq!(manager.scene().furniture().len(), 3);

        assert!(manager.on_frame(Instant::now()));
        assert_eq!(manager.render_stats().unwrap().frames, 1);
    }

    #[test]
    fn test_initialize_zero_size_uses_fallback() {
        let (mut manager, _) = manager();
        manager.initialize(0, 0).unwrap();
        let stats = manager.render_stats().unwrap();
        assert_eq!((stats.width, stats.height), (1280, 720));
        assert_relative_eq!(manager.camera().unwrap().aspect, 1280.0 / 720.0);
    }

    #[test]
    fn test_failed_surface_is_not_retried() {
        let backend = HeadlessBackend::failing("context lost");
        let mut manager = SceneManager::new(ViewerConfig::default(), Box::new(backend));

        assert_eq!(
            manager.initialize(10, 10),
            Err(ViewerError::ResourceInit("context lost".into()))
        );
        assert!(matches!(manager.initialize(10, 10), Err(ViewerError::Faulted(_))));
        assert!(!manager.start_render_loop());
    }

    #[test]
    fn test_replace_model_releases_previous() {
        let (mut manager, _) = manager();
        manager.initialize(100, 100).unwrap();

        manager.replace_model(Some(cube_model("first")));
        manager.on_frame(Instant::now());
        assert_eq!(manager.render_stats().unwrap().resident_meshes, 1);

        manager.replace_model(Some(cube_model("second")));
        assert_eq!(manager.render_stats().unwrap().resident_meshes, 0);
        assert_eq!(manager.scene().model().unwrap().name, "second");
        assert_eq!(manager.scene().roots().count(), 4);

        manager.replace_model(None);
        assert!(manager.scene().model().is_none());
    }

    #[test]
    fn test_resize_guards_zero_dimensions() {
        let (mut manager, _) = manager();
        manager.on_resize(100, 0); // before initialize: no-op
        manager.initialize(400, 200).unwrap();

        manager.on_resize(300, 0);
        assert_relative_eq!(manager.camera().unwrap().aspect, 2.0);
        assert_eq!(manager.render_stats().unwrap().width, 400);

        manager.on_resize(0, 300);
        assert_relative_eq!(manager.camera().unwrap().aspect, 2.0);
        assert_eq!(manager.render_stats().unwrap().height, 200);

        manager.on_resize(300, 300);
        manager.on_resize(300, 300);
        assert_relative_eq!(manager.camera().unwrap().aspect, 1.0);
        assert_eq!(manager.render_stats().unwrap().height, 300);
    }

    #[test]
    fn test_stop_halts_frames() {
        let (mut manager, _) = manager();
        manager.initialize(10, 10).unwrap();
        manager.stop_render_loop();
        assert!(!manager.on_frame(Instant::now()));

        assert!(manager.start_render_loop());
        assert!(manager.start_render_loop());
        assert!(manager.on_frame(Instant::now()));
        assert_eq!(manager.render_stats().unwrap().frames, 1);
    }

    #[test]
    fn test_frame_model() {
        let (mut manager, _) = manager();
        assert!(manager.frame_model().is_none());
        manager.initialize(10, 10).unwrap();
        manager.replace_model(Some(cube_model("m")));

        let frame = manager.frame_model().unwrap();
        assert_relative_eq!(frame.center, Point3::new(1.0, 1.0, 1.0));
        let camera = manager.camera().unwrap();
        assert_relative_eq!(camera.target, frame.center, epsilon = 1e-9);
        assert_relative_eq!(camera.position.x - 1.0, frame.distance, epsilon = 1e-6);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut manager, _) = manager();
        manager.initialize(10, 10).unwrap();
        manager.replace_model(Some(cube_model("m")));

        manager.dispose();
        manager.dispose();

        let stats = manager.render_stats().unwrap();
        assert!(stats.disposed);
        assert!(!manager.on_frame(Instant::now()));
        manager.on_resize(50, 50);
        assert_eq!(manager.render_stats().unwrap().width, 10);
        assert_eq!(manager.initialize(10, 10), Err(ViewerError::Disposed));
    }
}
