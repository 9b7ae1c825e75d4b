// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renderer seam
//!
//! [`RenderBackend`] creates render surfaces; [`Renderer`] draws a
//! [`Scene`] from a camera. GPU backends plug in here.
//! [`HeadlessRenderer`] is the offscreen implementation: it tracks uploaded
//! meshes and per-frame draw statistics without touching a GPU.

use crate::error::{Result, ViewerError};
use crate::scene::Scene;
use ifcview_core::{Matrix4, NodeId, NodeKind, PerspectiveCamera, SceneNode};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Snapshot of a renderer's state, for diagnostics and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    /// Frames rendered since creation
    pub frames: u64,
    /// Meshes currently uploaded
    pub resident_meshes: usize,
    /// Triangles currently uploaded
    pub resident_triangles: usize,
    /// Draw calls issued by the most recent frame
    pub last_draw_calls: usize,
    pub disposed: bool,
}

/// A render surface bound to one viewport.
pub trait Renderer {
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Resize the drawing buffer, in CSS pixels
    fn set_size(&mut self, width: u32, height: u32);

    fn size(&self) -> (u32, u32);

    /// Draw `scene` as seen from `camera`
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);

    /// Free resources uploaded for `node` and its descendants
    fn release(&mut self, node: &SceneNode);

    /// Free the surface and everything uploaded to it. Idempotent.
    fn dispose(&mut self);

    fn stats(&self) -> RenderStats;
}

/// Creates render surfaces.
pub trait RenderBackend {
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
        pixel_ratio: f64,
    ) -> Result<Box<dyn Renderer>>;
}

#[derive(Debug, Clone, Copy)]
struct ResidentMesh {
    triangles: usize,
}

/// Offscreen renderer that keeps bookkeeping only.
#[derive(Debug)]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    frames: u64,
    resident: FxHashMap<NodeId, ResidentMesh>,
    last_draw_calls: usize,
    last_view_projection: Matrix4<f64>,
    disposed: bool,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
            frames: 0,
            resident: FxHashMap::default(),
            last_draw_calls: 0,
            last_view_projection: Matrix4::identity(),
            disposed: false,
        }
    }

    /// Combined view-projection used by the most recent frame
    pub fn last_view_projection(&self) -> &Matrix4<f64> {
        &self.last_view_projection
    }

    /// Drawing buffer size in device pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.pixel_ratio).round() as u32,
            (self.height as f64 * self.pixel_ratio).round() as u32,
        )
    }
}

impl Renderer for HeadlessRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        if ratio.is_finite() && ratio > 0.0 {
            self.pixel_ratio = ratio;
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        if self.disposed {
            return;
        }

        self.last_view_projection = camera.view_projection();

        let mut draw_calls = 0;
        for node in scene.nodes() {
            match &node.kind {
                NodeKind::Mesh(mesh) if !mesh.is_empty() => {
                    // Upload lazily on first sight
                    self.resident.entry(node.id()).or_insert(ResidentMesh {
                        triangles: mesh.triangle_count(),
                    });
                    draw_calls += 1;
                }
                NodeKind::Grid(_) => draw_calls += 1,
                _ => {}
            }
        }

        self.last_draw_calls = draw_calls;
        self.frames += 1;
    }

    fn release(&mut self, node: &SceneNode) {
        for descendant in node.descendants() {
            self.resident.remove(&descendant.id());
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.resident.clear();
        self.last_draw_calls = 0;
        self.disposed = true;
    }

    fn stats(&self) -> RenderStats {
        RenderStats {
            width: self.width,
            height: self.height,
            pixel_ratio: self.pixel_ratio,
            frames: self.frames,
            resident_meshes: self.resident.len(),
            resident_triangles: self.resident.values().map(|m| m.triangles).sum(),
            last_draw_calls: self.last_draw_calls,
            disposed: self.disposed,
        }
    }
}

/// Backend producing [`HeadlessRenderer`] surfaces.
///
/// `fail_with` makes every creation attempt fail, which is how hosts without
/// a usable surface are simulated.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    fail_with: Option<String>,
    created: Rc<RefCell<usize>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Number of surfaces created so far, shared between clones
    pub fn surfaces_created(&self) -> usize {
        *self.created.borrow()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
        pixel_ratio: f64,
    ) -> Result<Box<dyn Renderer>> {
        if let Some(reason) = &self.fail_with {
            return Err(ViewerError::ResourceInit(reason.clone()));
        }
        *self.created.borrow_mut() += 1;
        Ok(Box::new(HeadlessRenderer::new(width, height, pixel_ratio)))
    }
}
