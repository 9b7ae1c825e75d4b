// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The viewer's scene: fixed furniture plus a single model slot

use ifcview_core::{Color, GridHelper, Light, NodeKind, Point3, SceneNode};

/// Root of everything the renderer draws.
///
/// Lights and the reference grid are furniture: they are created once and
/// cannot be removed through the model slot.
#[derive(Debug)]
pub struct Scene {
    pub background: Color,
    furniture: Vec<SceneNode>,
    model: Option<SceneNode>,
}

impl Scene {
    /// Empty scene without furniture
    pub fn new(background: Color) -> Self {
        Self {
            background,
            furniture: Vec::new(),
            model: None,
        }
    }

    /// Scene with ambient + directional lighting and a ground grid
    pub fn with_default_furniture(background: Color) -> Self {
        let mut scene = Self::new(background);

        scene.furniture.push(SceneNode::new(
            "ambient-light",
            NodeKind::AmbientLight(Light {
                color: Color::WHITE,
                intensity: 0.8,
            }),
        ));
        scene.furniture.push(
            SceneNode::new(
                "directional-light",
                NodeKind::DirectionalLight(Light {
                    color: Color::WHITE,
                    intensity: 1.0,
                }),
            )
            .with_position(Point3::new(10.0, 20.0, 10.0)),
        );
        scene.furniture.push(SceneNode::new(
            "grid",
            NodeKind::Grid(GridHelper {
                size: 100.0,
                divisions: 100,
                center_color: Color::from_hex(0x334155),
                line_color: Color::from_hex(0x1e293b),
            }),
        ));

        scene
    }

    #[inline]
    pub fn furniture(&self) -> &[SceneNode] {
        &self.furniture
    }

    #[inline]
    pub fn model(&self) -> Option<&SceneNode> {
        self.model.as_ref()
    }

    /// Swap the model slot, returning the detached previous model
    pub fn replace_model(&mut self, model: Option<SceneNode>) -> Option<SceneNode> {
        std::mem::replace(&mut self.model, model)
    }

    /// Top-level nodes: furniture first, then the model if any
    pub fn roots(&self) -> impl Iterator<Item = &SceneNode> {
        self.furniture.iter().chain(self.model.iter())
    }

    /// Every node in the scene, parent before children
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.roots().flat_map(SceneNode::descendants)
    }
}
