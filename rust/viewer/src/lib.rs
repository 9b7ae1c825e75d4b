// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Viewer
//!
//! Scene lifecycle, asynchronous model loading and camera auto-framing.
//!
//! ## Overview
//!
//! - [`ModelLoader`]: bridges the callback-based [`ModelParser`] collaborator
//!   into a lazy, cancelable future producing a scene graph root plus
//!   [`ModelMetadata`](ifcview_core::ModelMetadata)
//! - [`SceneManager`]: owns scene, camera, renderer and controls; drives the
//!   render loop, resize handling and teardown
//! - [`ViewerController`]: the per-viewer load state machine with
//!   last-request-wins semantics and outward [`ViewerEvent`]s
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::executor::LocalPool;
//! use ifcview_viewer::{HeadlessBackend, ModelFile, ViewerConfig, ViewerController};
//!
//! let mut pool = LocalPool::new();
//! let (viewer, mut events) = ViewerController::new(
//!     ViewerConfig::from_env(),
//!     parser, // Rc<dyn ModelParser>
//!     Box::new(HeadlessBackend::new()),
//!     pool.spawner(),
//! );
//! viewer.initialize(1280, 720)?;
//! viewer.set_file(ModelFile::new("house.ifc", bytes));
//! pool.run_until_stalled();
//! ```

pub mod blob;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod loader;
pub mod parser;
pub mod render;
pub mod scene;
pub mod scene_manager;
pub mod timing;

pub use blob::{BlobStore, ObjectUrl};
pub use config::ViewerConfig;
pub use controller::{ViewerController, ViewerState};
pub use error::{LoadError, ParseError, Result, ViewerError};
pub use events::{LoadOutcome, ViewerEvent};
pub use loader::{LoadedModel, ModelFile, ModelLoader};
pub use parser::{ModelParser, ParseCallback, ParseRequest};
pub use render::{HeadlessBackend, HeadlessRenderer, RenderBackend, RenderStats, Renderer};
pub use scene::Scene;
pub use scene_manager::{SceneManager, Viewport};
pub use timing::{FrameStats, FrameTiming};
