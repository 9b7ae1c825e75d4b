// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer orchestration
//!
//! [`ViewerController`] runs the per-viewer state machine
//! `Idle -> Loading -> {Ready, Failed} -> Loading -> ...`.
//!
//! Every `set_file` starts a new generation. A load's completion only
//! touches the scene if its generation is still the latest one and the
//! viewer has not been disposed; superseded loads are also aborted so their
//! futures (and object URLs) are dropped promptly.

use crate::blob::BlobStore;
use crate::config::ViewerConfig;
use crate::error::{LoadError, Result};
use crate::events::{LoadOutcome, ViewerEvent};
use crate::loader::{LoadedModel, ModelFile, ModelLoader};
use crate::parser::ModelParser;
use crate::render::RenderBackend;
use crate::scene_manager::SceneManager;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{AbortHandle, Aborted};
use futures::task::{LocalSpawn, LocalSpawnExt};
use ifcview_core::ModelMetadata;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Load state of one viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// State shared with in-flight load tasks
struct Shared {
    scene: SceneManager,
    state: ViewerState,
    generation: u64,
    in_flight: Option<AbortHandle>,
    metadata: Option<ModelMetadata>,
    disposed: bool,
    events: UnboundedSender<ViewerEvent>,
}

impl Shared {
    fn emit(&self, event: ViewerEvent) {
        if self.events.unbounded_send(event).is_err() {
            tracing::trace!("Event receiver dropped");
        }
    }

    /// Apply the result of load `generation` unless it has been superseded
    fn complete(&mut self, generation: u64, result: std::result::Result<LoadedModel, LoadError>) {
        if self.disposed || generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                disposed = self.disposed,
                "Discarding stale load result"
            );
            return;
        }
        self.in_flight = None;

        match result {
            Ok(LoadedModel { root, metadata }) => {
                self.scene.replace_model(Some(root));
                self.scene.frame_model();
                self.state = ViewerState::Ready;
                tracing::info!(
                    generation,
                    name = %metadata.name,
                    element_count = metadata.element_count,
                    node_count = metadata.node_count,
                    "Model loaded"
                );
                self.emit(ViewerEvent::Loaded(LoadOutcome::Metadata(metadata.clone())));
                self.metadata = Some(metadata);
            }
            Err(err) => {
                tracing::error!(generation, reason = err.reason(), error = %err, "Model load failed");
                self.state = ViewerState::Failed;
                self.emit(ViewerEvent::Loaded(LoadOutcome::Error {
                    error: err.user_message().to_string(),
                }));
            }
        }
    }
}

/// Coordinates file input, the model loader and the scene.
///
/// Everything runs on one thread: load tasks are spawned on the supplied
/// local executor and outcomes are delivered through the event receiver
/// returned by [`ViewerController::new`]. No public method panics or
/// returns a load failure directly; load outcomes are always events.
pub struct ViewerController {
    shared: Rc<RefCell<Shared>>,
    loader: ModelLoader,
    spawner: Box<dyn LocalSpawn>,
    config: ViewerConfig,
    parser_configured: Cell<bool>,
}

impl ViewerController {
    pub fn new(
        config: ViewerConfig,
        parser: Rc<dyn ModelParser>,
        backend: Box<dyn RenderBackend>,
        spawner: impl LocalSpawn + 'static,
    ) -> (Self, UnboundedReceiver<ViewerEvent>) {
        let (events, receiver) = mpsc::unbounded();
        let shared = Shared {
            scene: SceneManager::new(config.clone(), backend),
            state: ViewerState::Idle,
            generation: 0,
            in_flight: None,
            metadata: None,
            disposed: false,
            events,
        };

        let controller = Self {
            shared: Rc::new(RefCell::new(shared)),
            loader: ModelLoader::new(parser, BlobStore::new()),
            spawner: Box::new(spawner),
            config,
            parser_configured: Cell::new(false),
        };
        (controller, receiver)
    }

    /// Set up the scene and configure the parser's support path.
    ///
    /// Idempotent. Surface creation failures are returned and are fatal to
    /// this viewer.
    pub fn initialize(&self, surface_width: u32, surface_height: u32) -> Result<()> {
        self.shared
            .borrow_mut()
            .scene
            .initialize(surface_width, surface_height)?;

        if !self.parser_configured.replace(true) {
            self.loader.parser().set_support_path(
                &self.config.parser_support_path,
                self.config.parser_support_path_absolute,
            );
            tracing::debug!(path = %self.config.parser_support_path, "Configured parser support path");
        }
        Ok(())
    }

    /// Start loading `file`, superseding any load still in flight.
    pub fn set_file(&self, file: ModelFile) {
        let generation = {
            let mut shared = self.shared.borrow_mut();
            if shared.disposed {
                tracing::warn!(name = %file.name, "Ignoring file for disposed viewer");
                return;
            }

            shared.generation += 1;
            let generation = shared.generation;
            if let Some(previous) = shared.in_flight.take() {
                previous.abort();
                tracing::debug!(superseded = generation - 1, "Superseded in-flight load");
            }

            shared.state = ViewerState::Loading;
            shared.emit(ViewerEvent::LoadingStarted);
            tracing::info!(generation, name = %file.name, size = file.bytes.len(), "Loading model");

            if !shared.scene.is_initialized() {
                shared.complete(
                    generation,
                    Err(LoadError::Unexpected("viewer is not initialized".into())),
                );
                return;
            }
            generation
        };

        let (load, abort_handle) = futures::future::abortable(self.loader.load(file));
        self.shared.borrow_mut().in_flight = Some(abort_handle);

        let shared: Weak<RefCell<Shared>> = Rc::downgrade(&self.shared);
        let task = async move {
            let result = match load.await {
                Ok(result) => result,
                Err(Aborted) => return,
            };
            if let Some(shared) = shared.upgrade() {
                shared.borrow_mut().complete(generation, result);
            }
        };

        if let Err(err) = self.spawner.spawn_local(task) {
            self.shared.borrow_mut().complete(
                generation,
                Err(LoadError::Unexpected(format!("failed to schedule load: {err}"))),
            );
        }
    }

    /// Forward a display refresh to the render loop
    pub fn on_frame(&self, now: Instant) -> bool {
        self.shared.borrow_mut().scene.on_frame(now)
    }

    pub fn on_resize(&self, width: u32, height: u32) {
        self.shared.borrow_mut().scene.on_resize(width, height);
    }

    /// Tear down the scene. Loads still in flight become no-ops.
    pub fn dispose(&self) {
        let mut shared = self.shared.borrow_mut();
        if shared.disposed {
            return;
        }
        shared.disposed = true;
        shared.generation += 1;
        if let Some(handle) = shared.in_flight.take() {
            handle.abort();
        }
        shared.scene.dispose();
    }

    pub fn state(&self) -> ViewerState {
        self.shared.borrow().state
    }

    /// Generation of the most recently started load
    pub fn generation(&self) -> u64 {
        self.shared.borrow().generation
    }

    /// Metadata of the model currently displayed
    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.shared.borrow().metadata.clone()
    }

    pub fn blobs(&self) -> &Rc<BlobStore> {
        self.loader.blobs()
    }

    /// Run `f` with read access to the scene manager
    pub fn with_scene<R>(&self, f: impl FnOnce(&SceneManager) -> R) -> R {
        f(&self.shared.borrow().scene)
    }

    /// Run `f` with write access to the scene manager, e.g. to feed user
    /// input into the orbit controls
    pub fn with_scene_mut<R>(&self, f: impl FnOnce(&mut SceneManager) -> R) -> R {
        f(&mut self.shared.borrow_mut().scene)
    }
}

impl Drop for ViewerController {
    fn drop(&mut self) {
        self.dispose();
    }
}
