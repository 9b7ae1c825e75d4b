// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Asynchronous model loading
//!
//! [`ModelLoader::load`] turns file bytes into a lazy future: nothing happens
//! until it is first polled, and dropping it cancels the load. The callback
//! based parser contract is bridged through a oneshot channel.

use crate::blob::BlobStore;
use crate::error::LoadError;
use crate::parser::{ModelParser, ParseRequest};
use bytes::Bytes;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use ifcview_core::{ModelMetadata, SceneNode};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// A user-selected file: name plus contents.
#[derive(Debug, Clone)]
pub struct ModelFile {
    pub name: String,
    pub bytes: Bytes,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Successful load result.
#[derive(Debug)]
pub struct LoadedModel {
    pub root: SceneNode,
    pub metadata: ModelMetadata,
}

/// Wraps the parser collaborator and the object URL store.
#[derive(Clone)]
pub struct ModelLoader {
    parser: Rc<dyn ModelParser>,
    blobs: Rc<BlobStore>,
}

impl ModelLoader {
    pub fn new(parser: Rc<dyn ModelParser>, blobs: Rc<BlobStore>) -> Self {
        Self { parser, blobs }
    }

    pub fn parser(&self) -> &dyn ModelParser {
        &*self.parser
    }

    pub fn blobs(&self) -> &Rc<BlobStore> {
        &self.blobs
    }

    /// Load `file` into a scene graph root with summary counts.
    ///
    /// The object URL handed to the parser is revoked once both the parser
    /// has released its request and this future has completed or been
    /// dropped. A parser that panics inside `load` yields
    /// [`LoadError::Unexpected`].
    pub fn load(&self, file: ModelFile) -> LocalBoxFuture<'static, Result<LoadedModel, LoadError>> {
        let parser = Rc::clone(&self.parser);
        let blobs = Rc::clone(&self.blobs);

        async move {
            let ModelFile { name, bytes } = file;
            let size = bytes.len();
            let source = Rc::new(blobs.create_object_url(bytes));
            tracing::debug!(name = %name, size, url = %source.as_str(), "Starting model parse");

            let (tx, rx) = oneshot::channel();
            let request = ParseRequest::new(Rc::clone(&source));
            let started = panic::catch_unwind(AssertUnwindSafe(|| {
                parser.load(
                    request,
                    Box::new(move |result| {
                        // Receiver is gone when the load was cancelled
                        let _ = tx.send(result);
                    }),
                )
            }));
            if let Err(payload) = started {
                let message = panic_message(payload.as_ref());
                tracing::error!(name = %name, panic = %message, "Parser panicked");
                return Err(LoadError::Unexpected(format!("parser panicked: {message}")));
            }

            let outcome = rx.await;
            drop(source);

            match outcome {
                Ok(Ok(root)) => {
                    let metadata = ModelMetadata::from_root(name, &root);
                    tracing::debug!(
                        name = %metadata.name,
                        element_count = metadata.element_count,
                        node_count = metadata.node_count,
                        "Model parsed"
                    );
                    Ok(LoadedModel { root, metadata })
                }
                Ok(Err(err)) => Err(LoadError::Parse(err)),
                Err(oneshot::Canceled) => Err(LoadError::Unexpected(
                    "parser dropped the completion callback without reporting".into(),
                )),
            }
        }
        .boxed_local()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("blobs", &self.blobs)
            .finish_non_exhaustive()
    }
}
