// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contract with the external model parser
//!
//! The parser is an opaque capability: it receives a locator and reports a
//! scene graph root, or a failure, through a completion callback. It may
//! complete synchronously inside [`ModelParser::load`] or at any later point
//! on the same thread.

use crate::blob::ObjectUrl;
use crate::error::ParseError;
use bytes::Bytes;
use ifcview_core::SceneNode;
use std::rc::Rc;

/// Completion callback. Success and failure share one `FnOnce`, so the
/// parser can report at most one outcome.
pub type ParseCallback = Box<dyn FnOnce(Result<SceneNode, ParseError>)>;

/// Input handed to the parser for one load.
///
/// Holds a share of the load's object URL; the locator stays live until both
/// the parser has dropped its request and the load itself has resolved.
pub struct ParseRequest {
    source: Rc<ObjectUrl>,
}

impl ParseRequest {
    pub(crate) fn new(source: Rc<ObjectUrl>) -> Self {
        Self { source }
    }

    /// Resource locator to parse
    #[inline]
    pub fn url(&self) -> &str {
        self.source.as_str()
    }

    /// File contents behind the locator
    pub fn read(&self) -> Option<Bytes> {
        self.source.bytes()
    }
}

impl std::fmt::Debug for ParseRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseRequest").field("url", &self.url()).finish()
    }
}

/// The external parser collaborator.
pub trait ModelParser {
    /// Point the parser at its auxiliary binary support files.
    ///
    /// Called once, during viewer initialization, before any load.
    fn set_support_path(&self, path: &str, absolute: bool);

    /// Start parsing `request`. Exactly one call to `on_complete` reports the
    /// outcome; dropping it uncalled is treated as an unexpected failure.
    fn load(&self, request: ParseRequest, on_complete: ParseCallback);
}
