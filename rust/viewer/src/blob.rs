// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object URLs for in-memory file payloads
//!
//! The parser collaborator takes a resource locator rather than raw bytes.
//! [`BlobStore`] mints `blob:` locators for byte payloads and [`ObjectUrl`]
//! revokes its locator when dropped, so every exit path of a load releases
//! the payload exactly once.

use bytes::Bytes;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

const URL_PREFIX: &str = "blob:ifcview/";

/// Registry of live object URLs for one viewer instance.
#[derive(Default)]
pub struct BlobStore {
    entries: RefCell<FxHashMap<String, Bytes>>,
}

impl BlobStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register `bytes` and return an owning handle to its locator
    pub fn create_object_url(self: &Rc<Self>, bytes: Bytes) -> ObjectUrl {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        tracing::trace!(url = %url, size = bytes.len(), "Created object URL");
        self.entries.borrow_mut().insert(url.clone(), bytes);
        ObjectUrl {
            url,
            store: Rc::clone(self),
        }
    }

    /// Resolve a live locator to its payload
    pub fn fetch(&self, url: &str) -> Option<Bytes> {
        self.entries.borrow().get(url).cloned()
    }

    /// Number of locators not yet revoked
    pub fn live_count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn revoke(&self, url: &str) -> bool {
        self.entries.borrow_mut().remove(url).is_some()
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning handle to a live object URL. Revoked on drop.
pub struct ObjectUrl {
    url: String,
    store: Rc<BlobStore>,
}

impl ObjectUrl {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Payload behind this locator
    pub fn bytes(&self) -> Option<Bytes> {
        self.store.fetch(&self.url)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if self.store.revoke(&self.url) {
            tracing::trace!(url = %self.url, "Revoked object URL");
        }
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_revoke_on_drop() {
        let store = BlobStore::new();
        let url = store.create_object_url(Bytes::from_static(b"ISO-10303-21;"));
        assert!(url.as_str().starts_with(URL_PREFIX));
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.fetch(url.as_str()).unwrap(), Bytes::from_static(b"ISO-10303-21;"));

        let locator = url.as_str().to_string();
        drop(url);
        assert_eq!(store.live_count(), 0);
        assert!(store.fetch(&locator).is_none());
    }

    #[test]
    fn test_shared_handle_revokes_after_last_clone() {
        let store = BlobStore::new();
        let url = Rc::new(store.create_object_url(Bytes::from_static(b"data")));
        let parser_side = Rc::clone(&url);

        drop(url);
        assert_eq!(store.live_count(), 1);
        assert!(parser_side.bytes().is_some());

        drop(parser_side);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_urls_are_distinct() {
        let store = BlobStore::new();
        let a = store.create_object_url(Bytes::new());
        let b = store.create_object_url(Bytes::new());
        assert_ne!(a.as_str(), b.as_str());
        assert_eq!(store.live_count(), 2);
    }
}
