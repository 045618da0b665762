//! Thread-safe handle to a document.
//!
//! A [`Document`] is single-writer. Hosts that drive it from more than one
//! thread (an input thread feeding drag events, a worker saving snapshots)
//! share a [`SharedDocument`] instead; every call runs under one lock, so
//! each operation stays atomic with respect to the others.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::document::Document;

/// A cloneable, lock-guarded [`Document`].
#[derive(Clone)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Run `f` with read access.
    pub fn with<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with write access.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the document back if this is the last handle.
    pub fn try_into_inner(self) -> Result<Document, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(doc) => f.debug_tuple("SharedDocument").field(&*doc).finish(),
            None => f.write_str("SharedDocument(<locked>)"),
        }
    }
}

static_assertions::assert_impl_all!(SharedDocument: Send, Sync);
