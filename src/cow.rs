use crate::element::Element;
use crate::MatrixData;
use log::trace;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CowState {
    /// At least one other matrix references the same store.
    Shared,
    /// The store is referenced only from here and is written in place.
    Owned,
}

/// Reference-counted store handle that privatizes on first write.
///
/// Handing the store to another matrix is a reference-count increment. The
/// first mutation through a handle whose store is still referenced elsewhere
/// deep-copies it, so no other holder ever observes the write.
#[derive(Debug)]
pub struct CowData<T> {
    data: Arc<MatrixData<T>>,
}

impl<T: Element> CowData<T> {
    pub fn new(data: MatrixData<T>) -> CowData<T> {
        CowData {
            data: Arc::new(data),
        }
    }

    pub(crate) fn from_arc(data: Arc<MatrixData<T>>) -> CowData<T> {
        CowData { data }
    }

    /// Another handle on the same store. No values are copied.
    pub fn share(&self) -> Arc<MatrixData<T>> {
        Arc::clone(&self.data)
    }

    pub fn state(&self) -> CowState {
        if Arc::strong_count(&self.data) > 1 {
            CowState::Shared
        } else {
            CowState::Owned
        }
    }

    pub fn data(&self) -> &MatrixData<T> {
        &self.data
    }

    /// Exclusive access to the store, copying it first when shared.
    pub fn make_mut(&mut self) -> &mut MatrixData<T> {
        if self.state() == CowState::Shared {
            trace!(
                "copy-on-write: privatizing {} {:?} store",
                self.data.shape(),
                self.data.storage_type()
            );
        }
        Arc::make_mut(&mut self.data)
    }

    /// Replace the store wholesale, dropping this handle's reference to the
    /// old one.
    pub fn replace(&mut self, data: MatrixData<T>) {
        self.data = Arc::new(data);
    }
}

impl<T: Element> Clone for CowData<T> {
    fn clone(&self) -> Self {
        CowData::from_arc(self.share())
    }
}
