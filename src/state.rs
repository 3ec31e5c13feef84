//! Shared application state for all routes.

use crate::executor::QueryExecutor;
use crate::service::{EntityMetaLister, EntityReader};

/// Handed to every handler. The executor owns the (internally synchronized) pool.
#[derive(Clone)]
pub struct AppState<E> {
    pub executor: E,
}

impl<E: QueryExecutor> AppState<E> {
    pub fn new(executor: E) -> Self {
        AppState { executor }
    }

    pub fn reader(&self) -> EntityReader<E> {
        EntityReader::new(self.executor.clone())
    }

    pub fn meta_lister(&self) -> EntityMetaLister<E> {
        EntityMetaLister::new(self.executor.clone())
    }
}
