//! Defines the state shared between the route handlers.

use crate::store::RecordStore;

/// The state shared between the route handlers: the record store behind the
/// API.
#[derive(Debug, Clone)]
pub struct AppState<S: RecordStore + Clone> {
    /// The store every request reads and writes through.
    pub store: S,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Create the shared application state from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}
