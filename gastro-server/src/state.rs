//! Application state

use crate::db::{CascadeDeleter, Gateway, ReferentialGraph};

/// Shared application state, cloned into every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub gateway: Gateway,
    pub deleter: CascadeDeleter,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        let deleter = CascadeDeleter::new(gateway.clone(), ReferentialGraph::restaurant());
        Self { gateway, deleter }
    }
}
