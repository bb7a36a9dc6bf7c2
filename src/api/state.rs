use std::sync::Arc;

use crate::rankings::RankingsEngine;

/// Shared handler state.
///
/// `engine` is `None` when no API key was configured: every listing then
/// answers with an empty collection.
#[derive(Clone)]
pub struct AppState {
    pub engine: Option<Arc<RankingsEngine>>,
}

impl AppState {
    pub fn new(engine: Arc<RankingsEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    pub fn without_credential() -> Self {
        Self { engine: None }
    }

    pub fn has_credential(&self) -> bool {
        self.engine.is_some()
    }
}
