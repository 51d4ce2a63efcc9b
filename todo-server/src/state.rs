//! Application state shared across handlers

use std::sync::Arc;

use crate::db::{DbError, TodoRepository, TodoStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Box<dyn TodoStore>,
    app_name: String,
}

impl AppState {
    pub fn new(store: impl TodoStore + 'static, app_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store: Box::new(store),
                app_name: app_name.into(),
            }),
        }
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.inner.store.as_ref()
    }

    /// Scoped repository session for one request
    pub async fn session(&self) -> Result<Box<dyn TodoRepository>, DbError> {
        self.inner.store.session().await
    }

    pub fn app_name(&self) -> &str {
        &self.inner.app_name
    }
}
