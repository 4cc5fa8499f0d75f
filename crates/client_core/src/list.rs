//! Entity list controller: owns the loaded project collection.

use std::sync::Arc;

use shared::{Project, ProjectId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{error::FETCH_FALLBACK_MESSAGE, service::ProjectsService};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// First load (or a retry after a failure) in flight.
    Loading,
    Loaded(Vec<Project>),
    Failed { message: String },
}

impl ListState {
    pub fn projects(&self) -> &[Project] {
        match self {
            Self::Loaded(projects) => projects,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Holds the project list and replaces it wholesale on every load.
///
/// There is no incremental patching: a mutation elsewhere is reflected only
/// by calling [`reload`](Self::reload). Overlapping loads are not
/// deduplicated or fenced, so whichever response resolves last wins.
pub struct ProjectListController {
    service: Arc<dyn ProjectsService>,
    state: Mutex<ListState>,
}

impl ProjectListController {
    pub fn new(service: Arc<dyn ProjectsService>) -> Arc<Self> {
        Arc::new(Self {
            service,
            state: Mutex::new(ListState::Idle),
        })
    }

    /// Fetches the full list and swaps it in.
    ///
    /// A reload while a list is already shown keeps that list visible until
    /// the response arrives instead of dropping back to `Loading`.
    pub async fn load(&self) -> ListState {
        {
            let mut guard = self.state.lock().await;
            if !matches!(*guard, ListState::Loaded(_)) {
                *guard = ListState::Loading;
            }
        }
        debug!("loading projects");

        let next = match self.service.list().await {
            Ok(projects) => {
                debug!(count = projects.len(), "projects loaded");
                ListState::Loaded(projects)
            }
            Err(err) => {
                let message = err.display_message(FETCH_FALLBACK_MESSAGE);
                warn!(error = %err, %message, "failed to load projects");
                ListState::Failed { message }
            }
        };

        let mut guard = self.state.lock().await;
        *guard = next.clone();
        next
    }

    pub async fn reload(&self) -> ListState {
        self.load().await
    }

    pub async fn snapshot(&self) -> ListState {
        self.state.lock().await.clone()
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.state.lock().await.projects().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.projects().len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn find(&self, id: &ProjectId) -> Option<Project> {
        self.state
            .lock()
            .await
            .projects()
            .iter()
            .find(|project| &project.id == id)
            .cloned()
    }

    pub async fn contains(&self, id: &ProjectId) -> bool {
        self.find(id).await.is_some()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error().map(str::to_string)
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
