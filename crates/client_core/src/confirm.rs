//! Delete confirmation: at most one project is armed at a time.

use std::sync::Arc;

use shared::ProjectId;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{error::DELETE_FALLBACK_MESSAGE, list::ProjectListController, service::ProjectsService};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Armed(ProjectId),
    Deleting(ProjectId),
}

impl DeleteState {
    /// The id awaiting confirmation or being deleted.
    pub fn target(&self) -> Option<&ProjectId> {
        match self {
            Self::Idle => None,
            Self::Armed(id) | Self::Deleting(id) => Some(id),
        }
    }

    /// Whether the row for `id` shows the confirmation overlay.
    pub fn is_pending(&self, id: &ProjectId) -> bool {
        self.target() == Some(id)
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, Self::Deleting(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(ProjectId),
    /// `confirm` named an id that is not the armed one.
    NotArmed,
    AlreadyDeleting,
    Failed(String),
}

#[derive(Debug, Default)]
struct ConfirmInner {
    state: DeleteState,
    /// Id whose delete request is pending; arming another row does not clear it.
    in_flight: Option<ProjectId>,
    last_error: Option<String>,
}

pub struct DeleteController {
    service: Arc<dyn ProjectsService>,
    list: Arc<ProjectListController>,
    inner: Mutex<ConfirmInner>,
}

impl DeleteController {
    pub fn new(service: Arc<dyn ProjectsService>, list: Arc<ProjectListController>) -> Arc<Self> {
        Arc::new(Self {
            service,
            list,
            inner: Mutex::new(ConfirmInner::default()),
        })
    }

    pub async fn state(&self) -> DeleteState {
        self.inner.lock().await.state.clone()
    }

    pub async fn armed(&self) -> Option<ProjectId> {
        match &self.inner.lock().await.state {
            DeleteState::Armed(id) => Some(id.clone()),
            _ => None,
        }
    }

    pub async fn in_flight(&self) -> Option<ProjectId> {
        self.inner.lock().await.in_flight.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// Arms `id`, silently disarming anything armed before.
    pub async fn request_delete(&self, id: ProjectId) {
        let mut guard = self.inner.lock().await;
        debug!(project_id = %id, previous = ?guard.state.target(), "delete armed");
        guard.state = DeleteState::Armed(id);
        guard.last_error = None;
    }

    pub async fn cancel_confirm(&self) {
        let mut guard = self.inner.lock().await;
        if let DeleteState::Armed(id) = &guard.state {
            debug!(project_id = %id, "delete disarmed");
            guard.state = DeleteState::Idle;
        }
    }

    /// Deletes `id` if it is the armed one, then reloads the list.
    ///
    /// The armed slot is cleared whatever the outcome; after a failure the
    /// user re-arms the row to retry.
    pub async fn confirm(&self, id: &ProjectId) -> DeleteOutcome {
        {
            let mut guard = self.inner.lock().await;
            if guard.in_flight.is_some() {
                return DeleteOutcome::AlreadyDeleting;
            }
            match &guard.state {
                DeleteState::Armed(armed) if armed == id => {}
                _ => {
                    debug!(project_id = %id, "confirm ignored for unarmed project");
                    return DeleteOutcome::NotArmed;
                }
            }
            guard.state = DeleteState::Deleting(id.clone());
            guard.in_flight = Some(id.clone());
            guard.last_error = None;
        }

        let result = self.service.delete(id).await;
        self.settle(id).await;

        match result {
            Ok(()) => {
                info!(project_id = %id, "project deleted");
                self.list.reload().await;
                DeleteOutcome::Deleted(id.clone())
            }
            Err(err) => {
                let message = err.display_message(DELETE_FALLBACK_MESSAGE);
                warn!(project_id = %id, error = %err, %message, "failed to delete project");
                self.inner.lock().await.last_error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }

    /// Frees the in-flight slot; the visible state returns to idle unless
    /// another row was armed meanwhile.
    async fn settle(&self, id: &ProjectId) {
        let mut guard = self.inner.lock().await;
        guard.in_flight = None;
        if guard.state == DeleteState::Deleting(id.clone()) {
            guard.state = DeleteState::Idle;
        }
    }
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
