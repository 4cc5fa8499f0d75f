//! Create/edit modal: a state machine over the draft under edit.

use std::sync::Arc;

use shared::{Project, ProjectId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    draft::{empty_draft, to_draft, to_payload, Draft, DraftField, RequiredField},
    error::SAVE_FALLBACK_MESSAGE,
    list::ProjectListController,
    service::ProjectsService,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Saving,
    /// Last save attempt failed; the draft is untouched so the user can retry.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    CreateDraft {
        draft: Draft,
        submit: SubmitState,
    },
    EditDraft {
        id: ProjectId,
        draft: Draft,
        submit: SubmitState,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Closed => None,
            Self::CreateDraft { draft, .. } | Self::EditDraft { draft, .. } => Some(draft),
        }
    }

    pub fn editing_id(&self) -> Option<&ProjectId> {
        match self {
            Self::EditDraft { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn submit(&self) -> Option<&SubmitState> {
        match self {
            Self::Closed => None,
            Self::CreateDraft { submit, .. } | Self::EditDraft { submit, .. } => Some(submit),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.submit() == Some(&SubmitState::Saving)
    }

    pub fn error(&self) -> Option<&str> {
        match self.submit() {
            Some(SubmitState::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_saving() && self.draft().is_some_and(Draft::is_saveable)
    }

    pub fn title_label(&self) -> Option<&'static str> {
        match self {
            Self::Closed => None,
            Self::CreateDraft { .. } => Some("Yangi loyiha"),
            Self::EditDraft { .. } => Some("Loyihani tahrirlash"),
        }
    }

    pub fn submit_label(&self) -> Option<&'static str> {
        match self {
            Self::Closed => None,
            _ if self.is_saving() => Some("Saqlanmoqda..."),
            Self::CreateDraft { .. } => Some("Qo'shish"),
            Self::EditDraft { .. } => Some("Saqlash"),
        }
    }

    fn parts_mut(&mut self) -> Option<(&mut Draft, &mut SubmitState)> {
        match self {
            Self::Closed => None,
            Self::CreateDraft { draft, submit } | Self::EditDraft { draft, submit, .. } => {
                Some((draft, submit))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The stored record, when the backend echoed it.
    Created(Option<Project>),
    Updated(Option<Project>),
    /// Gate failed; no request was issued.
    Invalid(Vec<RequiredField>),
    /// A save from this controller is already in flight.
    AlreadySaving,
    NotOpen,
    Failed(String),
}

#[derive(Debug, Default)]
struct ModalInner {
    state: ModalState,
    /// Bumped every time a draft is opened or discarded.
    generation: u64,
    /// Outlives the draft it started from: reopening mid-save does not free it.
    in_flight: bool,
}

impl ModalInner {
    fn replace(&mut self, draft: Draft, id: Option<ProjectId>) {
        self.generation += 1;
        let submit = if self.in_flight {
            SubmitState::Saving
        } else {
            SubmitState::Idle
        };
        self.state = match id {
            Some(id) => ModalState::EditDraft { id, draft, submit },
            None => ModalState::CreateDraft { draft, submit },
        };
    }
}

pub struct ModalController {
    service: Arc<dyn ProjectsService>,
    list: Arc<ProjectListController>,
    inner: Mutex<ModalInner>,
}

impl ModalController {
    pub fn new(service: Arc<dyn ProjectsService>, list: Arc<ProjectListController>) -> Arc<Self> {
        Arc::new(Self {
            service,
            list,
            inner: Mutex::new(ModalInner::default()),
        })
    }

    pub async fn snapshot(&self) -> ModalState {
        self.inner.lock().await.state.clone()
    }

    /// Replaces whatever is open with an empty create draft.
    ///
    /// While an earlier save is still in flight the new draft opens with its
    /// submit disabled.
    pub async fn open_create(&self) {
        self.inner.lock().await.replace(empty_draft(), None);
        debug!("modal opened for create");
    }

    /// Replaces whatever is open with an edit draft of `project`.
    pub async fn open_edit(&self, project: &Project) {
        self.inner
            .lock()
            .await
            .replace(to_draft(project), Some(project.id.clone()));
        debug!(project_id = %project.id, "modal opened for edit");
    }

    /// Returns `false` when the modal is closed and the edit was dropped.
    pub async fn update_field(&self, field: DraftField) -> bool {
        let mut guard = self.inner.lock().await;
        match guard.state.parts_mut() {
            Some((draft, _)) => {
                draft.apply(field);
                true
            }
            None => {
                debug!("ignoring field update while modal is closed");
                false
            }
        }
    }

    /// Submits the draft.
    ///
    /// On success the modal closes and the list is reloaded before this
    /// returns. On failure the modal stays open with the draft unchanged and
    /// the error message recorded on the submit state. A draft opened while
    /// the request was pending is left as it is either way.
    pub async fn save(&self) -> SaveOutcome {
        let (target, payload, generation) = {
            let mut guard = self.inner.lock().await;
            if guard.in_flight {
                debug!("save already in flight");
                return SaveOutcome::AlreadySaving;
            }
            let target = guard.state.editing_id().cloned();
            let Some((draft, submit)) = guard.state.parts_mut() else {
                return SaveOutcome::NotOpen;
            };
            let missing = draft.missing_fields();
            if !missing.is_empty() {
                debug!(?missing, "draft not saveable");
                return SaveOutcome::Invalid(missing);
            }
            let payload = to_payload(draft);
            *submit = SubmitState::Saving;
            guard.in_flight = true;
            (target, payload, guard.generation)
        };

        let result = match &target {
            Some(id) => self.service.update(id, &payload).await,
            None => self.service.create(&payload).await,
        };

        match result {
            Ok(project) => {
                self.settle(generation, None).await;
                info!(
                    project_id = ?project.as_ref().map(|p| p.id.as_str()),
                    update = target.is_some(),
                    "project saved"
                );
                self.list.reload().await;
                match target {
                    Some(_) => SaveOutcome::Updated(project),
                    None => SaveOutcome::Created(project),
                }
            }
            Err(err) => {
                let message = err.display_message(SAVE_FALLBACK_MESSAGE);
                warn!(error = %err, %message, "failed to save project");
                self.settle(generation, Some(message.clone())).await;
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Frees the in-flight slot. Only the draft the save started from is
    /// closed (on success) or marked failed.
    async fn settle(&self, generation: u64, failure: Option<String>) {
        let mut guard = self.inner.lock().await;
        guard.in_flight = false;
        if guard.generation == generation {
            match failure {
                None => guard.state = ModalState::Closed,
                Some(message) => {
                    if let Some((_, submit)) = guard.state.parts_mut() {
                        *submit = SubmitState::Failed(message);
                    }
                }
            }
        } else if let Some((_, submit)) = guard.state.parts_mut() {
            if *submit == SubmitState::Saving {
                *submit = SubmitState::Idle;
            }
        }
    }

    /// Discards the draft without contacting the service.
    pub async fn cancel(&self) {
        let mut guard = self.inner.lock().await;
        guard.generation += 1;
        guard.state = ModalState::Closed;
        debug!("modal closed");
    }

    pub async fn close(&self) {
        self.cancel().await;
    }
}

#[cfg(test)]
#[path = "tests/modal_tests.rs"]
mod tests;
