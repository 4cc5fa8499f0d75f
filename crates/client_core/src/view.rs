//! Projects page: wires the controllers together and derives what to show.

use std::sync::Arc;

use shared::{Project, ProjectId};

use crate::{
    confirm::{DeleteController, DeleteState},
    display::{
        deadline_label, description_or_placeholder, external_link, fallback_glyph,
        resolve_logo, status_display, StatusDisplay,
    },
    list::{ListState, ProjectListController},
    modal::ModalController,
    role::Affordances,
    service::ProjectsService,
    session::{Session, SessionProvider},
};

pub const PAGE_TITLE: &str = "Loyihalar";
pub const EMPTY_LABEL: &str = "Loyihalar yo'q";
pub const RETRY_LABEL: &str = "Qayta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Logo {
    Asset(String),
    Glyph(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: StatusDisplay,
    pub logo: Logo,
    pub link: Option<String>,
    pub deadline: Option<String>,
    pub confirming_delete: bool,
    pub affordances: Affordances,
}

impl ProjectRow {
    pub fn build(project: &Project, deletes: &DeleteState, affordances: Affordances) -> Self {
        let logo = match resolve_logo(project) {
            Some(path) => Logo::Asset(path.to_string()),
            None => Logo::Glyph(fallback_glyph(&project.title)),
        };
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: description_or_placeholder(project).to_string(),
            status: status_display(&project.status),
            logo,
            link: external_link(project).map(str::to_string),
            deadline: deadline_label(project),
            confirming_delete: deletes.is_pending(&project.id),
            affordances,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsView {
    Loading,
    Failed {
        message: String,
    },
    Empty {
        can_create: bool,
    },
    Grid {
        count: usize,
        can_create: bool,
        delete_error: Option<String>,
        rows: Vec<ProjectRow>,
    },
}

/// Pure derivation of the page from controller snapshots and the session.
pub fn build_view(
    list: &ListState,
    deletes: &DeleteState,
    delete_error: Option<String>,
    session: &Session,
) -> ProjectsView {
    let affordances = Affordances::for_session(session);
    match list {
        ListState::Idle | ListState::Loading => ProjectsView::Loading,
        ListState::Failed { message } => ProjectsView::Failed {
            message: message.clone(),
        },
        ListState::Loaded(projects) if projects.is_empty() => ProjectsView::Empty {
            can_create: affordances.can_create,
        },
        ListState::Loaded(projects) => ProjectsView::Grid {
            count: projects.len(),
            can_create: affordances.can_create,
            delete_error,
            rows: projects
                .iter()
                .map(|project| ProjectRow::build(project, deletes, affordances))
                .collect(),
        },
    }
}

/// One projects view instance; controllers are scoped to it.
pub struct ProjectsPage {
    pub list: Arc<ProjectListController>,
    pub modal: Arc<ModalController>,
    pub deletes: Arc<DeleteController>,
    session: Arc<dyn SessionProvider>,
}

impl ProjectsPage {
    pub fn new(service: Arc<dyn ProjectsService>, session: Arc<dyn SessionProvider>) -> Self {
        let list = ProjectListController::new(service.clone());
        let modal = ModalController::new(service.clone(), list.clone());
        let deletes = DeleteController::new(service, list.clone());
        Self {
            list,
            modal,
            deletes,
            session,
        }
    }

    /// Initial fetch when the page mounts.
    pub async fn mount(&self) -> ListState {
        self.list.load().await
    }

    /// Retry action of the page-level error state.
    pub async fn retry(&self) -> ListState {
        self.list.reload().await
    }

    pub fn session(&self) -> Session {
        Session::load(self.session.as_ref())
    }

    pub async fn render(&self) -> ProjectsView {
        let list = self.list.snapshot().await;
        let deletes = self.deletes.state().await;
        let delete_error = self.deletes.last_error().await;
        build_view(&list, &deletes, delete_error, &self.session())
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
