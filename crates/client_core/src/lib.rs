pub mod confirm;
pub mod display;
pub mod draft;
pub mod error;
pub mod list;
pub mod modal;
pub mod navigation;
pub mod role;
pub mod service;
pub mod session;
pub mod transport;
pub mod view;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use confirm::{DeleteController, DeleteOutcome, DeleteState};
pub use display::{fallback_glyph, resolve_logo, status_display, StatusDisplay, StyleToken};
pub use draft::{empty_draft, to_draft, to_payload, Draft, DraftField, FieldParseError};
pub use error::{ServiceError, ServiceResult, SessionError};
pub use list::{ListState, ProjectListController};
pub use modal::{ModalController, ModalState, SaveOutcome, SubmitState};
pub use navigation::{AppSignal, HistoryNavigator, MenuKind, NavigationGate, Navigator};
pub use role::{classify, Affordances, Capability};
pub use service::ProjectsService;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionProvider};
pub use transport::HttpProjectsService;
pub use view::{ProjectsPage, ProjectsView};
