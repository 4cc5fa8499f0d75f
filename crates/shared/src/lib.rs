pub mod domain;
pub mod error;
pub mod protocol;

pub use domain::{Project, ProjectId, ProjectStatus};
pub use error::ErrorBody;
pub use protocol::{ProjectListResponse, ProjectPayload, ProjectResponse, SessionUser};
