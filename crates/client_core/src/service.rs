use async_trait::async_trait;
use shared::{Project, ProjectId, ProjectPayload};

use crate::error::ServiceResult;

/// Persistence collaborator for project records.
///
/// Implementations own transport and storage; the controllers only ever see
/// whole records and never fabricate ids.
#[async_trait]
pub trait ProjectsService: Send + Sync {
    /// Every project, in the order the backend returns them.
    async fn list(&self) -> ServiceResult<Vec<Project>>;
    /// `Ok(None)` when the backend acknowledged the write without echoing the
    /// stored record.
    async fn create(&self, payload: &ProjectPayload) -> ServiceResult<Option<Project>>;
    async fn update(
        &self,
        id: &ProjectId,
        payload: &ProjectPayload,
    ) -> ServiceResult<Option<Project>>;
    async fn delete(&self, id: &ProjectId) -> ServiceResult<()>;
}
