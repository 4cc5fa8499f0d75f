//! HTTP binding of [`ProjectsService`] for the projects REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    ErrorBody, Project, ProjectId, ProjectListResponse, ProjectPayload, ProjectResponse,
};
use tracing::debug;
use url::Url;

use crate::{
    error::{ServiceError, ServiceResult},
    service::ProjectsService,
    session::{Session, SessionProvider},
};

const PROJECTS_SEGMENT: &str = "projects";

pub struct HttpProjectsService {
    http: Client,
    base_url: Url,
    session: Option<Arc<dyn SessionProvider>>,
}

impl HttpProjectsService {
    /// `api_url` is the API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn new(api_url: &str) -> ServiceResult<Self> {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(http: Client, api_url: &str) -> ServiceResult<Self> {
        let base_url = Url::parse(api_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self {
            http,
            base_url,
            session: None,
        })
    }

    /// Attach the bearer token from `session` to every request.
    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, id: Option<&ProjectId>) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().push(PROJECTS_SEGMENT);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .as_deref()
            .and_then(|session| Session::load(session).token);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let bytes = response.bytes().await?;
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.user_message().map(str::to_string));
        debug!(status = status.as_u16(), ?message, "projects api rejected request");
        Err(ServiceError::rejected(status.as_u16(), message))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Any 2xx answer to a write is success; the stored record is picked out of
/// the body only when one is there.
async fn written_record(response: Response) -> ServiceResult<Option<Project>> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<ProjectResponse>(&bytes) {
        Ok(body) => Ok(Some(body.into_project())),
        Err(err) => {
            debug!(error = %err, "write acknowledged without a project record");
            Ok(None)
        }
    }
}

#[async_trait]
impl ProjectsService for HttpProjectsService {
    async fn list(&self) -> ServiceResult<Vec<Project>> {
        let url = self.endpoint(None)?;
        let response = self.send(self.http.get(url)).await?;
        Ok(decode::<ProjectListResponse>(response).await?.into_projects())
    }

    async fn create(&self, payload: &ProjectPayload) -> ServiceResult<Option<Project>> {
        let url = self.endpoint(None)?;
        let response = self.send(self.http.post(url).json(payload)).await?;
        written_record(response).await
    }

    async fn update(
        &self,
        id: &ProjectId,
        payload: &ProjectPayload,
    ) -> ServiceResult<Option<Project>> {
        let url = self.endpoint(Some(id))?;
        let response = self.send(self.http.put(url).json(payload)).await?;
        written_record(response).await
    }

    async fn delete(&self, id: &ProjectId) -> ServiceResult<()> {
        let url = self.endpoint(Some(id))?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
