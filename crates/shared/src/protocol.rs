use serde::{Deserialize, Serialize};

use crate::domain::{Project, ProjectStatus};

/// Storage key holding the bearer token of the signed-in user.
pub const SESSION_TOKEN_KEY: &str = "token";
/// Storage key holding the serialized [`SessionUser`].
pub const SESSION_USER_KEY: &str = "user";

/// Body of create/update requests.
///
/// `url` and `logo` are omitted from the JSON when `None`: the backend reads a
/// missing field as "leave unset", which is different from an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub technology: String,
    pub technologies: Vec<String>,
    #[serde(rename = "students")]
    pub students_count: u32,
    pub status: ProjectStatus,
    #[serde(rename = "progress")]
    pub progress_percent: u32,
    pub deadline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// `GET /projects` has been served both bare and wrapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectListResponse {
    Bare(Vec<Project>),
    Projects { projects: Vec<Project> },
    Data { data: Vec<Project> },
}

impl ProjectListResponse {
    pub fn into_projects(self) -> Vec<Project> {
        match self {
            Self::Bare(projects) => projects,
            Self::Projects { projects } => projects,
            Self::Data { data } => data,
        }
    }
}

/// Create/update responses carry the stored record, bare or wrapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectResponse {
    Bare(Project),
    Project { project: Project },
    Data { data: Project },
}

impl ProjectResponse {
    pub fn into_project(self) -> Project {
        match self {
            Self::Bare(project) => project,
            Self::Project { project } => project,
            Self::Data { data } => data,
        }
    }
}

/// The user record persisted alongside the token at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
