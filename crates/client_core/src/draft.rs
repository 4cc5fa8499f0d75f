//! Editable draft of a project and its codec to and from the wire types.

use shared::{Project, ProjectPayload, ProjectStatus};
use thiserror::Error;

const TAG_SEPARATOR: char = ',';
const TAG_JOINER: &str = ", ";

/// Input-shaped copy of a project under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub technology: String,
    /// Comma-delimited tag list as typed by the user.
    pub technologies: String,
    pub students_count: u32,
    pub status: ProjectStatus,
    pub progress_percent: u32,
    /// Date-only `YYYY-MM-DD`, empty when unset.
    pub deadline: String,
    pub url: String,
    pub logo: String,
}

impl Default for Draft {
    fn default() -> Self {
        empty_draft()
    }
}

pub fn empty_draft() -> Draft {
    Draft {
        title: String::new(),
        description: String::new(),
        technology: String::new(),
        technologies: String::new(),
        students_count: 1,
        status: ProjectStatus::Planning,
        progress_percent: 0,
        deadline: String::new(),
        url: String::new(),
        logo: String::new(),
    }
}

pub fn to_draft(project: &Project) -> Draft {
    Draft {
        title: project.title.clone(),
        description: project.description.clone(),
        technology: project.technology.clone(),
        technologies: join_tags(&project.technologies),
        students_count: project.students_count.unwrap_or(1),
        status: project.status.clone(),
        progress_percent: project.progress_percent.unwrap_or(0),
        deadline: project.deadline_day().unwrap_or_default().to_string(),
        url: project.url.clone().unwrap_or_default(),
        logo: project.logo.clone().unwrap_or_default(),
    }
}

pub fn to_payload(draft: &Draft) -> ProjectPayload {
    ProjectPayload {
        title: draft.title.clone(),
        description: draft.description.clone(),
        technology: draft.technology.clone(),
        technologies: split_tags(&draft.technologies),
        students_count: draft.students_count,
        status: draft.status.clone(),
        progress_percent: draft.progress_percent,
        deadline: draft.deadline.clone(),
        url: non_empty(&draft.url),
        logo: non_empty(&draft.logo),
    }
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_JOINER)
}

/// Splits on commas, trims each piece and drops blanks; `""` yields no tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Required field left empty in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Title,
    Description,
    Technology,
    Deadline,
}

impl Draft {
    /// Required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Title, &self.title),
            (RequiredField::Description, &self.description),
            (RequiredField::Technology, &self.technology),
            (RequiredField::Deadline, &self.deadline),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Save gate: the four required text fields are non-empty. Numeric and
    /// optional fields never block a save.
    pub fn is_saveable(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn apply(&mut self, field: DraftField) {
        match field {
            DraftField::Title(value) => self.title = value,
            DraftField::Description(value) => self.description = value,
            DraftField::Technology(value) => self.technology = value,
            DraftField::Technologies(value) => self.technologies = value,
            DraftField::StudentsCount(value) => self.students_count = value,
            DraftField::Status(value) => self.status = value,
            DraftField::ProgressPercent(value) => self.progress_percent = value,
            DraftField::Deadline(value) => self.deadline = value,
            DraftField::Url(value) => self.url = value,
            DraftField::Logo(value) => self.logo = value,
        }
    }
}

/// A single-field edit of a [`Draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Description(String),
    Technology(String),
    Technologies(String),
    StudentsCount(u32),
    Status(ProjectStatus),
    ProgressPercent(u32),
    Deadline(String),
    Url(String),
    Logo(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("unknown draft field `{0}`")]
    UnknownField(String),
    #[error("`{field}` must be a non-negative whole number, got `{value}`")]
    NotANumber { field: &'static str, value: String },
    #[error("status must be one of planning, active, completed, got `{0}`")]
    UnknownStatus(String),
}

impl DraftField {
    /// Input-boundary parser for `key=value` style edits.
    pub fn parse(key: &str, raw: &str) -> Result<Self, FieldParseError> {
        let field = match key.trim() {
            "title" => Self::Title(raw.to_string()),
            "description" => Self::Description(raw.to_string()),
            "technology" => Self::Technology(raw.to_string()),
            "technologies" => Self::Technologies(raw.to_string()),
            "students" | "students_count" => {
                Self::StudentsCount(parse_count("students", raw)?)
            }
            "status" => Self::Status(
                ProjectStatus::parse_known(raw)
                    .ok_or_else(|| FieldParseError::UnknownStatus(raw.to_string()))?,
            ),
            "progress" | "progress_percent" => {
                Self::ProgressPercent(parse_count("progress", raw)?)
            }
            "deadline" => Self::Deadline(raw.trim().to_string()),
            "url" => Self::Url(raw.trim().to_string()),
            "logo" => Self::Logo(raw.trim().to_string()),
            other => return Err(FieldParseError::UnknownField(other.to_string())),
        };
        Ok(field)
    }

    /// Parses `key=value`.
    pub fn parse_assignment(assignment: &str) -> Result<Self, FieldParseError> {
        match assignment.split_once('=') {
            Some((key, value)) => Self::parse(key, value),
            None => Err(FieldParseError::UnknownField(assignment.to_string())),
        }
    }
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, FieldParseError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| FieldParseError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
