//! Pure presentation heuristics for project rows.

use shared::{Project, ProjectStatus};

/// Ordered keyword → logo table; the first keyword found in the title wins.
const LOGO_KEYWORDS: &[(&str, &str)] = &[
    ("bolajon", "/loyihalar/bolajon.png"),
    ("alochi", "/loyihalar/alochi.jpg"),
    ("mental", "/loyihalar/Mentaljon.png"),
    ("prox", "/loyihalar/prox.jpg"),
    ("mukammal", "/loyihalar/mukammalotaona.png"),
    ("alibobo", "/loyihalar/alibobo.png"),
    ("avtofix", "/loyihalar/avtofix.webp"),
    ("avtojon", "/loyihalar/avtojon.png"),
];

pub const DEFAULT_GLYPH: char = 'P';
pub const MISSING_DESCRIPTION: &str = "Ma'lumot yo'q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    Emerald,
    Violet,
    Amber,
    Slate,
}

impl StyleToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emerald => "emerald",
            Self::Violet => "violet",
            Self::Amber => "amber",
            Self::Slate => "slate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub style: StyleToken,
}

pub fn status_display(status: &ProjectStatus) -> StatusDisplay {
    let (label, style) = match status {
        ProjectStatus::Active => ("Faol", StyleToken::Emerald),
        ProjectStatus::Completed => ("Tugallangan", StyleToken::Violet),
        ProjectStatus::Planning => ("Rejada", StyleToken::Amber),
        ProjectStatus::Other(_) => ("Noma'lum", StyleToken::Slate),
    };
    StatusDisplay { label, style }
}

/// Explicit logo first, then the keyword table against the title.
pub fn resolve_logo(project: &Project) -> Option<&str> {
    if let Some(logo) = project.logo.as_deref().filter(|logo| !logo.is_empty()) {
        return Some(logo);
    }
    let title = project.title.to_lowercase();
    LOGO_KEYWORDS
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, path)| *path)
}

/// Glyph rendered in place of a logo when [`resolve_logo`] finds none.
pub fn fallback_glyph(title: &str) -> char {
    title
        .chars()
        .next()
        .and_then(|first| first.to_uppercase().next())
        .unwrap_or(DEFAULT_GLYPH)
}

pub fn description_or_placeholder(project: &Project) -> &str {
    if project.description.is_empty() {
        MISSING_DESCRIPTION
    } else {
        &project.description
    }
}

pub fn external_link(project: &Project) -> Option<&str> {
    project.url.as_deref().filter(|url| !url.trim().is_empty())
}

/// Deadline as `DD.MM.YYYY`, falling back to the raw date text when it
/// does not parse.
pub fn deadline_label(project: &Project) -> Option<String> {
    match project.deadline_date() {
        Some(date) => Some(date.format("%d.%m.%Y").to_string()),
        None => project.deadline_day().map(str::to_string),
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
