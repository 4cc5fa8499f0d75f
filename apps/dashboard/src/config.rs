use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use client_core::navigation::DEFAULT_MOBILE_BREAKPOINT;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_file: PathBuf,
    pub log_filter: String,
    pub mobile_breakpoint: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/api".into(),
            session_file: PathBuf::from("./data/session.json"),
            log_filter: "info".into(),
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    session_file: Option<PathBuf>,
    log_filter: Option<String>,
    mobile_breakpoint: Option<u32>,
}

pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = config_path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file when present, then environment overrides.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            if let Some(v) = file_cfg.api_url {
                settings.api_url = v;
            }
            if let Some(v) = file_cfg.session_file {
                settings.session_file = v;
            }
            if let Some(v) = file_cfg.log_filter {
                settings.log_filter = v;
            }
            if let Some(v) = file_cfg.mobile_breakpoint {
                settings.mobile_breakpoint = v;
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    if let Some(v) = env("DASHBOARD_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("DASHBOARD_SESSION_FILE") {
        settings.session_file = PathBuf::from(v);
    }
    if let Some(v) = env("APP__SESSION_FILE") {
        settings.session_file = PathBuf::from(v);
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = env("APP__MOBILE_BREAKPOINT") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.mobile_breakpoint = parsed;
        }
    }

    settings.api_url = normalize_api_url(&settings.api_url)?;
    Ok(settings)
}

/// Trims whitespace and trailing slashes and checks the URL is http(s).
pub fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Settings::default().api_url);
    }
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid api url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api url '{trimmed}' must use http or https");
    }
    Ok(trimmed.to_string())
}
