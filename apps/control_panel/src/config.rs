use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "control_panel.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub notification_ttl_secs: u64,
    pub focus_refresh_delay_ms: u64,
    pub status_reload_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            notification_ttl_secs: 5,
            focus_refresh_delay_ms: 500,
            status_reload_delay_ms: 1000,
        }
    }
}

impl Settings {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn focus_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.focus_refresh_delay_ms)
    }

    pub fn status_reload_delay(&self) -> Duration {
        Duration::from_millis(self.status_reload_delay_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    notification_ttl_secs: Option<u64>,
    focus_refresh_delay_ms: Option<u64>,
    status_reload_delay_ms: Option<u64>,
}

/// Defaults, then `control_panel.toml`, then environment. The CLI applies its
/// own overrides afterwards.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        match apply_file_settings(&mut settings, &raw) {
            Ok(()) => tracing::debug!(file = SETTINGS_FILE, "loaded settings file"),
            Err(error) => tracing::warn!(file = SETTINGS_FILE, %error, "ignoring unreadable settings file"),
        }
    }

    if let Ok(v) = std::env::var("CONTROL_PANEL_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = read_u64_env("APP__NOTIFICATION_TTL_SECS") {
        settings.notification_ttl_secs = v;
    }
    if let Some(v) = read_u64_env("APP__FOCUS_REFRESH_DELAY_MS") {
        settings.focus_refresh_delay_ms = v;
    }
    if let Some(v) = read_u64_env("APP__STATUS_RELOAD_DELAY_MS") {
        settings.status_reload_delay_ms = v;
    }

    settings
}

fn read_u64_env(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn apply_file_settings(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.notification_ttl_secs {
        settings.notification_ttl_secs = v;
    }
    if let Some(v) = file_cfg.focus_refresh_delay_ms {
        settings.focus_refresh_delay_ms = v;
    }
    if let Some(v) = file_cfg.status_reload_delay_ms {
        settings.status_reload_delay_ms = v;
    }
    Ok(())
}

pub fn load_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let mut settings = Settings::default();
    apply_file_settings(&mut settings, &raw)?;
    Ok(settings)
}

/// Trims, assumes `http://` when no scheme is given, and drops trailing
/// slashes so endpoint paths can be appended directly.
pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().server_url);
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed = Url::parse(&candidate)
        .with_context(|| format!("invalid server url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}' in server url '{raw}'", parsed.scheme());
    }
    if parsed.host_str().is_none() {
        bail!("server url '{raw}' has no host");
    }

    Ok(candidate.trim_end_matches('/').to_string())
}
