//! Line-oriented rendition of the page surface for the command-line front end.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use client_core::{Notifier, Severity, ToastStack};

use super::view::{BadgeTone, Control, InputField, PageView, Panel, Region};

#[derive(Default)]
pub struct TerminalView {
    inputs: HashMap<InputField, String>,
    last_image: Option<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent image source rendered into the preview region.
    pub fn last_image(&self) -> Option<&str> {
        self.last_image.as_deref()
    }
}

impl PageView for TerminalView {
    fn input(&self, field: InputField) -> String {
        self.inputs.get(&field).cloned().unwrap_or_default()
    }

    fn set_input(&mut self, field: InputField, value: &str) {
        self.inputs.insert(field, value.to_string());
    }

    fn set_masked(&mut self, field: InputField, masked: bool) {
        let state = if masked { "hidden" } else { "visible" };
        println!("{field:?} is now {state}");
    }

    fn show_loading(&mut self, label: &str) {
        println!("... {label}");
    }

    fn hide_loading(&mut self) {}

    fn render(&mut self, region: Region, panel: Panel) {
        if let Panel::Image { source, .. } = &panel {
            self.last_image = Some(source.clone());
        }
        for line in render_lines(region, &panel) {
            println!("{line}");
        }
    }

    fn hide(&mut self, _region: Region) {}

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        tracing::debug!(?control, enabled, "control state changed");
    }
}

fn badge(label: &str, tone: BadgeTone) -> String {
    match tone {
        BadgeTone::Success => format!("[ok] {label}"),
        BadgeTone::Warning => format!("[!] {label}"),
        BadgeTone::Danger => format!("[x] {label}"),
    }
}

fn region_title(region: Region) -> &'static str {
    match region {
        Region::StatusIndicator => "Status",
        Region::InstructionResult => "Plan",
        Region::ScreenPreview => "Preview",
        Region::AnalysisResult => "Analysis",
        Region::WindowsList => "Windows",
        Region::FindElementResult => "Element search",
        Region::MousePosition => "Mouse",
        Region::ApiKeyResult => "API key",
        Region::ApiKeyStatus => "API key status",
        Region::AiStatus => "AI",
        Region::ModelStatus => "Model",
        Region::ScreenResolution => "Screen resolution",
    }
}

pub(crate) fn render_lines(region: Region, panel: &Panel) -> Vec<String> {
    let title = region_title(region);
    match panel {
        Panel::Connection(state) => vec![format!("{title}: {}", state.label())],
        Panel::Plan(plan) => {
            let mut lines = vec![
                "Analysis".to_string(),
                format!("  {}", plan.analysis),
                "Strategy".to_string(),
                format!("  {}", plan.strategy),
                format!("Actions ({})", plan.actions.len()),
            ];
            lines.extend(
                plan.actions
                    .iter()
                    .enumerate()
                    .map(|(idx, action)| format!("  {}. {}", idx + 1, action.label())),
            );
            if !plan.warnings.is_empty() {
                lines.push("Warnings".to_string());
                lines.extend(plan.warnings.iter().map(|w| format!("  - {w}")));
            }
            if !plan.success_criteria.is_empty() {
                lines.push("Success criteria".to_string());
                lines.push(format!("  {}", plan.success_criteria));
            }
            lines
        }
        Panel::Image { source, caption } => {
            let kind = source
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("image");
            let mut line = format!("{title}: {kind} ({} bytes encoded)", source.len());
            if let Some(caption) = caption {
                line.push_str(&format!(" - {caption}"));
            }
            vec![line]
        }
        Panel::Text(text) => vec![format!("{title}: {text}")],
        Panel::Windows(windows) if windows.is_empty() => {
            vec![format!("{title}: no open windows")]
        }
        Panel::Windows(windows) => {
            let mut lines = vec![format!("{title}:")];
            lines.extend(windows.iter().map(|window| {
                let marker = if window.is_active { "*" } else { " " };
                let mut line = format!("{marker} [{}] {}", window.index, window.title);
                if let (Some(left), Some(top), Some(width), Some(height)) =
                    (window.left, window.top, window.width, window.height)
                {
                    line.push_str(&format!(" {width}x{height} at ({left}, {top})"));
                }
                if window.is_maximized {
                    line.push_str(" (maximized)");
                }
                line
            }));
            lines
        }
        Panel::ElementFound(point) => vec![format!("{title}: element found at {point}")],
        Panel::ElementNotFound => vec![format!("{title}: element not found")],
        Panel::Badge { label, tone } => vec![format!("{title}: {}", badge(label, *tone))],
        Panel::ApiKeyPending => vec![format!("{title}: validating API key...")],
        Panel::ApiKeyAccepted { message, model } => vec![
            format!("{title}: {message}"),
            format!("Model: {}", model.as_deref().unwrap_or("N/A")),
        ],
        Panel::ApiKeyRejected(message) => vec![format!("{title}: Error: {message}")],
    }
}

/// Prints each notification and counts the error ones.
pub struct TerminalNotifier {
    toasts: ToastStack,
    errors: AtomicUsize,
}

impl TerminalNotifier {
    pub fn new(toasts: ToastStack) -> Self {
        Self {
            toasts,
            errors: AtomicUsize::new(0),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if severity == Severity::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.toasts.notify(message, severity);
        println!("[{severity}] {message}");
    }
}

/// Splits a `data:<mime>;base64,<payload>` source into its MIME type and bytes.
pub fn decode_data_uri(source: &str) -> Result<(String, Vec<u8>)> {
    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("image source is not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URI has no payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| anyhow!("data URI is not base64 encoded"))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .context("invalid base64 payload in data URI")?;
    Ok((mime.to_string(), bytes))
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "png",
    }
}
