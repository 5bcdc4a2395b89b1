//! The surface page handlers read inputs from and render into.

use shared::{
    domain::{LocatedPoint, WindowSummary},
    protocol::PlanResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Instruction,
    AnalysisPrompt,
    ElementDescription,
    QuickTypeText,
    ApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    StatusIndicator,
    InstructionResult,
    ScreenPreview,
    AnalysisResult,
    WindowsList,
    FindElementResult,
    MousePosition,
    ApiKeyResult,
    ApiKeyStatus,
    AiStatus,
    ModelStatus,
    ScreenResolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ClickElement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    NotConfigured,
    Unreachable,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "AI connected",
            Self::NotConfigured => "AI not configured",
            Self::Unreachable => "Connection error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Connection(ConnectionState),
    Plan(PlanResponse),
    Image {
        source: String,
        caption: Option<String>,
    },
    Text(String),
    Windows(Vec<WindowSummary>),
    ElementFound(LocatedPoint),
    ElementNotFound,
    Badge {
        label: &'static str,
        tone: BadgeTone,
    },
    ApiKeyPending,
    ApiKeyAccepted {
        message: String,
        model: Option<String>,
    },
    ApiKeyRejected(String),
}

pub trait PageView {
    fn input(&self, field: InputField) -> String;
    fn set_input(&mut self, field: InputField, value: &str);
    fn set_masked(&mut self, field: InputField, masked: bool);
    fn show_loading(&mut self, label: &str);
    fn hide_loading(&mut self);
    fn render(&mut self, region: Region, panel: Panel);
    fn hide(&mut self, region: Region);
    fn set_enabled(&mut self, control: Control, enabled: bool);
}
