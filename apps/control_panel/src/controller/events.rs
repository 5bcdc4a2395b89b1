//! UI triggers and the handler-registration tables for each page.

use shared::domain::WindowIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Click,
    Key { key: &'static str, ctrl: bool },
}

impl Trigger {
    pub const ENTER: Self = Self::Key {
        key: "Enter",
        ctrl: false,
    };
    pub const CTRL_ENTER: Self = Self::Key {
        key: "Enter",
        ctrl: true,
    };

    /// A bound key chord fires when the key matches and, if the binding asks
    /// for Ctrl, Ctrl is held. Extra modifiers on the event are tolerated.
    pub fn accepts(self, event: Trigger) -> bool {
        match (self, event) {
            (Self::Click, Self::Click) => true,
            (
                Self::Key { key, ctrl },
                Self::Key {
                    key: event_key,
                    ctrl: event_ctrl,
                },
            ) => key.eq_ignore_ascii_case(event_key) && (!ctrl || event_ctrl),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<A> {
    pub trigger: Trigger,
    pub element_id: &'static str,
    pub action: A,
}

pub fn resolve<A: Copy>(table: &[Binding<A>], event: Trigger, element_id: &str) -> Option<A> {
    table
        .iter()
        .find(|binding| binding.element_id == element_id && binding.trigger.accepts(event))
        .map(|binding| binding.action)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    CheckStatus,
    ExecuteInstruction,
    ConfirmExecution,
    CancelExecution,
    CaptureScreen,
    AnalyzeScreen,
    RefreshWindows,
    FocusWindow(WindowIndex),
    CaptureWindow(WindowIndex),
    FindElement,
    ClickElement,
    QuickType,
    UpdateMousePosition,
}

impl DashboardAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::CheckStatus => "check_status",
            Self::ExecuteInstruction => "execute_instruction",
            Self::ConfirmExecution => "confirm_execution",
            Self::CancelExecution => "cancel_execution",
            Self::CaptureScreen => "capture_screen",
            Self::AnalyzeScreen => "analyze_screen",
            Self::RefreshWindows => "refresh_windows",
            Self::FocusWindow(_) => "focus_window",
            Self::CaptureWindow(_) => "capture_window",
            Self::FindElement => "find_element",
            Self::ClickElement => "click_element",
            Self::QuickType => "quick_type",
            Self::UpdateMousePosition => "update_mouse_position",
        }
    }
}

pub const DASHBOARD_BINDINGS: &[Binding<DashboardAction>] = &[
    Binding {
        trigger: Trigger::Click,
        element_id: "executeInstructionBtn",
        action: DashboardAction::ExecuteInstruction,
    },
    Binding {
        trigger: Trigger::CTRL_ENTER,
        element_id: "instructionInput",
        action: DashboardAction::ExecuteInstruction,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "confirmExecutionBtn",
        action: DashboardAction::ConfirmExecution,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "cancelExecutionBtn",
        action: DashboardAction::CancelExecution,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "captureScreenBtn",
        action: DashboardAction::CaptureScreen,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "analyzeScreenBtn",
        action: DashboardAction::AnalyzeScreen,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "refreshWindowsBtn",
        action: DashboardAction::RefreshWindows,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "findElementBtn",
        action: DashboardAction::FindElement,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "clickElementBtn",
        action: DashboardAction::ClickElement,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "quickTypeBtn",
        action: DashboardAction::QuickType,
    },
];

/// Actions run once when the dashboard is opened, in order.
pub const DASHBOARD_ON_LOAD: &[DashboardAction] = &[
    DashboardAction::CheckStatus,
    DashboardAction::RefreshWindows,
    DashboardAction::UpdateMousePosition,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    LoadStatus,
    SaveApiKey,
    ToggleApiKeyVisibility,
    TestConnection,
}

impl SettingsAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::LoadStatus => "load_status",
            Self::SaveApiKey => "save_api_key",
            Self::ToggleApiKeyVisibility => "toggle_api_key_visibility",
            Self::TestConnection => "test_connection",
        }
    }
}

pub const SETTINGS_BINDINGS: &[Binding<SettingsAction>] = &[
    Binding {
        trigger: Trigger::Click,
        element_id: "saveApiKeyBtn",
        action: SettingsAction::SaveApiKey,
    },
    Binding {
        trigger: Trigger::ENTER,
        element_id: "apiKeyInput",
        action: SettingsAction::SaveApiKey,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "toggleApiKeyBtn",
        action: SettingsAction::ToggleApiKeyVisibility,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "testConnectionBtn",
        action: SettingsAction::TestConnection,
    },
    Binding {
        trigger: Trigger::Click,
        element_id: "refreshStatusBtn",
        action: SettingsAction::LoadStatus,
    },
];

pub const SETTINGS_ON_LOAD: &[SettingsAction] = &[SettingsAction::LoadStatus];
