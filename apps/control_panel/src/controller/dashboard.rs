//! Dashboard page: instruction planning, capture, windows, element search, typing.

use std::time::Duration;

use client_core::{ApiClient, ClientError, Notifier, Severity};
use shared::domain::WindowIndex;
use tracing::{debug, info, warn};

use crate::{
    controller::{
        events::{resolve, DashboardAction, Trigger, DASHBOARD_BINDINGS, DASHBOARD_ON_LOAD},
        session::DashboardSession,
    },
    ui::{ConnectionState, Control, InputField, PageView, Panel, Region},
};

pub const DEFAULT_FOCUS_REFRESH_DELAY: Duration = Duration::from_millis(500);
pub const MOUSE_POSITION_PLACEHOLDER: &str = "Move the mouse over the application";

pub struct DashboardController<V, N> {
    api: ApiClient,
    view: V,
    notifier: N,
    session: DashboardSession,
    focus_refresh_delay: Duration,
}

impl<V: PageView, N: Notifier> DashboardController<V, N> {
    pub fn new(api: ApiClient, view: V, notifier: N) -> Self {
        Self {
            api,
            view,
            notifier,
            session: DashboardSession::default(),
            focus_refresh_delay: DEFAULT_FOCUS_REFRESH_DELAY,
        }
    }

    pub fn with_focus_refresh_delay(mut self, delay: Duration) -> Self {
        self.focus_refresh_delay = delay;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub async fn load(&mut self) {
        for action in DASHBOARD_ON_LOAD {
            self.run(*action).await;
        }
    }

    /// Runs the handler bound to `element_id` for `trigger`. Returns false when
    /// nothing is bound.
    pub async fn dispatch(&mut self, trigger: Trigger, element_id: &str) -> bool {
        let Some(action) = resolve(DASHBOARD_BINDINGS, trigger, element_id) else {
            debug!(element_id, ?trigger, "no dashboard binding");
            return false;
        };
        debug!(action = action.name(), element_id, "dispatching dashboard event");
        self.run(action).await;
        true
    }

    pub async fn run(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::CheckStatus => self.check_status().await,
            DashboardAction::ExecuteInstruction => self.execute_instruction().await,
            DashboardAction::ConfirmExecution => self.confirm_execution().await,
            DashboardAction::CancelExecution => self.cancel_execution(),
            DashboardAction::CaptureScreen => self.capture_screen().await,
            DashboardAction::AnalyzeScreen => self.analyze_screen().await,
            DashboardAction::RefreshWindows => self.refresh_windows().await,
            DashboardAction::FocusWindow(index) => self.focus_window(index).await,
            DashboardAction::CaptureWindow(index) => self.capture_window(index).await,
            DashboardAction::FindElement => self.find_element().await,
            DashboardAction::ClickElement => self.click_element().await,
            DashboardAction::QuickType => self.quick_type().await,
            DashboardAction::UpdateMousePosition => self.update_mouse_position(),
        }
    }

    fn required_input(&self, field: InputField, missing: &str) -> Option<String> {
        let value = self.view.input(field).trim().to_string();
        if value.is_empty() {
            warn!(?field, "required input is empty");
            self.notifier.notify(missing, Severity::Warning);
            return None;
        }
        Some(value)
    }

    fn succeed(&mut self, message: &str) {
        self.view.hide_loading();
        self.notifier.notify(message, Severity::Success);
    }

    fn fail(&mut self, prefix: &str, err: &ClientError) {
        self.view.hide_loading();
        self.notifier
            .notify(&format!("{prefix}{}", err.message()), Severity::Error);
    }

    pub async fn check_status(&mut self) {
        match self.api.status().await {
            Ok(status) => {
                let state = if status.ai_enabled {
                    ConnectionState::Connected
                } else {
                    ConnectionState::NotConfigured
                };
                self.view
                    .render(Region::StatusIndicator, Panel::Connection(state));
            }
            Err(err) => {
                self.view.render(
                    Region::StatusIndicator,
                    Panel::Connection(ConnectionState::Unreachable),
                );
                self.notifier.notify(
                    &format!("Connection error: {}", err.message()),
                    Severity::Error,
                );
            }
        }
    }

    /// Requests a plan for review. Nothing runs until `confirm_execution`.
    pub async fn execute_instruction(&mut self) {
        let Some(instruction) =
            self.required_input(InputField::Instruction, "Please enter an instruction")
        else {
            return;
        };

        self.view.show_loading("Analyzing instruction with AI...");
        match self.api.plan_instruction(&instruction).await {
            Ok(plan) => {
                info!(actions = plan.actions.len(), "plan generated");
                self.session.replace_plan(plan.actions.clone());
                self.view.render(Region::InstructionResult, Panel::Plan(plan));
                self.succeed("Plan generated successfully");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    pub async fn confirm_execution(&mut self) {
        if self.session.pending_actions().is_empty() {
            self.notifier
                .notify("No actions to execute", Severity::Warning);
            return;
        }

        self.view.show_loading("Executing actions...");
        let actions = self.session.pending_actions().to_vec();
        match self.api.execute_actions(&actions).await {
            Ok(_) => {
                info!(actions = actions.len(), "plan executed");
                self.succeed("Actions executed successfully");
                self.view.hide(Region::InstructionResult);
                self.view.set_input(InputField::Instruction, "");
                self.session.clear_plan();
            }
            Err(err) => self.fail("Execution failed: ", &err),
        }
    }

    pub fn cancel_execution(&mut self) {
        self.view.hide(Region::InstructionResult);
        self.session.clear_plan();
        self.notifier.notify("Execution cancelled", Severity::Info);
    }

    pub async fn capture_screen(&mut self) {
        self.view.show_loading("Capturing screen...");
        match self.api.capture_screen().await {
            Ok(capture) => {
                let caption = capture.size().map(|size| size.to_string());
                self.view.render(
                    Region::ScreenPreview,
                    Panel::Image {
                        source: capture.image,
                        caption,
                    },
                );
                self.succeed("Screen captured");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    /// A blank prompt field leaves the prompt choice to the backend.
    pub async fn analyze_screen(&mut self) {
        let prompt = self.view.input(InputField::AnalysisPrompt);
        let prompt = Some(prompt.trim()).filter(|prompt| !prompt.is_empty());

        self.view.show_loading("Analyzing screen with AI...");
        match self.api.analyze_screen(prompt).await {
            Ok(result) => {
                self.view
                    .render(Region::AnalysisResult, Panel::Text(result.analysis));
                self.succeed("Analysis complete");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    pub async fn refresh_windows(&mut self) {
        self.view.show_loading("Refreshing window list...");
        match self.api.list_windows().await {
            Ok(list) => {
                let count = list.count;
                self.view
                    .render(Region::WindowsList, Panel::Windows(list.windows));
                self.succeed(&format!("{count} windows found"));
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    /// Focuses a window, then refreshes the list once the window manager has
    /// had time to settle.
    pub async fn focus_window(&mut self, index: WindowIndex) {
        self.view.show_loading("Focusing window...");
        match self.api.focus_window(index).await {
            Ok(_) => {
                self.succeed("Window focused");
                // Awaited in place: the refresh needs `&mut self`, and the
                // window manager needs a moment before the new active window shows.
                if !self.focus_refresh_delay.is_zero() {
                    tokio::time::sleep(self.focus_refresh_delay).await;
                }
                self.refresh_windows().await;
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    pub async fn capture_window(&mut self, index: WindowIndex) {
        self.view.show_loading("Capturing window...");
        match self.api.capture_window(index).await {
            Ok(capture) => {
                self.view.render(
                    Region::ScreenPreview,
                    Panel::Image {
                        source: capture.image,
                        caption: Some(capture.window_title),
                    },
                );
                self.succeed("Window captured");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    pub async fn find_element(&mut self) {
        let Some(description) = self.required_input(
            InputField::ElementDescription,
            "Please describe the element to find",
        ) else {
            return;
        };

        self.view.show_loading("Searching for element...");
        match self.api.find_element(&description).await {
            Ok(result) => {
                self.view.hide_loading();
                match result.point() {
                    Some(point) => {
                        info!(%point, "element located");
                        self.session.locate(point);
                        self.view
                            .render(Region::FindElementResult, Panel::ElementFound(point));
                        self.view.set_enabled(Control::ClickElement, true);
                        self.notifier.notify("Element found", Severity::Success);
                    }
                    None => {
                        self.session.clear_location();
                        self.view
                            .render(Region::FindElementResult, Panel::ElementNotFound);
                        self.view.set_enabled(Control::ClickElement, false);
                        self.notifier
                            .notify("Element not found", Severity::Warning);
                    }
                }
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    /// Clicks the last located point. A successful click consumes the point;
    /// a failed one leaves it in place for a retry.
    pub async fn click_element(&mut self) {
        let Some(point) = self.session.located_point() else {
            self.notifier
                .notify("No element to click", Severity::Warning);
            return;
        };

        self.view.show_loading("Clicking...");
        match self.api.click(point).await {
            Ok(_) => {
                info!(%point, "click sent");
                self.session.clear_location();
                self.view.set_enabled(Control::ClickElement, false);
                self.succeed("Click executed");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    pub async fn quick_type(&mut self) {
        let Some(text) = self.required_input(
            InputField::QuickTypeText,
            "Please enter text to type",
        ) else {
            return;
        };

        self.view.show_loading("Typing text...");
        match self.api.type_text(&text).await {
            Ok(_) => {
                self.succeed("Text typed");
                self.view.set_input(InputField::QuickTypeText, "");
            }
            Err(err) => self.fail("Error: ", &err),
        }
    }

    // Live tracking would need a push channel from the backend; this stays static.
    pub fn update_mouse_position(&mut self) {
        self.view.render(
            Region::MousePosition,
            Panel::Text(MOUSE_POSITION_PLACEHOLDER.to_string()),
        );
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
