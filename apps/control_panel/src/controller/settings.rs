//! Settings page: system status badges, API key configuration, connection test.

use std::time::Duration;

use client_core::{ApiClient, Notifier, Severity};
use tracing::{debug, info, warn};

use crate::{
    controller::{
        events::{resolve, SettingsAction, Trigger, SETTINGS_BINDINGS, SETTINGS_ON_LOAD},
        session::SettingsSession,
    },
    ui::{BadgeTone, InputField, PageView, Panel, Region},
};

pub const DEFAULT_STATUS_RELOAD_DELAY: Duration = Duration::from_secs(1);

pub struct SettingsController<V, N> {
    api: ApiClient,
    view: V,
    notifier: N,
    session: SettingsSession,
    status_reload_delay: Duration,
}

impl<V: PageView, N: Notifier> SettingsController<V, N> {
    pub fn new(api: ApiClient, view: V, notifier: N) -> Self {
        Self {
            api,
            view,
            notifier,
            session: SettingsSession::default(),
            status_reload_delay: DEFAULT_STATUS_RELOAD_DELAY,
        }
    }

    pub fn with_status_reload_delay(mut self, delay: Duration) -> Self {
        self.status_reload_delay = delay;
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

    pub fn session(&self) -> &SettingsSession {
        &self.session
    }

    pub async fn load(&mut self) {
        self.view
            .set_masked(InputField::ApiKey, self.session.api_key_masked());
        for action in SETTINGS_ON_LOAD {
            self.run(*action).await;
        }
    }

    pub async fn dispatch(&mut self, trigger: Trigger, element_id: &str) -> bool {
        let Some(action) = resolve(SETTINGS_BINDINGS, trigger, element_id) else {
            debug!(element_id, ?trigger, "no settings binding");
            return false;
        };
        debug!(action = action.name(), element_id, "dispatching settings event");
        self.run(action).await;
        true
    }

    pub async fn run(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::LoadStatus => self.load_status().await,
            SettingsAction::SaveApiKey => self.save_api_key().await,
            SettingsAction::ToggleApiKeyVisibility => self.toggle_api_key_visibility(),
            SettingsAction::TestConnection => self.test_connection().await,
        }
    }

    pub async fn load_status(&mut self) {
        match self.api.status().await {
            Ok(status) => {
                let key_badge = if status.api_key_configured {
                    Panel::Badge {
                        label: "Configured",
                        tone: BadgeTone::Success,
                    }
                } else {
                    Panel::Badge {
                        label: "Not configured",
                        tone: BadgeTone::Warning,
                    }
                };
                let ai_badge = if status.ai_enabled {
                    Panel::Badge {
                        label: "Enabled",
                        tone: BadgeTone::Success,
                    }
                } else {
                    Panel::Badge {
                        label: "Disabled",
                        tone: BadgeTone::Danger,
                    }
                };
                self.view.render(Region::ApiKeyStatus, key_badge);
                self.view.render(Region::AiStatus, ai_badge);
                self.view.render(
                    Region::ModelStatus,
                    Panel::Text(status.model.unwrap_or_else(|| "N/A".to_string())),
                );
                self.view.render(
                    Region::ScreenResolution,
                    Panel::Text(status.screen_size.to_string()),
                );
            }
            Err(err) => self.notifier.notify(
                &format!("Failed to load status: {}", err.message()),
                Severity::Error,
            ),
        }
    }

    /// Forwards the key to the backend; nothing is stored client-side.
    pub async fn save_api_key(&mut self) {
        let api_key = self.view.input(InputField::ApiKey).trim().to_string();
        if api_key.is_empty() {
            warn!("api key input is empty");
            self.notifier
                .notify("Please enter an API key", Severity::Warning);
            return;
        }

        self.view.render(Region::ApiKeyResult, Panel::ApiKeyPending);
        match self.api.configure_api_key(&api_key).await {
            Ok(response) => {
                info!(model = ?response.model, "api key accepted");
                self.view.render(
                    Region::ApiKeyResult,
                    Panel::ApiKeyAccepted {
                        message: response.message,
                        model: response.model,
                    },
                );
                self.notifier
                    .notify("API key configured successfully", Severity::Success);

                if !self.status_reload_delay.is_zero() {
                    tokio::time::sleep(self.status_reload_delay).await;
                }
                self.load_status().await;
            }
            Err(err) => {
                self.view.render(
                    Region::ApiKeyResult,
                    Panel::ApiKeyRejected(err.message().to_string()),
                );
                self.notifier.notify(
                    &format!("Failed to save API key: {}", err.message()),
                    Severity::Error,
                );
            }
        }
    }

    pub fn toggle_api_key_visibility(&mut self) {
        let masked = self.session.toggle_api_key_masking();
        self.view.set_masked(InputField::ApiKey, masked);
    }

    pub async fn test_connection(&mut self) {
        self.notifier
            .notify("Testing connection...", Severity::Info);
        match self.api.status().await {
            Ok(status) if status.ai_enabled => self.notifier.notify(
                "Connection successful. AI is working correctly.",
                Severity::Success,
            ),
            Ok(_) => self.notifier.notify(
                "Server connected but AI is not configured.",
                Severity::Warning,
            ),
            Err(err) => self.notifier.notify(
                &format!("Connection error: {}", err.message()),
                Severity::Error,
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
