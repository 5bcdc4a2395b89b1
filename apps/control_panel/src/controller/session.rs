//! Page-scoped state owned by each controller.

use shared::domain::{ActionDescriptor, LocatedPoint};

/// At most one plan is pending; a new plan replaces the old one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DashboardSession {
    pending_actions: Vec<ActionDescriptor>,
    located_point: Option<LocatedPoint>,
}

impl DashboardSession {
    pub fn replace_plan(&mut self, actions: Vec<ActionDescriptor>) {
        self.pending_actions = actions;
    }

    pub fn clear_plan(&mut self) {
        self.pending_actions.clear();
    }

    pub fn pending_actions(&self) -> &[ActionDescriptor] {
        &self.pending_actions
    }

    pub fn locate(&mut self, point: LocatedPoint) {
        self.located_point = Some(point);
    }

    pub fn clear_location(&mut self) {
        self.located_point = None;
    }

    pub fn located_point(&self) -> Option<LocatedPoint> {
        self.located_point
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSession {
    api_key_masked: bool,
}

impl Default for SettingsSession {
    fn default() -> Self {
        Self {
            api_key_masked: true,
        }
    }
}

impl SettingsSession {
    pub fn api_key_masked(&self) -> bool {
        self.api_key_masked
    }

    pub fn toggle_api_key_masking(&mut self) -> bool {
        self.api_key_masked = !self.api_key_masked;
        self.api_key_masked
    }
}
