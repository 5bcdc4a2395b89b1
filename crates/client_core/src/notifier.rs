//! Short-lived user-facing notifications.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use tracing::{error, info, warn};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Unrecognized labels get the default style rather than an error.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "warning" | "warn" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn style_class(self) -> &'static str {
        match self {
            Self::Info => "toast-info",
            Self::Success => "toast-success",
            Self::Warning => "toast-warning",
            Self::Error => "toast-error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "fa-info-circle",
            Self::Success => "fa-check-circle",
            Self::Warning => "fa-exclamation-triangle",
            Self::Error => "fa-exclamation-circle",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    created_at: Instant,
}

#[derive(Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// Stack of visible toasts. Each toast expires on its own timer.
#[derive(Clone)]
pub struct ToastStack {
    inner: Arc<Mutex<ToastState>>,
    ttl: Duration,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStack {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOAST_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToastState::default())),
            ttl,
        }
    }

    pub fn visible(&self) -> Vec<Toast> {
        let ttl = self.ttl;
        let mut state = lock(&self.inner);
        state.toasts.retain(|toast| toast.created_at.elapsed() < ttl);
        state.toasts.clone()
    }

    pub fn dismiss(&self, id: u64) {
        lock(&self.inner).toasts.retain(|toast| toast.id != id);
    }
}

impl Notifier for ToastStack {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(%severity, text = message, "notification"),
            Severity::Warning => warn!(%severity, text = message, "notification"),
            Severity::Info | Severity::Success => info!(%severity, text = message, "notification"),
        }

        let id = {
            let mut state = lock(&self.inner);
            let id = state.next_id;
            state.next_id += 1;
            state.toasts.push(Toast {
                id,
                message: message.to_string(),
                severity,
                created_at: Instant::now(),
            });
            id
        };

        // Without a runtime, expiry is still enforced lazily by `visible`.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::downgrade(&self.inner);
            let ttl = self.ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                if let Some(inner) = inner.upgrade() {
                    lock(&inner).toasts.retain(|toast| toast.id != id);
                }
            });
        }
    }
}

fn lock(state: &Mutex<ToastState>) -> MutexGuard<'_, ToastState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
