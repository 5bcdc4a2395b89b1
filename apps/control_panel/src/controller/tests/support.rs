//! Recording doubles for the view, notifier, and transport seams.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use async_trait::async_trait;
use client_core::{ApiClient, ApiRequest, Notifier, RawResponse, Severity, Transport};
use serde_json::Value;

use crate::ui::{Control, InputField, PageView, Panel, Region};

#[derive(Default)]
pub struct RecordingView {
    pub inputs: HashMap<InputField, String>,
    pub masked: HashMap<InputField, bool>,
    pub regions: HashMap<Region, Panel>,
    pub hidden: HashSet<Region>,
    pub enabled: HashMap<Control, bool>,
    pub loading: Option<String>,
    pub loading_labels: Vec<String>,
}

impl RecordingView {
    pub fn with_input(field: InputField, value: &str) -> Self {
        let mut view = Self::default();
        view.inputs.insert(field, value.to_string());
        view
    }

    pub fn panel(&self, region: Region) -> Option<&Panel> {
        self.regions.get(&region)
    }
}

impl PageView for RecordingView {
    fn input(&self, field: InputField) -> String {
        self.inputs.get(&field).cloned().unwrap_or_default()
    }

    fn set_input(&mut self, field: InputField, value: &str) {
        self.inputs.insert(field, value.to_string());
    }

    fn set_masked(&mut self, field: InputField, masked: bool) {
        self.masked.insert(field, masked);
    }

    fn show_loading(&mut self, label: &str) {
        self.loading = Some(label.to_string());
        self.loading_labels.push(label.to_string());
    }

    fn hide_loading(&mut self) {
        self.loading = None;
    }

    fn render(&mut self, region: Region, panel: Panel) {
        self.hidden.remove(&region);
        self.regions.insert(region, panel);
    }

    fn hide(&mut self, region: Region) {
        self.hidden.insert(region);
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled.insert(control, enabled);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn entries(&self) -> Vec<(String, Severity)> {
        self.entries.lock().expect("notifier lock").clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|(_, s)| *s == severity)
            .count()
    }

    pub fn last(&self) -> Option<(String, Severity)> {
        self.entries().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.entries
            .lock()
            .expect("notifier lock")
            .push((message.to_string(), severity));
    }
}

pub enum Reply {
    Json(Value),
    Raw(&'static str),
    Unreachable,
}

pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(self.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> anyhow::Result<RawResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted reply for {}", request.endpoint))?;
        match reply {
            Reply::Json(value) => Ok(RawResponse {
                status: 200,
                body: serde_json::to_vec(&value)?,
            }),
            Reply::Raw(text) => Ok(RawResponse {
                status: 200,
                body: text.as_bytes().to_vec(),
            }),
            Reply::Unreachable => Err(anyhow!("connection refused")),
        }
    }
}
