use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{ActionDescriptor, LocatedPoint, WindowIndex, WindowSummary},
    error::EnvelopeError,
};

/// Backend paths. Window-scoped paths take the index as the last segment.
pub mod paths {
    use crate::domain::WindowIndex;

    pub const STATUS: &str = "/api/status";
    pub const AI_EXECUTE: &str = "/api/ai/execute";
    pub const AI_ANALYZE: &str = "/api/ai/analyze";
    pub const AI_FIND_ELEMENT: &str = "/api/ai/find-element";
    pub const AUTOMATION_EXECUTE: &str = "/api/automation/execute";
    pub const AUTOMATION_CLICK: &str = "/api/automation/click";
    pub const AUTOMATION_TYPE: &str = "/api/automation/type";
    pub const CAPTURE_SCREEN: &str = "/api/capture/screen";
    pub const WINDOWS: &str = "/api/windows";
    pub const CONFIG_API_KEY: &str = "/api/config/api-key";

    pub fn focus_window(index: WindowIndex) -> String {
        format!("/api/windows/focus/{index}")
    }

    pub fn capture_window(index: WindowIndex) -> String {
        format!("/api/capture/window/{index}")
    }
}

/// `{ success, error?, ...fields }` wrapper around every backend response.
/// Domain fields sit next to `success` at the top level of the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    pub fn ok(fields: Map<String, Value>) -> Self {
        Self {
            success: true,
            error: None,
            fields,
        }
    }

    /// The `success` flag is authoritative; HTTP status is never consulted.
    pub fn into_result(self) -> Result<Self, EnvelopeError> {
        if self.success {
            Ok(self)
        } else {
            Err(EnvelopeError::rejected(self.error.as_deref()))
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, EnvelopeError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| EnvelopeError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize(pub u32, pub u32);

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub ai_enabled: bool,
    pub api_key_configured: bool,
    #[serde(default)]
    pub model: Option<String>,
    pub screen_size: ScreenSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: SystemStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructionRequest {
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanResponse {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub success_criteria: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteActionsRequest {
    pub actions: Vec<ActionDescriptor>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AnalyzeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenCaptureResponse {
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ScreenCaptureResponse {
    pub fn size(&self) -> Option<ScreenSize> {
        Some(ScreenSize(self.width?, self.height?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCaptureResponse {
    pub image: String,
    pub window_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowListResponse {
    pub count: usize,
    pub windows: Vec<WindowSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindElementRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindElementResponse {
    pub found: bool,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FindElementResponse {
    /// A point only exists when the search reported a hit with both coordinates.
    pub fn point(&self) -> Option<LocatedPoint> {
        match (self.found, self.x, self.y) {
            (true, Some(x), Some(y)) => Some(LocatedPoint { x, y }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClickRequest {
    pub x: i64,
    pub y: i64,
}

impl From<LocatedPoint> for ClickRequest {
    fn from(point: LocatedPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeTextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Body of endpoints whose success carries nothing the client needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}
