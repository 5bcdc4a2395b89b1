use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{ActionDescriptor, LocatedPoint, WindowIndex},
    protocol::{
        paths, Acknowledgement, AnalysisResponse, AnalyzeRequest, ApiKeyRequest, ApiKeyResponse,
        ClickRequest, Envelope, ExecuteActionsRequest, FindElementRequest, FindElementResponse,
        InstructionRequest, PlanResponse, ScreenCaptureResponse, StatusResponse, SystemStatus,
        TypeTextRequest, WindowCaptureResponse, WindowListResponse,
    },
};
use tracing::{debug, error};

pub mod error;
pub mod notifier;
pub mod transport;

pub use error::ClientError;
pub use notifier::{Notifier, Severity, Toast, ToastStack, DEFAULT_TOAST_TTL};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Envelope-aware JSON client. One call is exactly one transport request.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url)))
    }

    /// Sends one request and returns the full envelope when `success` is true.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> ClientResult<Envelope> {
        let request = ApiRequest {
            method,
            endpoint: endpoint.to_string(),
            body,
        };

        match self.execute(&request).await {
            Ok(envelope) => {
                debug!(endpoint, %method, "api request succeeded");
                Ok(envelope)
            }
            Err(err) => {
                error!(endpoint, %method, error = %err, "api request failed");
                Err(err)
            }
        }
    }

    pub async fn get(&self, endpoint: &str) -> ClientResult<Envelope> {
        self.call(endpoint, Method::Get, None).await
    }

    async fn execute(&self, request: &ApiRequest) -> ClientResult<Envelope> {
        let raw = self
            .transport
            .send(request)
            .await
            .map_err(|err| ClientError::request_failed(format!("{err:#}")))?;
        let envelope: Envelope = serde_json::from_slice(&raw.body).map_err(|err| {
            ClientError::request_failed(format!(
                "malformed response (HTTP {}): {err}",
                raw.status
            ))
        })?;
        Ok(envelope.into_result()?)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let envelope = self.get(endpoint).await?;
        decode(endpoint, &envelope)
    }

    async fn submit<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| ClientError::request_failed(format!("failed to encode request: {err}")))?;
        let envelope = self.call(endpoint, Method::Post, body).await?;
        decode(endpoint, &envelope)
    }

    pub async fn status(&self) -> ClientResult<SystemStatus> {
        let response: StatusResponse = self.fetch(paths::STATUS).await?;
        Ok(response.status)
    }

    pub async fn plan_instruction(&self, instruction: &str) -> ClientResult<PlanResponse> {
        let body = InstructionRequest {
            instruction: instruction.to_string(),
        };
        self.submit(paths::AI_EXECUTE, Some(&body)).await
    }

    pub async fn execute_actions(
        &self,
        actions: &[ActionDescriptor],
    ) -> ClientResult<Acknowledgement> {
        let body = ExecuteActionsRequest {
            actions: actions.to_vec(),
        };
        self.submit(paths::AUTOMATION_EXECUTE, Some(&body)).await
    }

    pub async fn capture_screen(&self) -> ClientResult<ScreenCaptureResponse> {
        self.fetch(paths::CAPTURE_SCREEN).await
    }

    pub async fn analyze_screen(&self, prompt: Option<&str>) -> ClientResult<AnalysisResponse> {
        let body = AnalyzeRequest {
            prompt: prompt.map(str::to_string),
        };
        self.submit(paths::AI_ANALYZE, Some(&body)).await
    }

    pub async fn list_windows(&self) -> ClientResult<WindowListResponse> {
        self.fetch(paths::WINDOWS).await
    }

    pub async fn focus_window(&self, index: WindowIndex) -> ClientResult<Acknowledgement> {
        self.submit::<Value, _>(&paths::focus_window(index), None)
            .await
    }

    pub async fn capture_window(&self, index: WindowIndex) -> ClientResult<WindowCaptureResponse> {
        self.fetch(&paths::capture_window(index)).await
    }

    pub async fn find_element(&self, description: &str) -> ClientResult<FindElementResponse> {
        let body = FindElementRequest {
            description: description.to_string(),
        };
        self.submit(paths::AI_FIND_ELEMENT, Some(&body)).await
    }

    pub async fn click(&self, point: LocatedPoint) -> ClientResult<Acknowledgement> {
        self.submit(paths::AUTOMATION_CLICK, Some(&ClickRequest::from(point)))
            .await
    }

    pub async fn type_text(&self, text: &str) -> ClientResult<Acknowledgement> {
        let body = TypeTextRequest {
            text: text.to_string(),
        };
        self.submit(paths::AUTOMATION_TYPE, Some(&body)).await
    }

    pub async fn configure_api_key(&self, api_key: &str) -> ClientResult<ApiKeyResponse> {
        let body = ApiKeyRequest {
            api_key: api_key.to_string(),
        };
        self.submit(paths::CONFIG_API_KEY, Some(&body)).await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, envelope: &Envelope) -> ClientResult<T> {
    envelope.payload().map_err(|err| {
        error!(endpoint, error = %err, "api response payload did not match");
        ClientError::from(err)
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
