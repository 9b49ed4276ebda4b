use crate::config::BackendConfig;
use crate::error::{IdeaError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A model that instantiated successfully and is used for every later call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    /// Identifier as it appeared in the candidate list.
    pub id: String,
    /// Resource name understood by the API, e.g. `models/gemini-1.5-flash`.
    pub resource: String,
}

impl ModelHandle {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let resource = if id.starts_with("models/") {
            id.clone()
        } else {
            format!("models/{}", id)
        };
        Self { id, resource }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Resolve `id` into a usable handle. No text is generated.
    async fn instantiate(&self, id: &str) -> Result<ModelHandle>;

    async fn generate(&self, model: &ModelHandle, prompt: &str) -> Result<String>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gemini `generativelanguage` REST client.
pub struct GeminiClient {
    client: Client,
    config: BackendConfig,
}

impl GeminiClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.as_str().trim_end_matches('/'),
            path
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn instantiate(&self, id: &str) -> Result<ModelHandle> {
        let handle = ModelHandle::new(id);
        let url = self.url(&handle.resource);
        tracing::debug!("Looking up model metadata: {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| IdeaError::ModelUnavailable {
                model: id.to_string(),
                reason: e.to_string(),
            })?;

        if let Err(err) = check_status(response).await {
            return Err(IdeaError::ModelUnavailable {
                model: id.to_string(),
                reason: err.to_string(),
            });
        }

        Ok(handle)
    }

    async fn generate(&self, model: &ModelHandle, prompt: &str) -> Result<String> {
        let url = self.url(&format!("{}:generateContent", model.resource));

        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        });

        tracing::debug!("Calling Gemini API: {} with model: {}", url, model.id);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let v: serde_json::Value = response.json().await?;
        extract_text(v)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.url("models");
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.config.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = check_status(request.send().await?).await?;
            let page: ModelList = response.json().await?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Discovered {} models", models.len());
        Ok(models)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    Err(IdeaError::Api {
        status: status.as_u16(),
        message: describe_error_body(status, &body),
    })
}

fn describe_error_body(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = detect_provider_error(&v) {
            return msg;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Pull the text out of a `generateContent` reply, or explain why there is none.
fn extract_text(v: serde_json::Value) -> Result<String> {
    if let Some(msg) = detect_provider_error(&v) {
        return Err(IdeaError::Api {
            status: StatusCode::OK.as_u16(),
            message: msg,
        });
    }

    let parsed: GenerateContentResponse = serde_json::from_value(v)?;

    if let Some(reason) = parsed
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(IdeaError::Blocked(reason));
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Err(IdeaError::EmptyResponse);
    };

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        return match reason.as_str() {
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                Err(IdeaError::Blocked(reason.clone()))
            }
            _ => Err(IdeaError::EmptyResponse),
        };
    }

    Ok(texts.concat())
}

fn detect_provider_error(value: &serde_json::Value) -> Option<String> {
    let error_val = value.get("error")?;

    if let Some(obj) = error_val.as_object() {
        let message = obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let status = obj
            .get("status")
            .and_then(|s| s.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        return Some(match (status, message) {
            (Some(status), Some(msg)) => format!("{}: {}", status, msg),
            (None, Some(msg)) => msg,
            _ => error_val.to_string(),
        });
    }

    error_val
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
