use crate::config::{resolve_api_key, BackendConfig, Settings, API_KEY_ENV};
use crate::error::{IdeaError, Result};
use crate::llm::{GeminiClient, ModelBackend, ModelHandle, ModelInfo};
use crate::prompt;
use std::env;

/// Generates business ideas with the first model from the candidate list that the backend accepts.
pub struct IdeaClient<B = GeminiClient> {
    backend: B,
    model: ModelHandle,
}

/// Configure the HTTP backend without selecting a model. Diagnostics run against this.
pub fn connect_backend(settings: &Settings, api_key: Option<String>) -> Result<GeminiClient> {
    let key = resolve_api_key(api_key, env::var(API_KEY_ENV).ok())?;
    GeminiClient::new(BackendConfig::from_settings(&settings.backend, key)?)
}

impl IdeaClient<GeminiClient> {
    /// Resolve the key (explicit, then `GEMINI_API_KEY`), configure the HTTP backend and pick a model.
    pub async fn new(settings: &Settings, api_key: Option<String>) -> Result<Self> {
        Self::configure(
            api_key,
            env::var(API_KEY_ENV).ok(),
            &settings.models.candidates,
            |key| GeminiClient::new(BackendConfig::from_settings(&settings.backend, key)?),
        )
        .await
    }
}

impl<B: ModelBackend> IdeaClient<B> {
    /// `connect` only runs once a key has been found.
    pub async fn configure<F>(
        api_key: Option<String>,
        env_value: Option<String>,
        candidates: &[String],
        connect: F,
    ) -> Result<Self>
    where
        F: FnOnce(String) -> Result<B>,
    {
        let key = resolve_api_key(api_key, env_value)?;
        let backend = connect(key)?;
        Self::with_backend(backend, candidates).await
    }

    pub async fn with_backend(backend: B, candidates: &[String]) -> Result<Self> {
        let model = select_model(&backend, candidates).await?;
        Ok(Self { backend, model })
    }

    pub fn active_model(&self) -> &ModelHandle {
        &self.model
    }

    pub async fn generate_ideas(&self, domain: &str) -> Result<String> {
        let prompt = prompt::build(domain);
        tracing::debug!(
            model = %self.model.id,
            domain = %domain,
            prompt_len = prompt.len(),
            "Requesting business ideas"
        );
        self.backend.generate(&self.model, &prompt).await
    }

    pub async fn list_available_models(&self) -> Result<Vec<ModelInfo>> {
        self.backend.list_models().await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

async fn select_model<B: ModelBackend>(backend: &B, candidates: &[String]) -> Result<ModelHandle> {
    for candidate in candidates {
        match backend.instantiate(candidate).await {
            Ok(handle) => {
                tracing::info!("Using model: {}", candidate);
                return Ok(handle);
            }
            Err(e) => {
                tracing::warn!(candidate = %candidate, "{}", e);
            }
        }
    }

    Err(IdeaError::NoModelAvailable {
        tried: candidates.to_vec(),
    })
}
