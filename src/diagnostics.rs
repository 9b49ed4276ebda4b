use crate::error::Result;
use crate::llm::{ModelBackend, ModelHandle};
use std::io::Write;

const CHECK_PROMPT: &str = "Hello, world!";
const PREVIEW_CHARS: usize = 50;

/// Print every model the backend can see. Listing failures are printed, not returned.
pub async fn list_models<B, W>(backend: &B, output: &mut W, with_methods: bool) -> Result<bool>
where
    B: ModelBackend,
    W: Write,
{
    match backend.list_models().await {
        Ok(models) => {
            writeln!(output, "Available models:")?;
            for model in models {
                writeln!(output, "  - {}", model.name)?;
                if with_methods && !model.supported_generation_methods.is_empty() {
                    writeln!(
                        output,
                        "    Supported methods: {}",
                        model.supported_generation_methods.join(", ")
                    )?;
                }
            }
            Ok(true)
        }
        Err(e) => {
            tracing::error!(error_code = e.error_code(), "Listing models failed: {}", e);
            writeln!(output, "Error listing models: {}", e)?;
            Ok(false)
        }
    }
}

/// List models, then generate a short reply with each candidate until one answers.
/// No model selection happens first, so this still runs when no candidate instantiates.
pub async fn check<B, W>(backend: &B, candidates: &[String], output: &mut W) -> Result<bool>
where
    B: ModelBackend,
    W: Write,
{
    writeln!(output, "✅ API configured successfully")?;
    writeln!(output, "\n📋 Available models:")?;
    list_models(backend, output, true).await?;

    writeln!(output, "\n🧪 Testing model generation...")?;
    for candidate in candidates {
        let handle = ModelHandle::new(candidate.as_str());
        match backend.generate(&handle, CHECK_PROMPT).await {
            Ok(text) => {
                let preview: String = text.chars().take(PREVIEW_CHARS).collect();
                writeln!(output, "✅ {}: {}...", candidate, preview)?;
                return Ok(true);
            }
            Err(e) => writeln!(output, "❌ {}: {}", candidate, e)?,
        }
    }
    Ok(false)
}
