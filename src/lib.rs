pub mod client;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod config_tests;

// Main types re-exported for the binary
pub use client::IdeaClient;
pub use config::Settings;
pub use error::IdeaError;
pub use llm::{GeminiClient, ModelBackend, ModelHandle, ModelInfo};
