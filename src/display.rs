use crate::error::IdeaError;

pub const GENERATION_ERROR_PREFIX: &str = "Error generating business ideas: ";

const FRAME_WIDTH: usize = 80;
const DIVIDER_WIDTH: usize = 60;

pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

/// Text shown for a generation attempt: the ideas, or the failure as a readable line.
pub fn render_generation(result: Result<String, IdeaError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("{}{}", GENERATION_ERROR_PREFIX, e),
    }
}

pub fn render_ideas(text: &str) -> String {
    let rule = "=".repeat(FRAME_WIDTH);
    format!(
        "\n{rule}\n🚀 GENERATED BUSINESS IDEAS 🚀\n{rule}\n{text}\n{rule}\n",
        rule = rule,
        text = text
    )
}

pub fn welcome_banner() -> String {
    format!(
        "Welcome to the Business Idea Generator!\n\
         This tool uses Google's Gemini AI to generate innovative business ideas.\n{}\n",
        divider()
    )
}

pub fn api_key_instructions(env_var: &str) -> String {
    format!(
        "\n⚠️  API Key Setup Required:\n\
         1. Get your free API key from: https://ai.google.dev/\n\
         2. Set environment variable: export {}=your_api_key_here\n\
         3. Or enter it below (not recommended for production)\n",
        env_var
    )
}
