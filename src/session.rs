use crate::client::IdeaClient;
use crate::config::API_KEY_ENV;
use crate::display::{api_key_instructions, divider, render_generation, render_ideas};
use crate::error::Result;
use crate::llm::ModelBackend;
use crate::prompt::EXAMPLE_DOMAINS;
use std::io::{BufRead, Write};

/// Print `prompt`, then read one trimmed line. `None` means the input is exhausted.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn has_key(key: Option<&str>) -> bool {
    key.map(|k| !k.trim().is_empty()).unwrap_or(false)
}

/// Prompt for a key when neither `explicit` nor `env_value` carries one.
/// A blank answer yields `None`, leaving resolution to the environment value.
pub fn ask_for_api_key<R: BufRead, W: Write>(
    explicit: Option<String>,
    env_value: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    if has_key(explicit.as_deref()) || has_key(env_value) {
        return Ok(explicit);
    }

    write!(output, "{}", api_key_instructions(API_KEY_ENV))?;
    let entered = prompt_line(
        input,
        output,
        "\nEnter your Gemini API key (or press Enter if set as environment variable): ",
    )?;
    Ok(entered.filter(|k| !k.is_empty()))
}

fn wants_another(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

fn domain_prompt() -> String {
    let examples: Vec<String> = EXAMPLE_DOMAINS
        .iter()
        .take(2)
        .map(|d| format!("'{}'", d))
        .collect();
    format!("Enter a business domain (e.g., {}): ", examples.join(", "))
}

/// Read domains until the user declines or input ends. Returns how many generations ran.
pub async fn run_interactive<B, R, W>(
    client: &IdeaClient<B>,
    mut input: R,
    mut output: W,
) -> Result<usize>
where
    B: ModelBackend,
    R: BufRead,
    W: Write,
{
    let prompt = domain_prompt();
    let mut generated = 0;

    loop {
        writeln!(output, "\n{}", divider())?;
        let Some(domain) = prompt_line(&mut input, &mut output, &prompt)? else {
            break;
        };

        if domain.is_empty() {
            writeln!(output, "Please enter a valid business domain.")?;
            continue;
        }

        run_once(client, &domain, &mut output).await?;
        generated += 1;

        let answer = prompt_line(
            &mut input,
            &mut output,
            "\nWould you like to generate ideas for another domain? (y/n): ",
        )?;
        if !answer.as_deref().map(wants_another).unwrap_or(false) {
            break;
        }
    }

    writeln!(output, "\nThank you for using the Business Idea Generator! 🎉")?;
    Ok(generated)
}

/// Generate and print ideas for one domain. Returns whether generation succeeded.
pub async fn run_once<B, W>(client: &IdeaClient<B>, domain: &str, output: &mut W) -> Result<bool>
where
    B: ModelBackend,
    W: Write,
{
    writeln!(output, "\n🔄 Generating business ideas for: {}", domain)?;
    writeln!(output, "Please wait...")?;
    output.flush()?;

    let result = client.generate_ideas(domain).await;
    let succeeded = result.is_ok();
    if let Err(e) = &result {
        tracing::warn!(error_code = e.error_code(), "Generation failed: {}", e);
    }

    write!(output, "{}", render_ideas(&render_generation(result)))?;
    Ok(succeeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::FakeBackend;
    use crate::config::resolve_api_key;
    use std::io::Cursor;

    async fn client_with(reply: std::result::Result<&str, &str>) -> IdeaClient<FakeBackend> {
        let backend = FakeBackend::new(&["gemini-1.5-flash"], reply);
        IdeaClient::with_backend(backend, &["gemini-1.5-flash".to_string()])
            .await
            .expect("client")
    }

    #[test]
    fn existing_key_skips_prompt() {
        let mut output = Vec::new();
        let key = ask_for_api_key(None, Some("env-key"), &mut Cursor::new(""), &mut output)
            .expect("io");
        assert_eq!(key, None);
        assert!(output.is_empty());

        let key = ask_for_api_key(
            Some("flag-key".to_string()),
            None,
            &mut Cursor::new(""),
            &mut output,
        )
        .expect("io");
        assert_eq!(key.as_deref(), Some("flag-key"));
        assert!(output.is_empty());
    }

    #[test]
    fn prompts_when_no_key_is_set() {
        let mut output = Vec::new();
        let key = ask_for_api_key(None, Some("   "), &mut Cursor::new(" typed-key \n"), &mut output)
            .expect("io");
        assert_eq!(key.as_deref(), Some("typed-key"));

        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("API Key Setup Required"));
        assert!(text.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_prompted_key_defers_to_environment() {
        let mut output = Vec::new();
        let entered = ask_for_api_key(None, None, &mut Cursor::new("\n"), &mut output)
            .expect("io");
        assert_eq!(entered, None);

        let key = resolve_api_key(entered.clone(), Some("env-key".to_string())).expect("key");
        assert_eq!(key, "env-key");
        assert!(matches!(
            resolve_api_key(entered, None),
            Err(crate::error::IdeaError::Config(_))
        ));
    }

    #[test]
    fn continue_answers() {
        assert!(wants_another("y"));
        assert!(wants_another("YES"));
        assert!(!wants_another("n"));
        assert!(!wants_another(""));
        assert!(!wants_another("yep"));
    }

    #[tokio::test]
    async fn reprompts_on_empty_domain_and_stops_on_no() {
        let client = client_with(Ok("IDEA LIST")).await;
        let input = Cursor::new("\n   \nfintech\nn\n");
        let mut output = Vec::new();

        let count = run_interactive(&client, input, &mut output)
            .await
            .expect("session");
        let text = String::from_utf8(output).expect("utf8");

        assert_eq!(count, 1);
        assert_eq!(text.matches("Please enter a valid business domain.").count(), 2);
        assert!(text.contains("Generating business ideas for: fintech"));
        assert!(text.contains("IDEA LIST"));
        assert!(text.contains("Thank you for using the Business Idea Generator!"));
    }

    #[tokio::test]
    async fn shows_errors_and_keeps_going() {
        let client = client_with(Err("RESOURCE_EXHAUSTED: quota")).await;
        let input = Cursor::new("fintech\nyes\nurban agriculture\nno\n");
        let mut output = Vec::new();

        let count = run_interactive(&client, input, &mut output)
            .await
            .expect("session");
        let text = String::from_utf8(output).expect("utf8");

        assert_eq!(count, 2);
        assert_eq!(
            text.matches("Error generating business ideas: ").count(),
            2,
            "output: {}",
            text
        );
        assert!(text.contains("Generating business ideas for: urban agriculture"));
    }

    #[tokio::test]
    async fn ends_on_exhausted_input() {
        let client = client_with(Ok("ideas")).await;
        let mut output = Vec::new();

        let count = run_interactive(&client, Cursor::new("fintech\n"), &mut output)
            .await
            .expect("session");
        assert_eq!(count, 1);

        let count = run_interactive(&client, Cursor::new(""), Vec::new())
            .await
            .expect("session");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn run_once_reports_outcome() {
        let client = client_with(Err("boom")).await;
        let mut output = Vec::new();
        let ok = run_once(&client, "edtech", &mut output).await.expect("io");
        assert!(!ok);
        let text = String::from_utf8(output).expect("utf8");
        assert!(text.contains("Error generating business ideas: "));
        assert!(text.contains("boom"));
    }
}
