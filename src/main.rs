use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ideaforge::client::connect_backend;
use ideaforge::config::API_KEY_ENV;
use ideaforge::display::{divider, welcome_banner};
use ideaforge::prompt::EXAMPLE_DOMAINS;
use ideaforge::session::{self, run_interactive, run_once};
use ideaforge::{diagnostics, IdeaClient, Settings};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ideaforge",
    version,
    about = "Generate business ideas for a market domain with Google Gemini"
)]
struct Cli {
    /// Configuration file (default: $IDEAFORGE_CONFIG or ~/.config/ideaforge/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gemini API key; falls back to GEMINI_API_KEY
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Debug logging for ideaforge
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate ideas interactively, or once with --domain
    Run {
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// List every model the API key can see
    Models,
    /// Check the API key and try a short generation on each candidate model
    Check,
    /// Print example domains
    Domains,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let crate_level = if verbose { "ideaforge=debug" } else { "ideaforge=info" };
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive(crate_level.parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => Settings::load_auto().context("Failed to load configuration"),
    }
}

/// Ask for a key on the terminal when neither the flag nor the environment provides one.
fn ask_for_api_key(explicit: Option<String>) -> Result<Option<String>> {
    let env_value = std::env::var(API_KEY_ENV).ok();
    if !io::stdin().is_terminal() {
        return Ok(explicit);
    }
    Ok(session::ask_for_api_key(
        explicit,
        env_value.as_deref(),
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )?)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(Command::Domains) = cli.command {
        for domain in EXAMPLE_DOMAINS {
            println!("{}", domain);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(cli.config)?;

    print!("{}", welcome_banner());
    let api_key = ask_for_api_key(cli.api_key)?;

    if let Some(Command::Models | Command::Check) = cli.command {
        let backend = match connect_backend(&settings, api_key) {
            Ok(backend) => backend,
            Err(e) => {
                error!(error_code = e.error_code(), "Backend configuration failed: {}", e);
                println!("\n❌ Error: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        };
        let mut stdout = io::stdout();
        let ok = match cli.command {
            Some(Command::Check) => {
                diagnostics::check(&backend, &settings.models.candidates, &mut stdout).await?
            }
            _ => diagnostics::list_models(&backend, &mut stdout, false).await?,
        };
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let client = match IdeaClient::new(&settings, api_key).await {
        Ok(client) => client,
        Err(e) => {
            error!(error_code = e.error_code(), "Client construction failed: {}", e);
            println!("\n❌ Error: {}", e);
            if e.is_fatal() {
                println!("Please make sure you have a valid Gemini API key.");
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("Ready with model {}", client.active_model().id);

    let ok = match cli.command {
        Some(Command::Run {
            domain: Some(domain),
        }) if !domain.trim().is_empty() => {
            let mut stdout = io::stdout();
            let ok = run_once(&client, domain.trim(), &mut stdout).await?;
            writeln!(stdout, "{}", divider())?;
            ok
        }
        _ => {
            let stdin = io::stdin();
            run_interactive(&client, stdin.lock(), io::stdout()).await?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    run(cli).await
}
