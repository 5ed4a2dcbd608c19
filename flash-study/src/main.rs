//! flash-study - terminal study client
//!
//! Loads the flashcards from the flashcard API, uploads PDFs to the agent
//! service for generation and walks through the cards with graded answers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flash_common::config::{config_source, load_toml_config};
use flash_study::command::{parse_command, Command, HELP};
use flash_study::view::render;
use flash_study::{Action, ClientConfig, RuntimeConfig, StudyClient, StudyRuntime, StudyState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Command-line arguments for flash-study
#[derive(Parser, Debug)]
#[command(name = "flash-study")]
#[command(about = "Terminal client for studying flashcards")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config_dir>/flashcards/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flashcard API base URL
    #[arg(long, env = "FLASHCARDS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Generation and grading service base URL
    #[arg(long, env = "FLASHCARDS_AGENT_URL")]
    agent_url: Option<String>,

    /// Timeout for each outbound request, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = load_toml_config(args.config.as_deref())?;

    // stdout is the UI, logs go to stderr and stay quiet unless configured
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level_or("warn").into()),
        )
        .init();

    info!("Starting flash-study v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = config_source(args.config.as_deref()) {
        info!("Config file: {}", path.display());
    }

    let mut services = toml_config.services.clone();
    if let Some(url) = args.backend_url {
        services.backend_url = url;
    }
    if let Some(url) = args.agent_url {
        services.agent_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        services.request_timeout_secs = secs;
    }
    info!(
        backend = %services.backend_url,
        agent = %services.agent_url,
        "Service endpoints"
    );

    let client =
        StudyClient::new(ClientConfig::from(&services)).context("Failed to build HTTP client")?;
    let (mut runtime, mut outcomes) =
        StudyRuntime::new(client, RuntimeConfig::from(&toml_config.study));

    let color = !args.no_color;
    let mut state = StudyState::default();

    println!("{}\n", HELP);
    runtime.dispatch(&mut state, Action::Mounted);
    println!("{}", render(&state, color));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let before = state.clone();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Actions(actions) => {
                        for action in actions {
                            runtime.dispatch(&mut state, action);
                        }
                    }
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Unknown(word) => {
                        println!("Unknown command: {} (try `help`)", word);
                    }
                }
            }
            Some(action) = outcomes.recv() => {
                debug!(?action, "Effect outcome");
                runtime.dispatch(&mut state, action);
            }
        }

        if state != before {
            println!("{}", render(&state, color));
        }
    }

    info!("flash-study exiting");
    Ok(())
}
