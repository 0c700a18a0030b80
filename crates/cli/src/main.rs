use anyhow::{Context, Result};
use cdpchat_agent::Conversation;
use cdpchat_core::logging::{LoggingConfig, init_logging};
use cdpchat_core::{ChannelConfig, Config, TranscriptEntry};
use cdpchat_providers::{ChannelFactory, HealthCheck};
use cdpchat_ui::App;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// cdpchat - terminal support chat for Customer Data Platforms
#[derive(Parser, Debug)]
#[command(name = "cdpchat")]
#[command(about = "Ask how-to questions about Segment, mParticle, Lytics, and Zeotap", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, value_name = "PATH", default_value = "cdpchat.toml")]
    config: PathBuf,

    /// Query endpoint, overriding the config file
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Ask one question, print the answer and exit
    Ask {
        #[arg(required = true, value_name = "QUERY")]
        query: Vec<String>,
    },
    /// Show configuration and check that the answering engine is up
    Status,
    /// Write an example config file
    Init,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    match command {
        Commands::Init => return cmd_init(&cli.config),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cdpchat", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli.config, cli.endpoint.as_deref(), cli.verbose)?;

    let interactive = matches!(command, Commands::Chat);
    let mut logging = LoggingConfig::from(config.logging.clone()).with_stderr(!interactive);
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    let _guard = init_logging(logging).context("Failed to initialize logging")?;

    match command {
        Commands::Chat => cmd_chat(&config).await,
        Commands::Ask { query } => cmd_ask(&config, &query.join(" "), cli.verbose).await,
        Commands::Status => cmd_status(&config, cli.verbose).await,
        Commands::Init | Commands::Completions { .. } => Ok(()),
    }
}

/// Load config from file (or defaults) and apply the endpoint override
fn load_config(path: &Path, endpoint: Option<&str>, verbose: bool) -> Result<Config> {
    let (config, found) =
        Config::load_or_default(path).with_context(|| format!("Failed to load config from {}", path.display()))?;

    if verbose {
        if found {
            println!("{} Using config: {}", "Info:".blue().bold(), path.display());
        } else {
            println!("{} No config at {}, using defaults", "Info:".blue().bold(), path.display());
        }
    }

    match endpoint {
        Some(url) => config.with_endpoint(url).context("Invalid --endpoint"),
        None => Ok(config),
    }
}

/// Write the example config, refusing to overwrite
fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists; refusing to overwrite", path.display());
    }
    std::fs::write(path, Config::example()).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created config at {}", "Success:".green().bold(), path.display());
    Ok(())
}

/// Interactive terminal chat
async fn cmd_chat(config: &Config) -> Result<()> {
    let conversation = Conversation::from_config(config).context("Failed to set up the conversation")?;
    let mut app = App::new(conversation, &config.chat);
    app.run().await.context("Terminal UI failed")?;
    Ok(())
}

/// One-shot question; failure of the request is a failure of the command
async fn cmd_ask(config: &Config, query: &str, verbose: bool) -> Result<()> {
    let mut conversation = Conversation::from_config(config).context("Failed to set up the conversation")?;
    if verbose {
        println!("{} Sending to {}", "Info:".blue().bold(), conversation.describe_channel().cyan());
    }

    let entry = conversation.ask(query).await?;
    if entry.is_failed() {
        anyhow::bail!("{}", entry.text);
    }

    print_answer(entry, verbose);
    Ok(())
}

fn print_answer(entry: &TranscriptEntry, verbose: bool) {
    if verbose && let Some(kind) = &entry.query_type {
        println!("{} {}", "Query type:".blue().bold(), kind);
    }
    println!("{}", entry.text);

    if entry.has_citations() {
        println!();
        println!("{}", "Sources:".bold());
        for citation in &entry.citations {
            println!("  • {} ({})", citation.title, citation.source_label.cyan());
            println!("    {}", citation.url.underline());
        }
    }
}

/// Show configuration and probe the health route
async fn cmd_status(config: &Config, verbose: bool) -> Result<()> {
    println!("{}", "cdpchat Status".green().bold().underline());
    println!();

    println!("{} Channel", "Info:".blue().bold());
    println!("  Kind: {}", config.channel.kind().cyan());

    match &config.channel {
        ChannelConfig::Http { endpoint, timeout_ms, .. } => {
            println!("  Endpoint: {}", endpoint.cyan());
            println!("  Timeout: {} ms", timeout_ms);
        }
        ChannelConfig::Mock { responses_file, latency_ms } => {
            match responses_file {
                Some(path) => println!("  Responses: {}", path.display().cyan()),
                None => println!("  Responses: {}", "built-in".cyan()),
            }
            println!("  Latency: {} ms", latency_ms);
        }
    }

    if verbose {
        println!();
        println!("{} Chat", "Info:".blue().bold());
        println!("  Title: {}", config.chat.title);
        println!("  Log level: {}", config.logging.level);
        println!("  Query logging: {}", config.logging.privacy.log_queries);
    }

    if !matches!(config.channel, ChannelConfig::Http { .. }) {
        println!();
        println!("{} Mock channel, nothing to probe", "Info:".yellow().bold());
        return Ok(());
    }

    let channel = ChannelFactory::http_from_config(&config.channel)?;
    let endpoint = channel.health_endpoint().unwrap_or_default().to_string();
    let health = channel.check_health().await;

    println!();
    println!("{} Answering engine ({})", "Info:".blue().bold(), endpoint);
    if health.healthy {
        println!("  {} ({} ms)", "healthy".green().bold(), health.latency_ms);
        Ok(())
    } else {
        println!("  {}", "unhealthy".red().bold());
        anyhow::bail!(health.error.unwrap_or_else(|| "health check failed".to_string()))
    }
}
