use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use qa_compare::auth::{self, AuthStorage};
use qa_compare::banner::{BannerInfo, format_comparison, print_banner};
use qa_compare::compare::{CompareConfig, Comparator};
use qa_compare::config::{Config, Overrides, Settings};
use qa_compare::consts::{PROVIDER, TOKEN_ENV, default_db_path};
use qa_compare::gallery;
use qa_compare::reader::hf::{HfConfig, HfReader};
use qa_compare::registry::ModelRegistry;
use qa_compare::spinner::Spinner;
use qa_compare::web::{self, AppState};

#[derive(Parser)]
#[command(name = "qa-compare", version, about = "Ask three QA models the same question.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// SQLite database for credentials and config (use :memory: for ephemeral)
    #[arg(short, long, global = true)]
    db: Option<String>,

    /// Base URL of the inference API
    #[arg(long, global = true)]
    inference_url: Option<String>,

    /// Base URL of the model hub
    #[arg(long, global = true)]
    hub_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the comparison UI (default)
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Open the UI in a browser once listening
        #[arg(long, default_value_t = false)]
        open: bool,

        /// Skip checking models on the hub at startup
        #[arg(long, default_value_t = false)]
        no_load: bool,
    },
    /// Ask all models one question and print their answers
    Ask {
        /// Passage containing the answer
        #[arg(short, long, required_unless_present = "example")]
        context: Option<String>,

        /// Question about the passage
        #[arg(short, long, required_unless_present = "example")]
        question: Option<String>,

        /// Use a built-in example instead (0-based)
        #[arg(short, long, conflicts_with_all = ["context", "question"])]
        example: Option<usize>,
    },
    /// List the compared models and their SQuAD scores
    Models,
    /// Store a Hugging Face access token
    Login {
        /// Token to store (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored access token
    Logout,
    /// Read or change persistent settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a setting
    Get { key: String },
    /// Change a setting
    Set { key: String, value: String },
    /// Reset a setting to its default
    Unset { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("qa_compare=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db.as_deref())?;

    let command = cli.command.unwrap_or(Command::Serve {
        bind: None,
        open: false,
        no_load: false,
    });

    let overrides = Overrides {
        bind: match &command {
            Command::Serve { bind, .. } => *bind,
            _ => None,
        },
        inference_url: cli.inference_url,
        hub_url: cli.hub_url,
        timeout: cli.timeout,
    };

    match command {
        Command::Serve { open, no_load, .. } => serve(&db_path, &overrides, open, no_load).await,
        Command::Ask {
            context,
            question,
            example,
        } => {
            let (context, question) = match example {
                Some(i) => {
                    let e = gallery::example(i).with_context(|| {
                        format!("no example {i} (have {})", gallery::examples().len())
                    })?;
                    (e.context.to_string(), e.question.to_string())
                }
                None => (context.unwrap_or_default(), question.unwrap_or_default()),
            };
            ask(&db_path, &overrides, &context, &question).await
        }
        Command::Models => {
            print_models();
            Ok(())
        }
        Command::Login { token } => handle_login(&db_path, token),
        Command::Logout => {
            auth::logout(&db_path, PROVIDER)?;
            println!("✓ Logged out from Hugging Face.");
            Ok(())
        }
        Command::Config { action } => handle_config(&db_path, action),
    }
}

/// Use the given path, or `~/.qa-compare/qa-compare.db` (creating the directory).
fn resolve_db_path(db: Option<&str>) -> anyhow::Result<String> {
    if let Some(db) = db {
        return Ok(db.to_string());
    }
    let path: PathBuf = default_db_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path.to_string_lossy().into_owned())
}

/// Resolve settings and credentials, then wire a comparator over the hosted API.
fn build_comparator(
    db_path: &str,
    overrides: &Overrides,
) -> anyhow::Result<(Comparator, Settings, &'static str)> {
    let config = Config::open(db_path)?;
    let settings = Settings::resolve(&config, overrides)?;

    let storage = AuthStorage::open(db_path)?;
    let (token, source) = storage.get_token(PROVIDER, TOKEN_ENV)?;

    let reader = HfReader::new(HfConfig {
        inference_url: settings.inference_url.clone(),
        hub_url: settings.hub_url.clone(),
        token,
        timeout: settings.timeout,
    })?;

    let comparator = Comparator::new(
        ModelRegistry::builtin(),
        Box::new(reader),
        CompareConfig {
            model_timeout: settings.timeout,
        },
    );
    Ok((comparator, settings, source.describe()))
}

async fn serve(
    db_path: &str,
    overrides: &Overrides,
    open_browser: bool,
    no_load: bool,
) -> anyhow::Result<()> {
    let (mut comparator, settings, auth_status) = build_comparator(db_path, overrides)?;

    if !no_load {
        let report = comparator.load().await;
        if report.ready == 0 {
            tracing::warn!("no model could be loaded; every answer will be an error");
        }
    }

    let url = format!("http://{}", settings.bind);
    let db_label = if db_path == ":memory:" { "ephemeral" } else { db_path };
    print_banner(
        &BannerInfo {
            url: &url,
            inference_url: &settings.inference_url,
            auth_status,
            db: db_label,
        },
        &comparator,
    );

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    if open_browser {
        // Headless machines have no browser; the URL is in the banner anyway.
        let _ = open::that(&url);
    }

    let state = Arc::new(AppState::new(comparator));
    web::serve(state, listener, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    println!("goodbye.");
    Ok(())
}

async fn ask(db_path: &str, overrides: &Overrides, context: &str, question: &str) -> anyhow::Result<()> {
    let (comparator, _, _) = build_comparator(db_path, overrides)?;

    let spinner = Spinner::start("asking");
    let comparison = comparator
        .compare_with(context, question, |model| {
            spinner.set_message(&format!("asking {}", model.label));
        })
        .await;
    spinner.stop().await;

    println!("question: {question}");
    print!("{}", format_comparison(&comparison));
    Ok(())
}

fn print_models() {
    let registry = ModelRegistry::builtin();
    println!(
        "{:<10}  {:>10}  {:>8}  {:>11}  repo",
        "model", "parameters", "F1", "exact match"
    );
    for m in &registry {
        println!(
            "{:<10}  {:>10}  {:>8}  {:>11}  {}",
            m.label, m.params, m.f1, m.exact_match, m.repo_id
        );
    }
}

fn handle_login(db_path: &str, token: Option<String>) -> anyhow::Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            print!("Paste your Hugging Face access token: ");
            io::stdout().flush()?;
            let mut token = String::new();
            io::stdin().read_line(&mut token)?;
            token
        }
    };

    if token.trim().is_empty() {
        bail!("no token provided");
    }

    auth::login(db_path, PROVIDER, &token)?;
    println!("✓ Token saved.");
    Ok(())
}

fn handle_config(db_path: &str, action: ConfigAction) -> anyhow::Result<()> {
    let config = Config::open(db_path)?;
    match action {
        ConfigAction::Get { key } => match config.get(&key)? {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            println!("✓ {key} = {value}");
        }
        ConfigAction::Unset { key } => {
            config.remove(&key)?;
            println!("✓ {key} reset to default");
        }
    }
    Ok(())
}
