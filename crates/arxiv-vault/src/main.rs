//! arXiv Vault - Entry Point
//!
//! Command-line front end over a plain Markdown vault directory.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_vault::{
    AssistantError, PaperAssistant,
    config::Config,
    formatters::{compact_search_paper, format_search_markdown},
    materializer::CollisionPolicy,
    vault::FsVault,
};

#[derive(Parser, Debug)]
#[command(name = "arxiv-vault")]
#[command(about = "Enrich a Markdown vault with arXiv metadata, citations and AI summaries")]
#[command(version)]
struct Cli {
    /// Vault directory
    #[arg(long, default_value = ".", env = "ARXIV_VAULT_DIR")]
    vault: PathBuf,

    /// Summarization service API key
    #[arg(long, env = "SUMMARY_API_KEY")]
    api_key: Option<String>,

    /// Summarization service base URL
    #[arg(long, env = "ARXIV_VAULT_SUMMARY_URL")]
    summary_url: Option<String>,

    /// Summary language
    #[arg(long, env = "ARXIV_VAULT_LANGUAGE")]
    language: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a paper and append the summary to a note
    Summarize {
        /// Note to append to
        #[arg(long)]
        note: String,

        /// arXiv abstract or PDF URL
        url: String,
    },

    /// Add metadata and influential citations to a note
    Enrich {
        /// Note to enrich
        #[arg(long)]
        note: String,

        /// arXiv URL or identifier
        input: String,

        /// Render influential papers as plain bullets instead of linked notes
        #[arg(long)]
        no_links: bool,

        /// List influential papers by citation count
        #[arg(long)]
        rank: bool,

        /// Rename the note after the paper title
        #[arg(long)]
        rename: bool,

        /// What to do when an influential note already exists
        #[arg(long, value_enum, default_value_t)]
        on_collision: CollisionPolicy,
    },

    /// Print paper metadata as JSON
    Info {
        /// arXiv URL or identifier
        input: String,
    },

    /// Search the citation registry
    Search {
        /// Free-text query
        query: String,

        /// Maximum results (1-100)
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Download a paper PDF
    Pdf {
        /// arXiv URL or identifier
        input: String,

        /// Target directory
        #[arg(long, env = "ARXIV_VAULT_PDF_DIR")]
        dir: Option<PathBuf>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;

    if cli.api_key.is_some() {
        config.summary_api_key.clone_from(&cli.api_key);
    }
    if let Some(url) = &cli.summary_url {
        config.summary_api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(language) = &cli.language {
        config.target_language.clone_from(language);
    }

    match &cli.command {
        Command::Enrich { no_links, rank, rename, on_collision, .. } => {
            config.materialize.link_influential = !no_links;
            config.materialize.rank_by_citations = *rank;
            config.materialize.rename_to_title = *rename;
            config.materialize.collision_policy = *on_collision;
        }
        Command::Pdf { dir: Some(dir), .. } => config.pdf_dir.clone_from(dir),
        _ => {}
    }

    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;
    let vault = Arc::new(FsVault::new(&cli.vault));
    let assistant = PaperAssistant::new(config, vault)?;

    match cli.command {
        Command::Summarize { note, url } => {
            let result = assistant.summarize(&note, &url).await?;
            println!("Summary appended to '{note}' ({:?})", result.origin);
        }
        Command::Enrich { note, input, .. } => {
            let report = assistant.enrich(&note, &input).await?;
            println!(
                "Enriched '{}': {} created, {} skipped, {} failed",
                report.note, report.created, report.skipped, report.failed
            );
        }
        Command::Info { input } => {
            let metadata = assistant.lookup(&input).await?;
            println!("{}", serde_json::to_string_pretty(&*metadata)?);
        }
        Command::Search { query, limit, json } => {
            let papers = assistant.search(&query, limit).await?;
            if json {
                let compact: Vec<_> = papers.iter().map(compact_search_paper).collect();
                println!("{}", serde_json::to_string_pretty(&compact)?);
            } else {
                println!("{}", format_search_markdown(&papers));
            }
        }
        Command::Pdf { input, .. } => {
            let path = assistant.download_pdf(&input).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), vault = %cli.vault.display(), "Starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .downcast_ref::<AssistantError>()
                .map_or_else(|| format!("{err:#}"), AssistantError::to_user_message);
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
