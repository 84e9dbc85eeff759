//! arXiv Vault
//!
//! Enriches a Markdown vault with data pulled from academic-paper registries:
//! bibliographic metadata from arXiv, an influential-paper citation graph from
//! Semantic Scholar, and AI summaries from a remote summarization service.
//!
//! # Features
//!
//! - **Summaries**: precheck → submit → poll job lifecycle with capped exponential backoff
//! - **Metadata**: read-through cache keyed by the normalized arXiv identifier
//! - **Citation graph**: influential citations/references materialized as linked notes
//! - **Degrades gracefully**: a citation registry outage never fails a metadata fetch
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arxiv_vault::{assistant::PaperAssistant, config::Config, vault::FsVault};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let vault = Arc::new(FsVault::new("./vault"));
//!     let assistant = PaperAssistant::new(config, vault)?;
//!
//!     let report = assistant.enrich("Reading list", "https://arxiv.org/pdf/1706.03762.pdf").await?;
//!     println!("created {} notes", report.created);
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod backoff;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod identifier;
pub mod materializer;
pub mod metadata;
pub mod models;
pub mod summarizer;
pub mod vault;

pub use assistant::PaperAssistant;
pub use config::Config;
pub use error::{AssistantError, ClientError, VaultError};
