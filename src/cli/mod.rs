//! Command-line interface for revalidator.
//!
//! Feeds document snapshots or recorded lifecycle events through the
//! invalidator, against the configured backend or a dry-run recorder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::adapters::{
    CacheInvalidator, HttpRevalidator, LogInvalidator, RecordedCall, RecordingInvalidator,
};
use crate::config::{self, ResolvedConfig};
use crate::core::{resolve_path, PublishStateInvalidator};
use crate::domain::{parse_jsonl, PublishableDocument, RequestContext};

/// revalidator - publish-state driven cache revalidation
#[derive(Parser, Debug)]
#[command(name = "revalidator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the public path of a slug
    Path {
        /// Document slug
        slug: String,
    },

    /// Revalidate after a document was created or updated
    Change {
        /// Document after the change (JSON file)
        #[arg(short, long)]
        doc: PathBuf,

        /// Document before the change (omit for a create)
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Skip revalidation for this invocation
        #[arg(long)]
        disable_revalidate: bool,

        /// Print the invalidations instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Revalidate after a document was deleted
    Delete {
        /// Deleted document (JSON file)
        #[arg(short, long)]
        doc: Option<PathBuf>,

        /// Skip revalidation for this invocation
        #[arg(long)]
        disable_revalidate: bool,

        /// Print the invalidations instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Handle a JSONL file of lifecycle events in order
    Replay {
        /// Events file
        events: PathBuf,

        /// Print the invalidations instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Path { slug } => {
                println!("{}", resolve_path(&slug));
                Ok(())
            }
            Commands::Change {
                doc,
                previous,
                disable_revalidate,
                dry_run,
            } => {
                let doc = read_document(&doc)?;
                let previous = previous.as_deref().map(read_document).transpose()?;
                let ctx = RequestContext { disable_revalidate };

                run_with_backend(dry_run, |invalidator, sink| {
                    invalidator.after_change(previous.as_ref(), doc, &ctx, sink);
                    Ok(())
                })
                .await
            }
            Commands::Delete {
                doc,
                disable_revalidate,
                dry_run,
            } => {
                let doc = doc.as_deref().map(read_document).transpose()?;
                let ctx = RequestContext { disable_revalidate };

                run_with_backend(dry_run, |invalidator, sink| {
                    invalidator.after_delete(doc, &ctx, sink);
                    Ok(())
                })
                .await
            }
            Commands::Replay { events, dry_run } => {
                let content = std::fs::read_to_string(&events)
                    .with_context(|| format!("Failed to read events: {}", events.display()))?;
                let events = parse_jsonl(&content)?;

                run_with_backend(dry_run, |invalidator, sink| {
                    let total = events.len();
                    for event in events {
                        debug!(hook = event.hook_name(), "handling event");
                        invalidator.handle(event, sink);
                    }
                    println!("Handled {} events", total);
                    Ok(())
                })
                .await
            }
            Commands::Config => show_config(),
        }
    }
}

fn read_document(path: &Path) -> Result<PublishableDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document: {}", path.display()))
}

/// Invalidation backend picked for one CLI invocation
enum Backend {
    /// Record and print, send nothing
    DryRun(Arc<RecordingInvalidator>),
    Http(Arc<HttpRevalidator>),
    Log,
}

impl Backend {
    /// Dry run wins, then the configured endpoint, else log only
    fn select(dry_run: bool, config: &ResolvedConfig) -> Result<Self> {
        if dry_run {
            return Ok(Backend::DryRun(Arc::new(RecordingInvalidator::new())));
        }

        match config.endpoint {
            Some(ref endpoint) => {
                let http =
                    HttpRevalidator::new(endpoint.clone(), config.secret.clone(), config.timeout)?;
                Ok(Backend::Http(Arc::new(http)))
            }
            None => Ok(Backend::Log),
        }
    }

    fn sink(&self) -> Arc<dyn CacheInvalidator> {
        match self {
            Backend::DryRun(recorder) => recorder.clone(),
            Backend::Http(http) => http.clone(),
            Backend::Log => Arc::new(LogInvalidator),
        }
    }

    /// Wait for in-flight requests, or print what a dry run recorded
    async fn finish(self) {
        match self {
            Backend::DryRun(recorder) => {
                for line in dry_run_lines(&recorder.recorded()) {
                    println!("{}", line);
                }
            }
            Backend::Http(http) => http.flush().await,
            Backend::Log => {}
        }
    }
}

fn dry_run_lines(recorded: &[RecordedCall]) -> Vec<String> {
    if recorded.is_empty() {
        return vec!["Nothing to invalidate".to_string()];
    }

    recorded
        .iter()
        .map(|r| format!("{}  {}", r.at.to_rfc3339_opts(SecondsFormat::Millis, true), r.call))
        .collect()
}

/// Configuration for a run. A dry run only needs tags, so it survives a broken config.
fn config_for(dry_run: bool, loaded: Result<&ResolvedConfig>) -> Result<ResolvedConfig> {
    match loaded {
        Ok(config) => Ok(config.clone()),
        Err(e) if dry_run => {
            warn!(error = %e, "Config unavailable, dry run uses default tags");
            Ok(ResolvedConfig::default())
        }
        Err(e) => Err(e),
    }
}

async fn run_with_backend<F>(dry_run: bool, f: F) -> Result<()>
where
    F: FnOnce(&PublishStateInvalidator, &Arc<dyn CacheInvalidator>) -> Result<()>,
{
    let config = config_for(dry_run, config::config())?;
    let invalidator = PublishStateInvalidator::new(config.tags.clone());

    let backend = Backend::select(dry_run, &config)?;
    let sink = backend.sink();
    debug!(backend = sink.name(), "dispatching invalidations");

    let result = f(&invalidator, &sink);
    backend.finish().await;
    result
}

fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("Config file: {}", match config.config_file {
        Some(ref p) => p.display().to_string(),
        None => "(none)".to_string(),
    });
    println!("Endpoint:    {}", config.endpoint.as_deref().unwrap_or("(none, log only)"));
    println!("Secret:      {}", if config.secret.is_some() { "set" } else { "(none)" });
    println!("Timeout:     {}s", config.timeout.as_secs());
    println!("Tags:");
    println!("  published:   {}", config.tags.published);
    println!("  unpublished: {}", config.tags.unpublished);
    println!("  deleted:     {}", config.tags.deleted);

    Ok(())
}
