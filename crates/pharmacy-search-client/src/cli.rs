//! `pharmacy-search` command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pharmacy_search_core::export::ExportArtifact;
use pharmacy_search_core::history::SearchHistoryStore;
use pharmacy_search_core::models::{CriteriaField, CriteriaModel};
use pharmacy_search_core::search::{
    QuickSearch, ResultSynthesizer, SearchController, SearchExecutor, SearchOutcome,
    QUICK_SEARCHES,
};
use tracing_subscriber::EnvFilter;

use crate::config::{self, ClientConfig};
use crate::http::HttpRecordApi;
use crate::presenter::{terminal_marker, TerminalPresenter};

/// Number of history entries listed by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "pharmacy-search")]
#[command(version)]
#[command(about = "Search patient records across pharmacy stores", long_about = None)]
pub struct Cli {
    /// Record API base URL (overrides PHARMACY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// History database file (overrides PHARMACY_SEARCH_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search by any combination of fields
    Search {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Write results as CSV into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// List recent searches
    History {
        /// Number of entries to show
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// Run a past search again by its history id
    Replay {
        id: i64,

        /// Write results as CSV into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// Run a built-in quick search by label
    Quick {
        preset: String,

        /// Write results as CSV into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// List the built-in quick searches
    Presets,
}

/// Search fields accepted on the command line.
#[derive(Args, Debug, Default)]
pub struct CriteriaArgs {
    #[arg(long)]
    pub store_id: Option<String>,
    #[arg(long)]
    pub province: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub health_number: Option<String>,
}

impl CriteriaArgs {
    /// Fill a search form with the given flags, leaving the rest empty.
    pub fn fill(&self, model: &mut CriteriaModel) {
        model.clear();
        let values = [
            (CriteriaField::StoreId, &self.store_id),
            (CriteriaField::Province, &self.province),
            (CriteriaField::FirstName, &self.first_name),
            (CriteriaField::LastName, &self.last_name),
            (CriteriaField::HealthNumber, &self.health_number),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                model.set(field, value.as_str());
            }
        }
    }
}

type Controller = SearchController<TerminalPresenter<std::io::Stdout>>;

pub fn run() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Search { criteria, export } => {
            let mut controller = build_controller(&config)?;
            criteria.fill(controller.model_mut());
            let outcome = controller.submit();
            finish(&mut controller, outcome, export.as_deref())
        }
        Commands::History { limit, clear } => {
            let mut history = SearchHistoryStore::open_sqlite(config.history_db());
            if clear {
                history.clear();
                println!("Search history cleared");
            } else {
                TerminalPresenter::stdout().show_history(history.recent(limit));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Replay { id, export } => {
            let mut controller = build_controller(&config)?;
            match controller.replay(id) {
                Some(outcome) => finish(&mut controller, outcome, export.as_deref()),
                None => {
                    eprintln!("No recent search with id {id}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Quick { preset, export } => {
            let Some(preset) = QuickSearch::find(&preset) else {
                eprintln!("Unknown quick search '{preset}'. Run `pharmacy-search presets`.");
                return Ok(ExitCode::FAILURE);
            };
            let mut controller = build_controller(&config)?;
            let outcome = controller.quick_search(preset);
            finish(&mut controller, outcome, export.as_deref())
        }
        Commands::Presets => {
            TerminalPresenter::stdout().show_presets(QUICK_SEARCHES);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url.as_str())?;
    }
    if let Some(db) = &cli.db {
        config = config.with_history_db(db.clone());
    }
    Ok(config)
}

fn build_controller(config: &ClientConfig) -> Result<Controller> {
    let api = HttpRecordApi::from_config(config)?;
    tracing::debug!(url = %api.search_url(), "Using record API");

    Ok(SearchController::new(
        SearchExecutor::new(Arc::new(api)),
        SearchHistoryStore::open_sqlite(config.history_db()),
        TerminalPresenter::stdout(),
    )
    .with_synthesizer(ResultSynthesizer::with_marker(terminal_marker())))
}

fn finish(
    controller: &mut Controller,
    outcome: SearchOutcome,
    export: Option<&Path>,
) -> Result<ExitCode> {
    if !matches!(outcome, SearchOutcome::Succeeded(_)) {
        return Ok(ExitCode::FAILURE);
    }

    if let Some(dir) = export {
        let today = chrono::Local::now().date_naive();
        match controller.export(today) {
            Some(artifact) => {
                let path = write_export(dir, &artifact)?;
                let rows = controller.session().results().map_or(0, |r| r.len());
                controller.presenter_mut().show_export(&path, rows);
            }
            None => println!("No results to export"),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Save an export into `dir`, creating the directory if needed.
fn write_export(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
