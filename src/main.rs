//! CLI entry point for paperdex.
//!
//! Provides commands for building an index from extracted paper records and
//! querying it in natural language.

use anyhow::{Context, Result};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use paperdex::display::{THEME, create_help_text, create_info_table, create_search_table};
use paperdex::io::ExitCode;
use paperdex::{
    EmbeddingGenerator, FastEmbedGenerator, IndexError, IndexPersistence, Indexer, SearchEngine,
    Settings, format_result,
};
use std::path::PathBuf;
use std::sync::Arc;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic search over research papers
#[derive(Parser)]
#[command(
    name = "paperdex",
    version = env!("CARGO_PKG_VERSION"),
    about = "Semantic search over research papers",
    long_about = "Index extracted research-paper records and query them in natural language.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = create_help_text()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    #[command(about = "Set up .paperdex directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    #[command(about = "Display active settings")]
    Config,

    #[command(
        about = "Build the search index from a records file",
        after_help = "The file must be a JSON object with a 'top_papers' list.\nInvalid entries are reported and skipped."
    )]
    Index {
        /// JSON file with the paper records
        path: PathBuf,

        /// Directory to write the index to (overrides index_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show a spinner while embedding
        #[arg(short, long)]
        progress: bool,
    },

    #[command(
        about = "Find the papers most similar to a question",
        after_help = "Examples:\n  paperdex search \"What papers discuss LLM evaluation?\"\n  paperdex search \"fact-checking systems\" --limit 5 --json"
    )]
    Search {
        /// Natural-language query
        query: String,

        /// Number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Index directory (overrides index_path)
        #[arg(short, long)]
        index: Option<PathBuf>,
    },

    #[command(about = "Show what an index contains and how it was built")]
    Info {
        /// Index directory (overrides index_path)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command prints machine-readable output.
    fn wants_json(&self) -> bool {
        matches!(
            self,
            Commands::Search { json: true, .. } | Commands::Info { json: true, .. }
        )
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json = cli.command.wants_json();

    match run(cli) {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            let code = match error.downcast_ref::<IndexError>() {
                Some(index_error) if json => {
                    println!("{:#}", index_error.to_json());
                    ExitCode::from_error(index_error)
                }
                Some(index_error) => {
                    eprintln!(
                        "{}",
                        THEME.error_with_icon(&format!(
                            "[{}] {error:#}",
                            index_error.status_code()
                        ))
                    );
                    for suggestion in index_error.recovery_suggestions() {
                        eprintln!("  {}", THEME.apply(&THEME.dim, suggestion));
                    }
                    ExitCode::from_error(index_error)
                }
                None => {
                    eprintln!("{}", THEME.error_with_icon(&format!("{error:#}")));
                    ExitCode::GeneralError
                }
            };
            tracing::debug!("exiting with {} ({})", i32::from(code), code.description());
            code.into()
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Settings::load()?,
    };
    paperdex::logging::init(&settings);

    match cli.command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(force)?;
            let verb = if force { "Wrote" } else { "Created" };
            println!(
                "{}",
                THEME.success_with_icon(&format!("{verb} configuration at {}", path.display()))
            );
            println!("Edit this file to choose the embedding model and index location.");
        }

        Commands::Config => {
            println!("{}", THEME.heading("Current Configuration"));
            let toml_str =
                toml::to_string_pretty(&settings).context("Failed to display configuration")?;
            println!("{toml_str}");
        }

        Commands::Index {
            path,
            output,
            progress,
        } => {
            let dir = output.unwrap_or_else(|| settings.resolved_index_path());
            let embedder = load_embedder(&settings)?;

            let mut indexer = Indexer::new(embedder).with_progress(progress);
            let report = indexer.index_file(&path, &dir)?;

            for failure in &report.failures {
                let title = failure.title.as_deref().unwrap_or("<untitled>");
                eprintln!(
                    "{}",
                    THEME.warning_with_icon(&format!(
                        "Skipped entry {} ({title}): {}",
                        failure.position, failure.reason
                    ))
                );
            }
            if report.stats.documents == 0 {
                eprintln!(
                    "{}",
                    THEME.warning_with_icon("No papers were indexed; searches will fail until you index a non-empty file")
                );
            }

            println!(
                "{}",
                THEME.success_with_icon(&format!(
                    "Indexed {} papers (dimension {}) in {:.2}s",
                    report.stats.documents,
                    report.stats.dimension,
                    report.stats.duration.as_secs_f64()
                ))
            );
            println!("Index written to {}", THEME.apply(&THEME.path, dir.display()));
        }

        Commands::Search {
            query,
            limit,
            json,
            index,
        } => {
            let dir = index.unwrap_or_else(|| settings.resolved_index_path());
            let top_k = limit.unwrap_or(settings.search.default_limit);

            let embedder = load_embedder(&settings)?;
            let engine = SearchEngine::load(&dir, embedder)?;
            let results = engine.search(&query, top_k)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            println!("{}", THEME.heading("Search Process"));
            println!("Query: '{query}'");
            println!("Using model: {}", engine.model_name());
            println!("Vector similarity metric: L2 distance (converted to similarity score)");
            println!();
            println!("{}", create_search_table(&results));
            println!();
            println!("{}", THEME.heading("Detailed Results"));
            for (rank, result) in results.iter().enumerate() {
                println!();
                println!("Result #{}", rank + 1);
                println!("{}", "=".repeat(80));
                println!("{}", format_result(result));
            }
        }

        Commands::Info { index, json } => {
            let dir = index.unwrap_or_else(|| settings.resolved_index_path());
            let info = IndexPersistence::new(&dir).info()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", create_info_table(&info));
                if info.model.as_deref().is_some_and(|m| m != settings.embedding.model) {
                    eprintln!(
                        "{}",
                        THEME.warning_with_icon(&format!(
                            "Configured model {} differs from the model that built this index",
                            settings.embedding.model
                        ))
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingGenerator>> {
    let options = settings.embedding_options();
    let embedder = FastEmbedGenerator::new(&options).map_err(IndexError::from)?;
    tracing::debug!(
        "embedding model {} ready (dimension {})",
        embedder.model_name(),
        embedder.dimension()
    );
    Ok(Arc::new(embedder))
}
