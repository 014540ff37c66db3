//! Schemascout CLI - schema-aware semantic retrieval for NL-to-SQL pipelines

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use schemascout::config::{self, ScoutConfig};
use schemascout::engine::{SchemaEngine, SchemaSummary};
use schemascout::graph::RelationshipGraph;
use schemascout::query::intent;
use schemascout::query::retriever::grounding_context;
use schemascout::store::SqliteIndex;
use schemascout::ui::{self, Icons};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "schemascout")]
#[command(version = "0.1.0")]
#[command(about = "Schema-aware semantic retrieval engine for natural-language SQL assistants")]
#[command(long_about = r#"
Schemascout indexes the schema of a relational database as embedded
natural-language descriptions, enabling:
  • "Which tables is this question about?" relevance search
  • Join suggestions from foreign-key metadata
  • Query intent classification (lookup vs. analysis)

Example usage:
  schemascout sync --database college.db
  schemascout search --query "students with the highest GPA"
  schemascout joins --tables students,departments
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a schemascout.toml config and prepare the index directory
    Init {
        /// Path to the source database
        #[arg(short, long, default_value = "app.db")]
        database: PathBuf,

        /// Path to the vector index file
        #[arg(short, long, default_value = ".schemascout/index.db")]
        index: PathBuf,

        /// Default number of tables returned by search
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Synchronize the vector index with the live schema
    Sync {
        /// Path to the source database
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the vector index file
        #[arg(short, long)]
        index: Option<PathBuf>,
    },

    /// Find the tables most relevant to a question
    Search {
        /// The natural-language question
        #[arg(short, long)]
        query: String,

        /// Path to the source database
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the vector index file
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the grounding context block for an LLM prompt
        #[arg(short, long)]
        context: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Classify the intent of a question
    Classify {
        /// The natural-language question
        #[arg(short, long)]
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Suggest JOIN clauses for a set of tables
    Joins {
        /// Table names (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tables: Vec<String>,

        /// Path to the vector index file
        #[arg(short, long)]
        index: Option<PathBuf>,
    },

    /// Show statistics about the indexed schema
    Stats {
        /// Path to the vector index file
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
}

/// Resolve database/index paths: CLI argument, then config file, then default
fn resolve_paths(
    database: Option<PathBuf>,
    index: Option<PathBuf>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let cfg = config::load_config(None)?.unwrap_or_default();

    let database = database
        .or_else(|| cfg.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("app.db"));
    let index = index
        .or_else(|| cfg.index.as_ref().map(PathBuf::from))
        .unwrap_or_else(config::default_index_path);

    Ok((database, index))
}

fn resolve_top_k(limit: Option<usize>) -> anyhow::Result<usize> {
    let cfg = config::load_config(None)?.unwrap_or_default();
    Ok(limit.or(cfg.top_k).unwrap_or(3))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Init {
            database,
            index,
            top_k,
            force,
        } => {
            let cfg = ScoutConfig {
                database: Some(database.display().to_string()),
                index: Some(index.display().to_string()),
                top_k: Some(top_k),
            };

            config::write_config(&config::default_config_path(), &cfg, force)?;
            config::ensure_index_dir(&index)?;
            config::ensure_gitignore(Path::new("."))?;

            ui::success(&format!(
                "Config written to {}",
                config::default_config_path().display()
            ));
            ui::info("Database", &database.display().to_string());
            ui::info("Index", &index.display().to_string());
        }

        Commands::Sync { database, index } => {
            let (database, index_path) = resolve_paths(database, index)?;
            config::ensure_index_dir(&index_path)?;

            ui::status(Icons::DATABASE, "Database", &database.display().to_string());
            ui::status(Icons::BRAIN, "Index", &index_path.display().to_string());

            let spinner = ui::Spinner::new("Loading embedding model...");
            let engine = SchemaEngine::open(&database, &index_path)?;
            spinner.set_message("Embedding table descriptions...");
            let report = engine.synchronize()?;
            spinner.finish_with_message(&report.to_string());

            if report.is_complete() {
                ui::success(&format!("Index synchronized ({} tables)", report.indexed));
            } else {
                for failure in &report.failures {
                    ui::warn(&format!("{}: {}", failure.table, failure.reason));
                }
                ui::warn(&format!(
                    "Partial synchronization: {} indexed, {} failed",
                    report.indexed,
                    report.failures.len()
                ));
            }
        }

        Commands::Search {
            query,
            database,
            index,
            limit,
            context,
            format,
        } => {
            let (database, index_path) = resolve_paths(database, index)?;
            let k = resolve_top_k(limit)?;

            let spinner = ui::Spinner::new("Loading embedding model...");
            let engine = SchemaEngine::open(&database, &index_path)?;
            spinner.finish_with_message("Model ready");

            println!("{} Searching for: '{}' (limit: {})", Icons::SEARCH, query, k);
            let outcome = engine.search(&query, k);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            if let Some(reason) = &outcome.failure {
                ui::warn(&format!("Search degraded: {}", reason));
            }

            if outcome.results.is_empty() {
                println!("∅ No relevant tables found.");
            } else {
                println!("{}", ui::results_table(&outcome.results));
                if context {
                    ui::section("Grounding context");
                    println!("{}", grounding_context(&outcome.results));
                }
            }
        }

        Commands::Classify { query, format } => {
            let report = intent::classify(&query);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            ui::info("Query type", report.query_type.as_str());
            ui::info(
                "Needs summary",
                if report.needs_summary { "yes" } else { "no" },
            );
            ui::info("Confidence", &format!("{:.2}", report.confidence));
        }

        Commands::Joins { tables, index } => {
            if tables.len() < 2 {
                anyhow::bail!("need at least two tables to suggest joins");
            }

            let (_, index_path) = resolve_paths(None, index)?;
            let store = SqliteIndex::open(&index_path)?;
            let graph = RelationshipGraph::from_entries(&store.get_all()?);

            let joins = graph.suggest_joins(&tables);
            if joins.is_empty() {
                println!("∅ No foreign-key relationships between those tables.");
            } else {
                for join in joins {
                    println!("{} {}", Icons::LINK, join);
                }
            }
        }

        Commands::Stats { index } => {
            let (_, index_path) = resolve_paths(None, index)?;
            let store = SqliteIndex::open(&index_path)?;
            let summary = SchemaSummary::from_entries(&store.get_all()?);

            println!("{} Schemascout Statistics ({})", Icons::STATS, index_path.display());

            let mut table = ui::TableBuilder::new();
            table.add_row("Tables", &summary.total_tables.to_string());
            table.add_row("Columns", &summary.total_columns.to_string());
            table.add_row("Records", &summary.total_records.to_string());
            table.add_row(
                "Tables with relationships",
                &summary.tables_with_relationships.to_string(),
            );
            println!("{}", table.build());

            if !summary.tables.is_empty() {
                println!("  {}", summary.tables.join(", "));
            }
        }
    }

    Ok(())
}
