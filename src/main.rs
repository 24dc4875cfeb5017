use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tubeinsight::analysis::{AnalysisClient, GeminiClient, Language, SummaryLength};
use tubeinsight::config::{self, TubeConfig};
use tubeinsight::db::Database;
use tubeinsight::history::{HistoryStore, NewHistoryEntry};
use tubeinsight::output::{json as json_out, table};

#[derive(Parser)]
#[command(name = "tubeinsight", version, about = "AI-powered YouTube video analysis with search grounding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to database file (default: ~/.tubeinsight/tubeinsight.db)
    #[arg(long, global = true, env = "TUBEINSIGHT_DB")]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a YouTube video
    Analyze {
        /// Video URL (watch, youtu.be, embed, /v/, or shorts link)
        url: String,

        /// Summary length: short, medium, long
        #[arg(long, default_value = "medium")]
        length: String,

        /// Analysis language: en, ko
        #[arg(long, default_value = "en")]
        language: String,

        /// Gemini API key (overrides env var and config file)
        #[arg(long)]
        api_key: Option<String>,

        /// Model override (default: gemini-3-flash-preview)
        #[arg(long)]
        model: Option<String>,

        /// Do not record this analysis in history
        #[arg(long)]
        no_save: bool,
    },

    /// Re-run a saved analysis with its stored parameters
    Replay {
        /// History entry ID (see `tubeinsight history`)
        id: String,

        /// Gemini API key (overrides env var and config file)
        #[arg(long)]
        api_key: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,
    },

    /// List or edit saved analyses
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List saved analyses (the default)
    List,

    /// Remove one entry
    Remove {
        /// History entry ID
        id: String,
    },

    /// Remove all entries
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create ~/.tubeinsight/config.toml with a commented template
    Init,

    /// Show current configuration (secrets redacted)
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    let db_path = cli
        .db
        .unwrap_or_else(|| Database::default_db_path().expect("Could not determine default DB path"));

    let db = Database::open(&db_path)?;
    let store = HistoryStore::new(Box::new(db));

    match cli.command {
        Commands::Analyze {
            url,
            length,
            language,
            api_key,
            model,
            no_save,
        } => {
            let length = SummaryLength::from_str(&length)
                .with_context(|| format!("Unknown length: {length}. Use: short, medium, long"))?;
            let language = Language::from_str(&language)
                .with_context(|| format!("Unknown language: {language}. Use: en, ko"))?;

            let client = build_client(api_key.as_deref(), model)?;
            run_analysis(&client, &store, &url, length, language, !no_save, json_output)?;
        }

        Commands::Replay { id, api_key, model } => {
            let entry = store
                .find(&id)
                .with_context(|| format!("History entry not found: {id}"))?;

            eprintln!(
                "Replaying \"{}\" ({}, {})",
                entry.title,
                entry.length.as_str(),
                entry.language.as_str()
            );

            let client = build_client(api_key.as_deref(), model)?;
            run_analysis(
                &client,
                &store,
                &entry.url,
                entry.length,
                entry.language,
                true,
                json_output,
            )?;
        }

        Commands::History { command } => match command.unwrap_or(HistoryCommands::List) {
            HistoryCommands::List => {
                let entries = store.list();
                if json_output {
                    json_out::print_json(&entries)?;
                } else {
                    table::print_history(&entries);
                }
            }

            HistoryCommands::Remove { id } => {
                let found = store.find(&id).is_some();
                let entries = store.remove(&id)?;
                if found {
                    println!("Removed: {id} ({} left)", entries.len());
                } else {
                    println!("No entry with id: {id}");
                }
            }

            HistoryCommands::Clear { force } => {
                if !force {
                    eprint!("Clear all saved analyses? [y/N] ");
                    let mut answer = String::new();
                    std::io::stdin().read_line(&mut answer)?;
                    if !answer.trim().eq_ignore_ascii_case("y") {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
                store.clear()?;
                println!("History cleared.");
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Init => {
                let created = config::init_config()?;
                let path = config::config_path()?;
                if created {
                    println!("Created {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }

            ConfigCommands::Show => {
                let config = TubeConfig::load()?;
                println!("{}", config.display_redacted());
                println!("\nPath: {}", config::config_path()?.display());
            }
        },
    }

    Ok(())
}

/// Build the analysis client from the credential chain and config overrides.
fn build_client(api_key_flag: Option<&str>, model_flag: Option<String>) -> Result<AnalysisClient> {
    let config = TubeConfig::load()?;
    let gemini_config = config.gemini();

    let key = config::resolve_credential(api_key_flag, config::GEMINI_API_KEY_ENV, gemini_config)?;
    let model = model_flag.or_else(|| gemini_config.and_then(|c| c.model.clone()));
    let base_url = gemini_config.and_then(|c| c.base_url.clone());

    Ok(AnalysisClient::new(GeminiClient::new(key, model, base_url)))
}

/// Analyze one video, record it, render the report. Failures map onto two
/// user-facing messages: one for "the video couldn't be analyzed", one for
/// "we couldn't talk to the API".
fn run_analysis(
    client: &AnalysisClient,
    store: &HistoryStore,
    url: &str,
    length: SummaryLength,
    language: Language,
    save: bool,
    json_output: bool,
) -> Result<()> {
    eprintln!("Analyzing {} with {} ...", url, client.model());

    match client.analyze(url, length, language) {
        Ok(analysis) => {
            if save {
                if let Err(e) = store.add(NewHistoryEntry {
                    url: url.to_string(),
                    length,
                    language,
                    title: analysis.data.video_title.clone(),
                    channel_name: analysis.data.channel_name.clone(),
                }) {
                    eprintln!("Warning: could not save to history: {e}");
                }
            }

            if json_output {
                json_out::print_json(&analysis)?;
            } else {
                table::print_analysis(&analysis);
            }
            Ok(())
        }

        Err(e) => {
            let (kind, message) = if e.is_analysis_failure() {
                (
                    "analysis",
                    "Could not analyze this video. Check that the URL points to a real video and try again.",
                )
            } else {
                ("api", "Error communicating with the Gemini API.")
            };

            if json_output {
                json_out::print_json(&json_out::error_value(kind, message, &e.to_string()))?;
            }

            Err(anyhow::Error::new(e).context(message))
        }
    }
}
