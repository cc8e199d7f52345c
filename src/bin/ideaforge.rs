#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ideaforge::gateway::{ProviderGateway, TracingUsageSink};
use ideaforge::report::{
    render_analysis_markdown, render_dashboard_markdown, render_history_markdown,
    render_record_markdown,
};
use ideaforge::{
    build_dashboard, load_history, normalize_analysis, summarize, AppConfig, CurrentUser,
    ExportSink, FlavorMode, HttpExportSink, IdeaRecord, IdeaStore, NoopExportSink,
    SqliteIdeaStore, Submission, SubmissionFlow,
};

#[derive(Parser)]
#[command(name = "ideaforge", version, about = "Evaluate product ideas and analyze your history")]
struct Cli {
    /// SQLite store path
    #[arg(long, global = true, env = "IDEAFORGE_STORE")]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Md,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an idea and store it for the signed-in user
    Submit {
        /// Idea description
        idea: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Owner id; omit for an anonymous (unsaved) submission
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        user_email: Option<String>,
        #[arg(long)]
        user_name: Option<String>,
        #[arg(long, env = "IDEAFORGE_MODEL")]
        model: Option<String>,
        /// Print the normalized analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// List an owner's ideas, newest first
    History {
        #[arg(long)]
        user_id: String,
        #[arg(long, value_enum, default_value = "md")]
        format: Format,
    },
    /// Print every analytics view over an owner's ideas
    Dashboard {
        #[arg(long)]
        user_id: String,
        #[arg(long, value_enum, default_value = "md")]
        format: Format,
        #[arg(long)]
        rng_seed: Option<u64>,
        /// stable | churn
        #[arg(long)]
        flavor: Option<FlavorMode>,
    },
    /// Render one stored idea
    Show {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        id: String,
        #[arg(long, value_enum, default_value = "md")]
        format: Format,
    },
    /// Normalize a raw model payload from a file
    Normalize {
        #[arg(long)]
        input: PathBuf,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ideaforge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Owner history for the read-only views. A store that cannot be opened reads as empty.
async fn read_history(store_path: &Path, user_id: &str) -> Vec<IdeaRecord> {
    match SqliteIdeaStore::open(store_path) {
        Ok(store) => load_history(&store, user_id).await,
        Err(err) => {
            tracing::warn!(
                store = %store_path.display(),
                error = %err,
                "store unavailable; showing empty state"
            );
            Vec::new()
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Commands::Normalize { input } => {
            let raw = std::fs::read_to_string(&input)?;
            match normalize_analysis(&raw) {
                Ok(result) => print_json(&result)?,
                Err(err) => {
                    eprintln!("malformed analysis: {err}");
                    std::process::exit(2);
                }
            }
        }
        Commands::Submit {
            idea,
            name,
            email,
            phone,
            user_id,
            user_email,
            user_name,
            model,
            json,
        } => {
            let user = user_id.map(|id| {
                let mut user = CurrentUser::new(id);
                if let Some(email) = user_email {
                    user = user.with_email(email);
                }
                if let Some(name) = user_name {
                    user = user.with_display_name(name);
                }
                user
            });

            let gateway = ProviderGateway::from_env(Arc::new(TracingUsageSink))?;
            let store = SqliteIdeaStore::open(&config.store_path)?;
            let export: Arc<dyn ExportSink> = match &config.export_url {
                Some(url) => Arc::new(HttpExportSink::new(url.clone())?),
                None => Arc::new(NoopExportSink),
            };
            let flow = SubmissionFlow::new(
                Arc::new(gateway),
                Arc::new(store),
                export,
                model.unwrap_or(config.model),
            );

            let submission = Submission {
                name,
                email,
                phone,
                idea_text: idea.clone(),
            };
            match flow.submit(submission, user.as_ref()).await {
                Ok(outcome) => {
                    if json {
                        print_json(&outcome.analysis)?;
                    } else {
                        println!("{}", render_analysis_markdown(&idea, &outcome.analysis));
                    }
                    if let Some(id) = outcome.record_id {
                        eprintln!("saved as {id}");
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "submission failed");
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::History { user_id, format } => {
            let records = read_history(&config.store_path, &user_id).await;
            let summary = summarize(&records);
            match format {
                Format::Md => println!("{}", render_history_markdown(&records, &summary)),
                Format::Json => print_json(&serde_json::json!({
                    "summary": summary,
                    "records": records,
                }))?,
            }
        }
        Commands::Dashboard {
            user_id,
            format,
            rng_seed,
            flavor,
        } => {
            let records = read_history(&config.store_path, &user_id).await;
            let mut options = config.engine_options();
            if rng_seed.is_some() {
                options.rng_seed = rng_seed;
            }
            if let Some(flavor) = flavor {
                options.flavor = flavor;
            }
            let dashboard = build_dashboard(&records, &options);
            match format {
                Format::Md => println!("{}", render_dashboard_markdown(&dashboard)),
                Format::Json => print_json(&dashboard)?,
            }
        }
        Commands::Show {
            user_id,
            id,
            format,
        } => {
            let store = SqliteIdeaStore::open(&config.store_path)?;
            let Some(record) = store.get(&user_id, &id).await? else {
                return Err(format!("no idea {id} for user {user_id}").into());
            };
            match format {
                Format::Md => println!("{}", render_record_markdown(&record)),
                Format::Json => print_json(&record)?,
            }
        }
    }

    Ok(())
}
