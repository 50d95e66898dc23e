#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, InfoStrategy, InitStrategy, PersonasStrategy, RunInput, RunStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "podcaster")]
#[command(about = "Live AI podcast: a host, two guests and you", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a podcast session
    Run {
        /// Persona set to use
        #[arg(short = 'p', long)]
        persona_set: Option<String>,

        /// Discussion topic (prompted for when omitted)
        #[arg(short = 't', long)]
        topic: Option<String>,

        /// Use canned offline responses instead of a model
        #[arg(long)]
        simulated: bool,
    },
    /// List available persona sets
    Personas,
    /// Show the personas of one set
    Info {
        /// Persona set id
        set_id: String,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            persona_set,
            topic,
            simulated,
        } => {
            RunStrategy
                .execute(RunInput {
                    persona_set,
                    topic,
                    simulated,
                })
                .await
        }
        Commands::Personas => PersonasStrategy.execute(()).await,
        Commands::Info { set_id } => InfoStrategy.execute(set_id).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
