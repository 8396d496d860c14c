use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warwalk::config::Config;
use warwalk::types::{Coordinate, EncryptionClass, Viewport};

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Ingest and query war-walking survey logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./warwalk.toml, then the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding NewData/, OldData/ and Database/
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directories and the database schema
    Init {
        /// Also write a warwalk.toml with the default settings
        #[arg(long)]
        write_config: bool,
    },

    /// Ingest every log file waiting in the pending directory
    Ingest {
        /// Output the batch report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List stored observations
    List {
        /// Encryption class to show
        #[arg(long, value_enum, default_value_t = ClassArg::All)]
        class: ClassArg,

        #[command(flatten)]
        view: ViewportArgs,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Count stored observations, in total and per encryption class
    Count {
        #[command(flatten)]
        view: ViewportArgs,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Run the strongest-signal deduplication pass now
    Dedupe,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    All,
    Open,
    Wep,
    Other,
}

impl ClassArg {
    fn encryption_class(self) -> Option<EncryptionClass> {
        match self {
            Self::All => None,
            Self::Open => Some(EncryptionClass::Open),
            Self::Wep => Some(EncryptionClass::Wep),
            Self::Other => Some(EncryptionClass::Other),
        }
    }
}

/// Optional map window given by two corners
#[derive(Args, Clone, Copy)]
struct ViewportArgs {
    /// Upper-left corner of the window
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true, requires = "lower_right")]
    upper_left: Option<Coordinate>,

    /// Lower-right corner of the window
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true, requires = "upper_left")]
    lower_right: Option<Coordinate>,
}

impl ViewportArgs {
    fn viewport(self) -> Option<Viewport> {
        match (self.upper_left, self.lower_right) {
            (Some(upper_left), Some(lower_right)) => Some(Viewport::new(upper_left, lower_right)),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { write_config } => {
            commands::init::execute(&config, write_config)?;
        }
        Commands::Ingest { json } => {
            commands::ingest::execute(&config, json)?;
        }
        Commands::List { class, view, json } => {
            commands::list::execute(&config, class.encryption_class(), view.viewport(), json)?;
        }
        Commands::Count { view, json } => {
            commands::count::execute(&config, view.viewport(), json)?;
        }
        Commands::Dedupe => {
            commands::dedupe::execute(&config)?;
        }
    }

    Ok(())
}
