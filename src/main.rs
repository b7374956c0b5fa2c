use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crm::cli::{handle_audit_command, handle_export_command, handle_record_command, RecordCommands};
use crm::config::{CrmPaths, Settings};
use crm::storage::{Storage, RECORDS_KEY};

/// Environment variable holding the log filter (e.g. `crm=debug`)
const LOG_ENV: &str = "CRM_LOG";

#[derive(Parser)]
#[command(
    name = "crm",
    version,
    about = "Offline contact record manager",
    long_about = "Keeps a local list of contact records and exports them as CSV. \
                  Records are stored on this machine only."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Record(RecordCommands),

    /// Export all records to crm-records-<date>.csv
    Export {
        /// Directory to write the file into
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = CrmPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut storage = Storage::open(&paths, &settings)?;

    match cli.command {
        Some(Commands::Record(cmd)) => handle_record_command(&mut storage, cmd)?,
        Some(Commands::Export { output }) => {
            handle_export_command(&mut storage, &settings, output)?;
        }
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Config) => {
            println!("crm-cli Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Records key:    {}", RECORDS_KEY);
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Timestamp format: {}", settings.timestamp_format);
            match &settings.export_dir {
                Some(dir) => println!("  Export directory: {}", dir.display()),
                None => println!("  Export directory: (current directory)"),
            }
            println!("  Audit enabled:    {}", settings.audit_enabled);
            println!();
            println!("Records: {}", storage.records.len());
        }
        None => {
            println!("crm - offline contact record manager");
            println!();
            println!("Run 'crm --help' for usage information.");
        }
    }

    Ok(())
}
