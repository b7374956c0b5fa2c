//! Record CLI commands
//!
//! Implements add/list/show/delete/clear.

use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::display::{format_record_details, format_record_table};
use crate::error::{CrmError, CrmResult};
use crate::models::NewRecord;
use crate::services::RecordService;
use crate::storage::{KeyValueStore, Storage};

/// Question asked before removing every record
pub const CLEAR_CONFIRM_PROMPT: &str = "למחוק את כל הרשומות?";

/// Contact form fields
#[derive(Args, Debug, Clone, Default)]
pub struct RecordFields {
    /// Full name
    #[arg(short = 'n', long = "name", default_value = "")]
    pub full_name: String,
    /// Phone number
    #[arg(short, long, default_value = "")]
    pub phone: String,
    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,
    /// Company
    #[arg(short, long, default_value = "")]
    pub company: String,
    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl From<RecordFields> for NewRecord {
    fn from(fields: RecordFields) -> Self {
        Self {
            full_name: fields.full_name,
            phone: fields.phone,
            email: fields.email,
            company: fields.company,
            notes: fields.notes,
        }
    }
}

/// Record subcommands
#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Add a new record
    Add(RecordFields),
    /// List all records, newest first
    #[command(alias = "ls")]
    List,
    /// Show a single record
    Show {
        /// Record ID
        id: String,
    },
    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },
    /// Delete every record
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a record command
pub fn handle_record_command<S: KeyValueStore>(
    storage: &mut Storage<S>,
    cmd: RecordCommands,
) -> CrmResult<()> {
    let mut service = RecordService::new(storage);

    match cmd {
        RecordCommands::Add(fields) => {
            let record = service.add(fields.into())?;
            println!("Added record: {}", record);
            println!("  ID: {}", record.id);
        }

        RecordCommands::List => {
            println!("{}", format_record_table(service.list()));
        }

        RecordCommands::Show { id } => {
            print!("{}", format_record_details(service.get(&id)?));
        }

        RecordCommands::Delete { id } => match service.delete(&id)? {
            Some(record) => println!("Deleted record: {}", record),
            None => println!("No record with ID {}", id),
        },

        RecordCommands::Clear { force } => {
            if service.list().is_empty() {
                println!("No records to clear.");
                return Ok(());
            }

            if !force {
                let stdin = io::stdin();
                let confirmed = confirm(CLEAR_CONFIRM_PROMPT, &mut stdin.lock(), &mut io::stdout())?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = service.clear()?;
            println!("Deleted {} records.", removed);
        }
    }

    Ok(())
}

/// Ask a yes/no question; only `y` or `yes` confirms
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> CrmResult<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| CrmError::Io(format!("Failed to read confirmation: {}", e)))?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
