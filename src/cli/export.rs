//! Export CLI commands
//!
//! Writes CSV and JSON exports to a file or stdout.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{RetainerError, RetainerResult};
use crate::export::{export_clients_csv, export_transactions_csv, FullExport};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export all transactions to CSV
    Transactions {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export all clients to CSV
    Clients {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the complete database to JSON
    Full {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(path: &PathBuf) -> RetainerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        RetainerError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> RetainerResult<()> {
    match cmd {
        ExportCommands::Transactions { output } => match output {
            Some(path) => {
                export_transactions_csv(storage, open_output(&path)?)?;
                println!("Exported transactions to {}", path.display());
            }
            None => export_transactions_csv(storage, std::io::stdout().lock())?,
        },

        ExportCommands::Clients { output } => match output {
            Some(path) => {
                export_clients_csv(storage, open_output(&path)?)?;
                println!("Exported clients to {}", path.display());
            }
            None => export_clients_csv(storage, std::io::stdout().lock())?,
        },

        ExportCommands::Full { output } => {
            let export = FullExport::from_storage(storage)?;
            match output {
                Some(path) => {
                    export.write(open_output(&path)?)?;
                    println!("Exported database to {}", path.display());
                }
                None => {
                    export.write(std::io::stdout().lock())?;
                    println!();
                }
            }
        }
    }

    Ok(())
}
