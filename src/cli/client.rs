//! Client CLI commands
//!
//! Implements CLI commands for client management.

use clap::Subcommand;

use crate::display::client::{format_client_details, format_client_list};
use crate::error::{RetainerError, RetainerResult};
use crate::services::{ClientService, CreateClientInput, UpdateClientInput};
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Create a new client
    Create {
        /// Client name (business or person)
        name: String,
        /// Contact person, used in message greetings
        #[arg(short, long)]
        contact: Option<String>,
        /// E-mail address
        #[arg(short, long)]
        email: Option<String>,
        /// Phone number (for WhatsApp notifications)
        #[arg(short, long)]
        phone: Option<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List all clients
    List {
        /// Show archived clients
        #[arg(short, long)]
        all: bool,
    },
    /// Search clients by name
    Search {
        /// Search term
        term: String,
    },
    /// Show client details
    Show {
        /// Client name or ID
        client: String,
    },
    /// Edit a client (pass an empty string to clear an optional field)
    Edit {
        /// Client name or ID
        client: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New contact person
        #[arg(short, long)]
        contact: Option<String>,
        /// New e-mail address
        #[arg(short, long)]
        email: Option<String>,
        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Archive a client
    Archive {
        /// Client name or ID
        client: String,
    },
    /// Unarchive a client
    Unarchive {
        /// Client name or ID
        client: String,
    },
    /// Delete a client permanently
    Delete {
        /// Client name or ID
        client: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Treat an explicitly passed empty string as "clear this field"
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|s| if s.trim().is_empty() { None } else { Some(s) })
}

/// Handle a client command
pub fn handle_client_command(storage: &Storage, cmd: ClientCommands) -> RetainerResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Create {
            name,
            contact,
            email,
            phone,
            notes,
        } => {
            let client = service.create(CreateClientInput {
                name,
                contact_name: contact,
                email,
                phone,
                notes,
            })?;

            println!("Created client: {}", client.name);
            println!("  ID:      {}", client.id);
            if let Some(contact) = &client.contact_name {
                println!("  Contact: {}", contact);
            }
            if let Some(email) = &client.email {
                println!("  E-mail:  {}", email);
            }
            if let Some(phone) = &client.phone {
                println!("  Phone:   {}", phone);
            }
        }

        ClientCommands::List { all } => {
            let clients = service.list(all)?;
            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Search { term } => {
            let clients = service.search(&term)?;
            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Show { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;
            print!("{}", format_client_details(&found));
        }

        ClientCommands::Edit {
            client,
            name,
            contact,
            email,
            phone,
            notes,
        } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;

            if name.is_none()
                && contact.is_none()
                && email.is_none()
                && phone.is_none()
                && notes.is_none()
            {
                println!("No changes specified. Use --name, --contact, --email, --phone or --notes.");
                return Ok(());
            }

            let updated = service.update(
                found.id,
                UpdateClientInput {
                    name,
                    contact_name: clearable(contact),
                    email: clearable(email),
                    phone: clearable(phone),
                    notes,
                },
            )?;
            println!("Updated client: {}", updated.name);
        }

        ClientCommands::Archive { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;
            let archived = service.archive(found.id)?;
            println!("Archived client: {}", archived.name);
        }

        ClientCommands::Unarchive { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;
            let unarchived = service.unarchive(found.id)?;
            println!("Unarchived client: {}", unarchived.name);
        }

        ClientCommands::Delete { client, force } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;

            if !force {
                println!(
                    "This permanently deletes '{}' and cannot be undone. Re-run with --force to confirm.",
                    found.name
                );
                return Ok(());
            }

            service.delete(found.id)?;
            println!("Deleted client: {}", found.name);
        }
    }

    Ok(())
}
