//! Template CLI commands
//!
//! Implements CLI commands for notification template management.

use clap::Subcommand;

use crate::display::template::{format_template_details, format_template_list};
use crate::error::{RetainerError, RetainerResult};
use crate::models::{Channel, Trigger};
use crate::services::{TemplateService, UpdateTemplateInput};
use crate::storage::Storage;

/// Template subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Create a new template
    Create {
        /// Template name
        name: String,
        /// Message body; placeholders: {{cliente}}, {{servico}}, {{valor}},
        /// {{vencimento}}, {{link_pagamento}}
        body: String,
        /// Delivery channel (whatsapp, email)
        #[arg(short, long)]
        channel: String,
        /// Billing situation (reminder, due, overdue, receipt)
        #[arg(short, long, default_value = "due")]
        trigger: String,
        /// Subject line (e-mail only)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// List templates
    List {
        /// Only show templates for one channel
        #[arg(short, long)]
        channel: Option<String>,
    },
    /// Show template details
    Show {
        /// Template name or ID
        template: String,
    },
    /// Edit a template
    Edit {
        /// Template name or ID
        template: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New trigger
        #[arg(short, long)]
        trigger: Option<String>,
        /// New subject (pass an empty string to clear)
        #[arg(short, long)]
        subject: Option<String>,
        /// New body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Enable a template
    Enable {
        /// Template name or ID
        template: String,
    },
    /// Disable a template
    Disable {
        /// Template name or ID
        template: String,
    },
    /// Delete a template permanently
    Delete {
        /// Template name or ID
        template: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

pub(crate) fn parse_channel(s: &str) -> RetainerResult<Channel> {
    Channel::parse(s).ok_or_else(|| {
        RetainerError::Validation(format!(
            "Invalid channel: '{}'. Valid values: whatsapp, email",
            s
        ))
    })
}

fn parse_trigger(s: &str) -> RetainerResult<Trigger> {
    Trigger::parse(s).ok_or_else(|| {
        RetainerError::Validation(format!(
            "Invalid trigger: '{}'. Valid values: reminder, due, overdue, receipt",
            s
        ))
    })
}

/// Handle a template command
pub fn handle_template_command(storage: &Storage, cmd: TemplateCommands) -> RetainerResult<()> {
    let service = TemplateService::new(storage);

    match cmd {
        TemplateCommands::Create {
            name,
            body,
            channel,
            trigger,
            subject,
        } => {
            let channel = parse_channel(&channel)?;
            let trigger = parse_trigger(&trigger)?;

            let template = service.create(&name, channel, trigger, subject, &body)?;

            println!("Created template: {}", template.name);
            println!("  ID:      {}", template.id);
            println!("  Channel: {}", template.channel);
            println!("  Trigger: {}", template.trigger);
        }

        TemplateCommands::List { channel } => {
            let channel = channel.as_deref().map(parse_channel).transpose()?;
            let templates = service.list(channel)?;
            print!("{}", format_template_list(&templates));
        }

        TemplateCommands::Show { template } => {
            let found = service
                .find(&template)?
                .ok_or_else(|| RetainerError::template_not_found(&template))?;
            print!("{}", format_template_details(&found));
        }

        TemplateCommands::Edit {
            template,
            name,
            trigger,
            subject,
            body,
        } => {
            let found = service
                .find(&template)?
                .ok_or_else(|| RetainerError::template_not_found(&template))?;

            if name.is_none() && trigger.is_none() && subject.is_none() && body.is_none() {
                println!("No changes specified. Use --name, --trigger, --subject or --body.");
                return Ok(());
            }

            let trigger = trigger.as_deref().map(parse_trigger).transpose()?;
            let subject =
                subject.map(|s| if s.trim().is_empty() { None } else { Some(s) });

            let updated = service.update(
                found.id,
                UpdateTemplateInput {
                    name,
                    trigger,
                    subject,
                    body,
                },
            )?;
            println!("Updated template: {}", updated.name);
        }

        TemplateCommands::Enable { template } => {
            let found = service
                .find(&template)?
                .ok_or_else(|| RetainerError::template_not_found(&template))?;
            let enabled = service.enable(found.id)?;
            println!("Enabled template: {}", enabled.name);
        }

        TemplateCommands::Disable { template } => {
            let found = service
                .find(&template)?
                .ok_or_else(|| RetainerError::template_not_found(&template))?;
            let disabled = service.disable(found.id)?;
            println!("Disabled template: {}", disabled.name);
        }

        TemplateCommands::Delete { template, force } => {
            let found = service
                .find(&template)?
                .ok_or_else(|| RetainerError::template_not_found(&template))?;

            if !force {
                println!(
                    "This permanently deletes '{}' and cannot be undone. Re-run with --force to confirm.",
                    found.name
                );
                return Ok(());
            }

            service.delete(found.id)?;
            println!("Deleted template: {}", found.name);
        }
    }

    Ok(())
}
