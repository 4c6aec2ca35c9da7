use anyhow::Result;
use clap::{Parser, Subcommand};

use retainer::cli::{
    handle_billing_command, handle_client_command, handle_export_command,
    handle_subscription_command, handle_template_command, handle_transaction_command,
};
use retainer::config::{paths::RetainerPaths, settings::Settings};
use retainer::display::report::format_dashboard;
use retainer::reports::DashboardReport;
use retainer::storage::Storage;

#[derive(Parser)]
#[command(
    name = "retainer",
    version,
    about = "Terminal-based client and recurring-billing CRM",
    long_about = "retainer is a terminal-based CRM for small service businesses \
                  that bill clients on recurring or installment plans. It tracks \
                  clients, subscriptions, and a transaction ledger, classifies \
                  each billing cycle as paid, pending, or overdue, and composes \
                  billing-reminder notifications from per-channel templates."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the business summary (clients, MRR, ledger totals)
    Dashboard,

    /// Client management commands
    #[command(subcommand, alias = "cli")]
    Client(retainer::cli::ClientCommands),

    /// Subscription management commands
    #[command(subcommand, alias = "sub")]
    Subscription(retainer::cli::SubscriptionCommands),

    /// Transaction ledger commands
    #[command(subcommand, alias = "txn")]
    Transaction(retainer::cli::TransactionCommands),

    /// Notification template commands
    #[command(subcommand, alias = "tpl")]
    Template(retainer::cli::TemplateCommands),

    /// Billing status and notification commands
    #[command(subcommand)]
    Billing(retainer::cli::BillingCommands),

    /// Export data to CSV/JSON
    #[command(subcommand)]
    Export(retainer::cli::ExportCommands),

    /// Initialize a new database with default templates
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = RetainerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Dashboard) => {
            let report = DashboardReport::generate(&storage)?;
            print!("{}", format_dashboard(&report));
        }
        Some(Commands::Client(cmd)) => {
            handle_client_command(&storage, cmd)?;
        }
        Some(Commands::Subscription(cmd)) => {
            handle_subscription_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Template(cmd)) => {
            handle_template_command(&storage, cmd)?;
        }
        Some(Commands::Billing(cmd)) => {
            handle_billing_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing retainer at: {}", paths.data_dir().display());
            retainer::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("A default notification template set has been created:");
            println!("  - WhatsApp: due date and overdue messages");
            println!("  - E-mail:   due date and overdue messages");
            println!();
            println!("Run 'retainer template list' to see them.");
        }
        Some(Commands::Config) => {
            println!("retainer Configuration");
            println!("======================");
            println!("Config directory: {}", paths.config_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Date format:       {}", settings.date_format);
            println!("  Country dial code: {}", settings.country_dial_code);
            println!(
                "  Payment link:      {}",
                settings.payment_link.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  SMTP host:         {}",
                if settings.delivery.smtp_host.is_empty() {
                    "(not set)"
                } else {
                    &settings.delivery.smtp_host
                }
            );
            println!(
                "  WhatsApp webhook:  {}",
                if settings.delivery.whatsapp_webhook_url.is_empty() {
                    "(not set)"
                } else {
                    &settings.delivery.whatsapp_webhook_url
                }
            );
        }
        None => {
            println!("retainer - client and recurring-billing CRM");
            println!();
            println!("Run 'retainer --help' for usage information.");
            println!("Run 'retainer init' to set up a new database.");
        }
    }

    Ok(())
}
