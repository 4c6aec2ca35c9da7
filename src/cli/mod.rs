//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod billing;
pub mod client;
pub mod export;
pub mod subscription;
pub mod template;
pub mod transaction;

pub use billing::{handle_billing_command, BillingCommands};
pub use client::{handle_client_command, ClientCommands};
pub use export::{handle_export_command, ExportCommands};
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use template::{handle_template_command, TemplateCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{RetainerError, RetainerResult};
use crate::models::Money;

/// Parse a date argument
///
/// Accepts ISO (`2025-01-10`) and Brazilian (`10/01/2025`) formats.
pub(crate) fn parse_date(s: &str) -> RetainerResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| {
            RetainerError::Validation(format!(
                "Invalid date format: '{}'. Use YYYY-MM-DD or DD/MM/YYYY",
                s
            ))
        })
}

/// Parse a money argument with a helpful error
pub(crate) fn parse_amount(s: &str) -> RetainerResult<Money> {
    Money::parse(s).map_err(|e| {
        RetainerError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '299,90' or '1.250,50'. Error: {}",
            s, e
        ))
    })
}

/// The reference date for billing decisions: an explicit `--date` override,
/// or the local calendar date
pub(crate) fn resolve_today(date: Option<&str>) -> RetainerResult<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(parse_date("2025-01-10").unwrap(), expected);
        assert_eq!(parse_date("10/01/2025").unwrap(), expected);
        assert!(parse_date("01-10-2025").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("299,90").unwrap().cents(), 29990);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_resolve_today_with_override() {
        let resolved = resolve_today(Some("2025-03-15")).unwrap();
        assert_eq!(resolved, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }
}
