//! Pure billing computations
//!
//! The two calculations everything else is built around, kept free of I/O
//! and ambient state so they can be exercised with plain values:
//!
//! - `mrr`: normalizing a subscription price to its monthly-equivalent
//!   recurring-revenue contribution
//! - `status`: classifying a billing cycle as paid, pending, or overdue
//!   against an explicit reference date and the transaction ledger
//!
//! Callers supply "today"; nothing in here reads the clock.

pub mod mrr;
pub mod status;

pub use mrr::{monthly_revenue, normalize_to_monthly};
pub use status::{classify, classify_subscription, cycle_matches, BillingState, BillingStatus};
