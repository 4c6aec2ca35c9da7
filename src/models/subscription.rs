//! Subscription model
//!
//! Represents a service sold to a client on a billing cadence: recurring
//! (monthly through annual), one-time, or installment plans. The next
//! billing date anchors cycle matching against the transaction ledger.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, SubscriptionId};
use super::money::Money;

/// Billing cadence of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Billed every month
    Monthly,
    /// Billed every three months
    Quarterly,
    /// Billed every six months
    Semiannual,
    /// Billed every twelve months
    Annual,
    /// Single charge, no renewal
    OneTime,
    /// Fixed-term plan billed monthly until paid off
    Installment,
}

impl Recurrence {
    /// Number of months one payment covers, for revenue normalization
    ///
    /// One-time charges and installments have no defined period: they do
    /// not contribute to recurring revenue.
    pub fn months_in_period(&self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Semiannual => Some(6),
            Self::Annual => Some(12),
            Self::OneTime | Self::Installment => None,
        }
    }

    /// Months between consecutive billing dates
    ///
    /// Installments fall due monthly; a one-time charge never renews.
    pub fn interval_months(&self) -> Option<u32> {
        match self {
            Self::Monthly | Self::Installment => Some(1),
            Self::Quarterly => Some(3),
            Self::Semiannual => Some(6),
            Self::Annual => Some(12),
            Self::OneTime => None,
        }
    }

    /// Whether payments on this cadence repeat
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Parse a recurrence from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "semiannual" | "semi_annual" | "biannual" => Some(Self::Semiannual),
            "annual" | "yearly" => Some(Self::Annual),
            "one_time" | "onetime" | "one-time" | "once" => Some(Self::OneTime),
            "installment" | "installments" => Some(Self::Installment),
            _ => None,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Quarterly => write!(f, "Quarterly"),
            Self::Semiannual => write!(f, "Semiannual"),
            Self::Annual => write!(f, "Annual"),
            Self::OneTime => write!(f, "One-time"),
            Self::Installment => write!(f, "Installment"),
        }
    }
}

/// A service subscription billed to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: SubscriptionId,

    /// The client this subscription is billed to
    pub client_id: ClientId,

    /// Service name (e.g., "Website maintenance")
    pub name: String,

    /// Price per billing period
    pub amount: Money,

    /// Billing cadence
    pub recurrence: Recurrence,

    /// Due date of the current billing cycle
    pub next_billing_date: NaiveDate,

    /// Whether this subscription is active (inactive ones are not billed)
    pub is_active: bool,

    /// Notes about this subscription
    #[serde(default)]
    pub notes: String,

    /// When the subscription was created
    pub created_at: DateTime<Utc>,

    /// When the subscription was last modified
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a new active subscription
    pub fn new(
        client_id: ClientId,
        name: impl Into<String>,
        amount: Money,
        recurrence: Recurrence,
        next_billing_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SubscriptionId::new(),
            client_id,
            name: name.into(),
            amount,
            recurrence,
            next_billing_date,
            is_active: true,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the price
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    /// Set the billing cadence
    pub fn set_recurrence(&mut self, recurrence: Recurrence) {
        self.recurrence = recurrence;
        self.updated_at = Utc::now();
    }

    /// Set the next billing date
    pub fn set_next_billing_date(&mut self, date: NaiveDate) {
        self.next_billing_date = date;
        self.updated_at = Utc::now();
    }

    /// Pause billing for this subscription
    pub fn pause(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Resume billing for this subscription
    pub fn resume(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Roll the billing date forward one period
    ///
    /// Returns false for one-time subscriptions, which never renew. The day
    /// of month is clamped when the target month is shorter (Jan 31 + 1
    /// month = Feb 28/29).
    pub fn advance_billing_date(&mut self) -> bool {
        match self.recurrence.interval_months() {
            Some(months) => {
                self.next_billing_date = add_months(self.next_billing_date, months);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Validate the subscription
    pub fn validate(&self) -> Result<(), SubscriptionValidationError> {
        if self.name.trim().is_empty() {
            return Err(SubscriptionValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(SubscriptionValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.amount, self.recurrence)
    }
}

/// Add whole months to a date, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;

    NaiveDate::from_ymd_opt(year, month0 + 1, date.day()).unwrap_or_else(|| {
        // Day overflows the target month: clamp to its last day
        let first_of_following = if month0 == 11 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month0 + 2, 1)
        };
        first_of_following.unwrap() - Duration::days(1)
    })
}

/// Validation errors for subscriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionValidationError {
    EmptyName,
    NegativeAmount,
}

impl fmt::Display for SubscriptionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Subscription name cannot be empty"),
            Self::NegativeAmount => write!(f, "Subscription amount cannot be negative"),
        }
    }
}

impl std::error::Error for SubscriptionValidationError {}
