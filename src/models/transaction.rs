//! Transaction model
//!
//! Represents ledger entries: income from client billing and business
//! expenses. Income entries link back to the subscription and client they
//! bill so the cycle classifier can match payments to due dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, SubscriptionId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (client billing)
    #[default]
    Income,
    /// Money going out (business expense)
    Expense,
}

impl TransactionKind {
    /// Parse a transaction kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" | "in" | "receita" => Some(Self::Income),
            "expense" | "out" | "despesa" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Payment status of a transaction
///
/// The canonical serialized values are `pending` and `paid`. Ledgers
/// exported from the Portuguese-language predecessor used `pendente`/`pago`;
/// those are accepted on deserialization only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting payment
    #[default]
    #[serde(alias = "pendente")]
    Pending,
    /// Payment received
    #[serde(alias = "pago")]
    Paid,
}

impl TransactionStatus {
    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" | "pendente" => Some(Self::Pending),
            "paid" | "pago" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// A ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The client this transaction belongs to, if any
    pub client_id: Option<ClientId>,

    /// The subscription that generated this transaction, if any
    pub subscription_id: Option<SubscriptionId>,

    /// What this transaction is for
    #[serde(default)]
    pub description: String,

    /// Amount (always non-negative; direction comes from `kind`)
    pub amount: Money,

    /// Income or expense
    #[serde(default)]
    pub kind: TransactionKind,

    /// Payment status
    #[serde(default)]
    pub status: TransactionStatus,

    /// When payment is (or was) due
    pub due_date: NaiveDate,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new pending transaction
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        kind: TransactionKind,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            client_id: None,
            subscription_id: None,
            description: description.into(),
            amount,
            kind,
            status: TransactionStatus::Pending,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the pending income entry billing a subscription cycle
    pub fn for_subscription(
        subscription_id: SubscriptionId,
        client_id: ClientId,
        description: impl Into<String>,
        amount: Money,
        due_date: NaiveDate,
    ) -> Self {
        let mut txn = Self::new(description, amount, TransactionKind::Income, due_date);
        txn.subscription_id = Some(subscription_id);
        txn.client_id = Some(client_id);
        txn
    }

    /// Check if this transaction has been paid
    pub fn is_paid(&self) -> bool {
        self.status == TransactionStatus::Paid
    }

    /// Check if this is an income transaction
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Check if this is an expense transaction
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with its direction applied: positive income, negative expense
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Mark as paid
    pub fn mark_paid(&mut self) {
        self.status = TransactionStatus::Paid;
        self.updated_at = Utc::now();
    }

    /// Mark as pending
    pub fn mark_pending(&mut self) {
        self.status = TransactionStatus::Pending;
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.due_date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyDescription,
    NegativeAmount,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Transaction description cannot be empty"),
            Self::NegativeAmount => {
                write!(f, "Transaction amount cannot be negative; use the kind field")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
