//! Transaction service
//!
//! Provides business logic for the ledger: CRUD operations, filtering,
//! marking payments, and generating the billing entry for a subscription's
//! current cycle.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::billing;
use crate::error::{RetainerError, RetainerResult};
use crate::models::{
    ClientId, Money, Subscription, SubscriptionId, Transaction, TransactionId, TransactionKind,
    TransactionStatus,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by client
    pub client_id: Option<ClientId>,
    /// Filter by subscription
    pub subscription_id: Option<SubscriptionId>,
    /// Filter by kind (income/expense)
    pub kind: Option<TransactionKind>,
    /// Filter by status (pending/paid)
    pub status: Option<TransactionStatus>,
    /// Filter by due date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by due date range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by client
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Filter by subscription
    pub fn subscription(mut self, subscription_id: SubscriptionId) -> Self {
        self.subscription_id = Some(subscription_id);
        self
    }

    /// Filter by kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by status
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by due date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub client_id: Option<ClientId>,
    pub subscription_id: Option<SubscriptionId>,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub status: Option<TransactionStatus>,
    pub due_date: NaiveDate,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> RetainerResult<Transaction> {
        // Verify referenced entities exist
        if let Some(client_id) = input.client_id {
            self.storage
                .clients
                .get(client_id)?
                .ok_or_else(|| RetainerError::client_not_found(client_id.to_string()))?;
        }
        if let Some(sub_id) = input.subscription_id {
            self.storage
                .subscriptions
                .get(sub_id)?
                .ok_or_else(|| RetainerError::subscription_not_found(sub_id.to_string()))?;
        }

        let mut txn = Transaction::new(
            input.description.trim(),
            input.amount,
            input.kind,
            input.due_date,
        );
        txn.client_id = input.client_id;
        txn.subscription_id = input.subscription_id;
        if let Some(status) = input.status {
            txn.status = status;
        }

        txn.validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Generate the pending billing entry for a subscription's current cycle
    ///
    /// Creates an income transaction due on the subscription's next billing
    /// date. Refused when the subscription is paused or when an entry for
    /// that cycle already exists.
    pub fn charge_subscription(&self, subscription_id: SubscriptionId) -> RetainerResult<Transaction> {
        let sub = self
            .storage
            .subscriptions
            .get(subscription_id)?
            .ok_or_else(|| RetainerError::subscription_not_found(subscription_id.to_string()))?;

        if !sub.is_active {
            return Err(RetainerError::Billing(format!(
                "Subscription '{}' is paused",
                sub.name
            )));
        }

        // One entry per cycle: refuse if this month/year is already billed
        let existing = self.storage.transactions.get_by_subscription(sub.id)?;
        if existing
            .iter()
            .any(|t| billing::cycle_matches(t.due_date, sub.next_billing_date))
        {
            return Err(RetainerError::Duplicate {
                entity_type: "Transaction",
                identifier: format!(
                    "{} ({})",
                    sub.name,
                    sub.next_billing_date.format("%Y-%m")
                ),
            });
        }

        let txn = Transaction::for_subscription(
            sub.id,
            sub.client_id,
            &sub.name,
            sub.amount,
            sub.next_billing_date,
        );

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> RetainerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by ID string
    pub fn find(&self, identifier: &str) -> RetainerResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }
        Ok(None)
    }

    /// List transactions with optional filtering
    pub fn list(&self, filter: TransactionFilter) -> RetainerResult<Vec<Transaction>> {
        let mut transactions = if let Some(sub_id) = filter.subscription_id {
            self.storage.transactions.get_by_subscription(sub_id)?
        } else if let Some(client_id) = filter.client_id {
            self.storage.transactions.get_by_client(client_id)?
        } else if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            self.storage.transactions.get_by_date_range(start, end)?
        } else {
            self.storage.transactions.get_all()?
        };

        // Apply additional filters
        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.due_date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.due_date <= end);
        }
        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(status) = filter.status {
            transactions.retain(|t| t.status == status);
        }

        // Apply limit
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Mark a transaction as paid
    ///
    /// With `advance`, the linked subscription's billing date rolls forward
    /// one period when the payment settles its current cycle.
    pub fn pay(&self, id: TransactionId, advance: bool) -> RetainerResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| RetainerError::transaction_not_found(id.to_string()))?;

        if txn.is_paid() {
            return Err(RetainerError::Validation(format!(
                "Transaction '{}' is already paid",
                txn.description
            )));
        }

        let before = txn.clone();
        txn.mark_paid();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &before,
            &txn,
        )?;

        if advance {
            if let Some(sub_id) = txn.subscription_id {
                self.advance_if_cycle_settled(sub_id, &txn)?;
            }
        }

        Ok(txn)
    }

    /// Mark a transaction back as pending
    pub fn unpay(&self, id: TransactionId) -> RetainerResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| RetainerError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();
        txn.mark_pending();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> RetainerResult<()> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| RetainerError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        Ok(())
    }

    /// Advance the subscription when this payment settles its current cycle
    fn advance_if_cycle_settled(
        &self,
        sub_id: SubscriptionId,
        txn: &Transaction,
    ) -> RetainerResult<()> {
        let sub: Subscription = match self.storage.subscriptions.get(sub_id)? {
            Some(s) => s,
            None => return Ok(()), // subscription was deleted; nothing to advance
        };

        if !billing::cycle_matches(txn.due_date, sub.next_billing_date) {
            return Ok(());
        }

        let before = sub.clone();
        let mut sub = sub;
        if sub.advance_billing_date() {
            self.storage.subscriptions.upsert(sub.clone())?;
            self.storage.subscriptions.save()?;

            self.storage.log_update(
                EntityType::Subscription,
                sub.id.to_string(),
                Some(sub.name.clone()),
                &before,
                &sub,
            )?;
        }

        Ok(())
    }
}
