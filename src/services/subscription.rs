//! Subscription service
//!
//! Provides business logic for subscription management: CRUD operations,
//! pause/resume, and billing-date advancement.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{RetainerError, RetainerResult};
use crate::models::{ClientId, Money, Recurrence, Subscription, SubscriptionId};
use crate::storage::Storage;

/// Service for subscription management
pub struct SubscriptionService<'a> {
    storage: &'a Storage,
}

/// A subscription joined with its client's name, for display
#[derive(Debug, Clone)]
pub struct SubscriptionSummary {
    pub subscription: Subscription,
    pub client_name: String,
}

/// Fields that can be changed on an existing subscription
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionInput {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub recurrence: Option<Recurrence>,
    pub next_billing_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new subscription service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new subscription
    pub fn create(
        &self,
        client_id: ClientId,
        name: &str,
        amount: Money,
        recurrence: Recurrence,
        next_billing_date: NaiveDate,
    ) -> RetainerResult<Subscription> {
        // Verify client exists and is billable
        let client = self
            .storage
            .clients
            .get(client_id)?
            .ok_or_else(|| RetainerError::client_not_found(client_id.to_string()))?;

        if client.archived {
            return Err(RetainerError::Validation(
                "Cannot add subscriptions to an archived client".into(),
            ));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(RetainerError::Validation(
                "Subscription name cannot be empty".into(),
            ));
        }

        let sub = Subscription::new(client_id, name, amount, recurrence, next_billing_date);

        sub.validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.subscriptions.upsert(sub.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_create(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &sub,
        )?;

        Ok(sub)
    }

    /// Get a subscription by ID
    pub fn get(&self, id: SubscriptionId) -> RetainerResult<Option<Subscription>> {
        self.storage.subscriptions.get(id)
    }

    /// Find a subscription by name or ID string
    pub fn find(&self, identifier: &str) -> RetainerResult<Option<Subscription>> {
        if let Some(sub) = self.storage.subscriptions.get_by_name(identifier)? {
            return Ok(Some(sub));
        }

        if let Ok(id) = identifier.parse::<SubscriptionId>() {
            return self.storage.subscriptions.get(id);
        }

        Ok(None)
    }

    /// Get all subscriptions
    pub fn list(&self, include_paused: bool) -> RetainerResult<Vec<Subscription>> {
        if include_paused {
            self.storage.subscriptions.get_all()
        } else {
            self.storage.subscriptions.get_active()
        }
    }

    /// Get subscriptions for a client
    pub fn list_for_client(&self, client_id: ClientId) -> RetainerResult<Vec<Subscription>> {
        self.storage.subscriptions.get_by_client(client_id)
    }

    /// Get subscriptions joined with their client names
    pub fn list_with_clients(
        &self,
        include_paused: bool,
    ) -> RetainerResult<Vec<SubscriptionSummary>> {
        let subscriptions = self.list(include_paused)?;
        let mut summaries = Vec::with_capacity(subscriptions.len());

        for subscription in subscriptions {
            let client_name = self
                .storage
                .clients
                .get(subscription.client_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "(unknown client)".to_string());

            summaries.push(SubscriptionSummary {
                subscription,
                client_name,
            });
        }

        Ok(summaries)
    }

    /// Update a subscription
    pub fn update(
        &self,
        id: SubscriptionId,
        input: UpdateSubscriptionInput,
    ) -> RetainerResult<Subscription> {
        let mut sub = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| RetainerError::subscription_not_found(id.to_string()))?;

        let before = sub.clone();

        if let Some(new_name) = input.name {
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return Err(RetainerError::Validation(
                    "Subscription name cannot be empty".into(),
                ));
            }
            sub.name = new_name;
        }
        if let Some(amount) = input.amount {
            sub.set_amount(amount);
        }
        if let Some(recurrence) = input.recurrence {
            sub.set_recurrence(recurrence);
        }
        if let Some(date) = input.next_billing_date {
            sub.set_next_billing_date(date);
        }
        if let Some(notes) = input.notes {
            sub.notes = notes;
        }
        sub.updated_at = chrono::Utc::now();

        sub.validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.subscriptions.upsert(sub.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_update(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &before,
            &sub,
        )?;

        Ok(sub)
    }

    /// Pause billing for a subscription
    pub fn pause(&self, id: SubscriptionId) -> RetainerResult<Subscription> {
        self.toggle_active(id, false)
    }

    /// Resume billing for a subscription
    pub fn resume(&self, id: SubscriptionId) -> RetainerResult<Subscription> {
        self.toggle_active(id, true)
    }

    fn toggle_active(&self, id: SubscriptionId, active: bool) -> RetainerResult<Subscription> {
        let mut sub = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| RetainerError::subscription_not_found(id.to_string()))?;

        let before = sub.clone();
        if active {
            sub.resume();
        } else {
            sub.pause();
        }

        self.storage.subscriptions.upsert(sub.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_update(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &before,
            &sub,
        )?;

        Ok(sub)
    }

    /// Roll a subscription's billing date forward one period
    pub fn advance(&self, id: SubscriptionId) -> RetainerResult<Subscription> {
        let mut sub = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| RetainerError::subscription_not_found(id.to_string()))?;

        let before = sub.clone();
        if !sub.advance_billing_date() {
            return Err(RetainerError::Billing(format!(
                "Subscription '{}' is one-time and has no next cycle",
                sub.name
            )));
        }

        self.storage.subscriptions.upsert(sub.clone())?;
        self.storage.subscriptions.save()?;

        self.storage.log_update(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &before,
            &sub,
        )?;

        Ok(sub)
    }

    /// Delete a subscription permanently
    pub fn delete(&self, id: SubscriptionId) -> RetainerResult<()> {
        let sub = self
            .storage
            .subscriptions
            .get(id)?
            .ok_or_else(|| RetainerError::subscription_not_found(id.to_string()))?;

        self.storage.subscriptions.delete(id)?;
        self.storage.subscriptions.save()?;

        self.storage.log_delete(
            EntityType::Subscription,
            sub.id.to_string(),
            Some(sub.name.clone()),
            &sub,
        )?;

        Ok(())
    }
}
