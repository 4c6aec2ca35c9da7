//! Notification service
//!
//! Composes billing-reminder messages for a subscription: infers the
//! trigger from the cycle's billing status, picks the matching template
//! (with fallbacks), renders placeholders, normalizes the recipient
//! address, and queues the result in the outbox for the external
//! dispatcher.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::billing;
use crate::config::settings::Settings;
use crate::error::{RetainerError, RetainerResult};
use crate::models::{Channel, Money, OutboundMessage, SubscriptionId, Trigger};
use crate::storage::Storage;

use super::template::TemplateService;

/// Values substituted into template placeholders
#[derive(Debug, Clone)]
pub struct TemplateVars {
    /// Greeting name ({{cliente}})
    pub client_name: String,
    /// Service name ({{servico}})
    pub subscription_name: String,
    /// Price ({{valor}}, rendered in BRL)
    pub amount: Money,
    /// Formatted due date ({{vencimento}})
    pub due_date: String,
    /// Payment link ({{link_pagamento}})
    pub payment_link: String,
}

/// Substitute the named placeholders in a template body or subject
pub fn render_placeholders(content: &str, vars: &TemplateVars) -> String {
    content
        .replace("{{cliente}}", &vars.client_name)
        .replace("{{servico}}", &vars.subscription_name)
        .replace("{{valor}}", &vars.amount.to_string())
        .replace("{{vencimento}}", &vars.due_date)
        .replace("{{link_pagamento}}", &vars.payment_link)
}

/// Normalize a phone number for WhatsApp delivery
///
/// Strips everything but digits. National numbers (10-11 digits: area code
/// plus 8-9 digit line) get the country dial code prefixed; anything else
/// is assumed to already carry it.
pub fn normalize_phone(raw: &str, dial_code: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if (10..=11).contains(&digits.len()) {
        format!("{}{}", dial_code, digits)
    } else {
        digits
    }
}

/// Subject used when an e-mail template carries none
const DEFAULT_EMAIL_SUBJECT: &str = "Aviso de Cobrança";

/// Service for composing and queueing notifications
pub struct NotificationService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> NotificationService<'a> {
    /// Create a new notification service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Compose a notification for a subscription without queueing it
    ///
    /// The trigger is inferred from the cycle's billing status against
    /// `today`: overdue cycles get the overdue trigger, everything else the
    /// due trigger.
    pub fn compose(
        &self,
        subscription_id: SubscriptionId,
        channel: Channel,
        today: NaiveDate,
    ) -> RetainerResult<OutboundMessage> {
        let sub = self
            .storage
            .subscriptions
            .get(subscription_id)?
            .ok_or_else(|| RetainerError::subscription_not_found(subscription_id.to_string()))?;

        if !sub.is_active {
            return Err(RetainerError::Notification(format!(
                "Subscription '{}' is paused",
                sub.name
            )));
        }

        let client = self
            .storage
            .clients
            .get(sub.client_id)?
            .ok_or_else(|| RetainerError::client_not_found(sub.client_id.to_string()))?;

        let ledger = self.storage.transactions.get_by_subscription(sub.id)?;
        let status = billing::classify(sub.next_billing_date, today, &ledger);
        let trigger = if status.is_overdue() {
            Trigger::Overdue
        } else {
            Trigger::Due
        };

        let recipient = match channel {
            Channel::Whatsapp => {
                let phone = client.phone.as_deref().ok_or_else(|| {
                    RetainerError::Notification(format!(
                        "Client '{}' has no phone number",
                        client.name
                    ))
                })?;
                normalize_phone(phone, &self.settings.country_dial_code)
            }
            Channel::Email => client
                .email
                .clone()
                .ok_or_else(|| {
                    RetainerError::Notification(format!(
                        "Client '{}' has no e-mail address",
                        client.name
                    ))
                })?,
        };

        let vars = TemplateVars {
            client_name: client.display_name().to_string(),
            subscription_name: sub.name.clone(),
            amount: sub.amount,
            due_date: sub
                .next_billing_date
                .format(&self.settings.date_format)
                .to_string(),
            payment_link: self
                .settings
                .payment_link
                .clone()
                .unwrap_or_else(|| "#".to_string()),
        };

        let template_service = TemplateService::new(self.storage);
        let template = template_service.resolve(channel, trigger)?;

        let (subject, body) = match template {
            Some(template) => {
                let body = render_placeholders(&template.body, &vars);
                let subject = match channel {
                    Channel::Email => Some(
                        template
                            .subject
                            .as_deref()
                            .map(|s| render_placeholders(s, &vars))
                            .unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string()),
                    ),
                    Channel::Whatsapp => None,
                };
                (subject, body)
            }
            None => (
                match channel {
                    Channel::Email => Some(DEFAULT_EMAIL_SUBJECT.to_string()),
                    Channel::Whatsapp => None,
                },
                default_body(channel, &vars),
            ),
        };

        let mut message = OutboundMessage::new(channel, trigger, recipient, body);
        message.subject = subject;
        message.client_id = Some(client.id);
        message.subscription_id = Some(sub.id);

        Ok(message)
    }

    /// Compose a notification and queue it in the outbox
    pub fn send_manual(
        &self,
        subscription_id: SubscriptionId,
        channel: Channel,
        today: NaiveDate,
    ) -> RetainerResult<OutboundMessage> {
        let message = self.compose(subscription_id, channel, today)?;

        self.storage.outbox.enqueue(message.clone())?;
        self.storage.outbox.save()?;

        self.storage.log_create(
            EntityType::Notification,
            message.id.to_string(),
            Some(format!("{}", message)),
            &message,
        )?;

        Ok(message)
    }
}

/// Built-in message used when no template matches the channel at all
fn default_body(channel: Channel, vars: &TemplateVars) -> String {
    match channel {
        Channel::Whatsapp => format!(
            "Olá {}, referente ao serviço *{}*. Valor: {}.",
            vars.client_name, vars.subscription_name, vars.amount
        ),
        Channel::Email => format!(
            "Olá {},\nDetalhes do serviço: {}\nValor: {}",
            vars.client_name, vars.subscription_name, vars.amount
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RetainerPaths;
    use crate::models::{Client, NotificationTemplate, Recurrence, Subscription};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vars() -> TemplateVars {
        TemplateVars {
            client_name: "Maria Silva".to_string(),
            subscription_name: "Hosting".to_string(),
            amount: Money::from_cents(125050),
            due_date: "10/01/2025".to_string(),
            payment_link: "https://pay.example.com/abc".to_string(),
        }
    }

    fn setup() -> (TempDir, Storage, Settings, Subscription) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let mut client = Client::new("Acme Studio");
        client.set_contact_name(Some("Maria Silva".to_string()));
        client.set_email(Some("billing@acme.com".to_string()));
        client.set_phone(Some("(11) 98765-4321".to_string()));
        storage.clients.upsert(client.clone()).unwrap();

        let sub = Subscription::new(
            client.id,
            "Hosting",
            Money::from_reais(99),
            Recurrence::Monthly,
            date(2025, 1, 10),
        );
        storage.subscriptions.upsert(sub.clone()).unwrap();

        (temp_dir, storage, Settings::default(), sub)
    }

    #[test]
    fn test_render_placeholders() {
        let rendered = render_placeholders(
            "Olá {{cliente}}, {{servico}} de {{valor}} vence em {{vencimento}}. \
             Pague: {{link_pagamento}}",
            &vars(),
        );

        assert_eq!(
            rendered,
            "Olá Maria Silva, Hosting de R$ 1.250,50 vence em 10/01/2025. \
             Pague: https://pay.example.com/abc"
        );
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let rendered = render_placeholders("{{cliente}} {{cliente}}", &vars());
        assert_eq!(rendered, "Maria Silva Maria Silva");
    }

    #[test]
    fn test_normalize_phone() {
        // 11-digit national number (mobile with 9th digit)
        assert_eq!(normalize_phone("(11) 98765-4321", "55"), "5511987654321");
        // 10-digit national number (landline)
        assert_eq!(normalize_phone("11 8765-4321", "55"), "551187654321");
        // Already international: left alone
        assert_eq!(normalize_phone("+55 11 98765-4321", "55"), "5511987654321");
        // Too short to be national: digits only
        assert_eq!(normalize_phone("4321", "55"), "4321");
    }

    #[test]
    fn test_compose_whatsapp_overdue() {
        let (_temp, storage, settings, sub) = setup();
        let service = NotificationService::new(&storage, &settings);

        // Cycle due Jan 10, composing on Feb 1: overdue
        let message = service
            .compose(sub.id, Channel::Whatsapp, date(2025, 2, 1))
            .unwrap();

        assert_eq!(message.trigger, Trigger::Overdue);
        assert_eq!(message.recipient, "5511987654321");
        assert!(message.subject.is_none());
        // No template exists: the built-in fallback is used, greeting the
        // contact person
        assert!(message.body.contains("Maria Silva"));
        assert!(message.body.contains("Hosting"));
    }

    #[test]
    fn test_compose_email_due_uses_template() {
        let (_temp, storage, settings, sub) = setup();

        storage
            .templates
            .upsert(NotificationTemplate::with_subject(
                "E-mail due",
                Channel::Email,
                Trigger::Due,
                "Vencimento: {{servico}}",
                "Olá {{cliente}}, {{servico}} vence em {{vencimento}}.",
            ))
            .unwrap();

        let service = NotificationService::new(&storage, &settings);

        // Due Jan 10, composing Jan 5: not overdue, so the due trigger
        let message = service
            .compose(sub.id, Channel::Email, date(2025, 1, 5))
            .unwrap();

        assert_eq!(message.trigger, Trigger::Due);
        assert_eq!(message.recipient, "billing@acme.com");
        assert_eq!(message.subject.as_deref(), Some("Vencimento: Hosting"));
        assert_eq!(
            message.body,
            "Olá Maria Silva, Hosting vence em 10/01/2025."
        );
    }

    #[test]
    fn test_compose_falls_back_to_overdue_template() {
        let (_temp, storage, settings, sub) = setup();

        storage
            .templates
            .upsert(NotificationTemplate::new(
                "WhatsApp overdue",
                Channel::Whatsapp,
                Trigger::Overdue,
                "Atraso: {{servico}}",
            ))
            .unwrap();

        let service = NotificationService::new(&storage, &settings);

        // Due trigger requested, only an overdue template exists
        let message = service
            .compose(sub.id, Channel::Whatsapp, date(2025, 1, 5))
            .unwrap();

        assert_eq!(message.trigger, Trigger::Due);
        assert_eq!(message.body, "Atraso: Hosting");
    }

    #[test]
    fn test_compose_paid_cycle_is_due_not_overdue() {
        let (_temp, storage, settings, sub) = setup();

        let mut txn = crate::models::Transaction::for_subscription(
            sub.id,
            sub.client_id,
            "Hosting",
            sub.amount,
            date(2025, 1, 12),
        );
        txn.mark_paid();
        storage.transactions.upsert(txn).unwrap();

        let service = NotificationService::new(&storage, &settings);

        // Past the due date but the cycle is settled: not overdue
        let message = service
            .compose(sub.id, Channel::Whatsapp, date(2025, 2, 1))
            .unwrap();
        assert_eq!(message.trigger, Trigger::Due);
    }

    #[test]
    fn test_compose_requires_contact_details() {
        let (_temp, storage, settings, sub) = setup();

        let mut client = storage.clients.get(sub.client_id).unwrap().unwrap();
        client.set_phone(None);
        storage.clients.upsert(client).unwrap();

        let service = NotificationService::new(&storage, &settings);
        let result = service.compose(sub.id, Channel::Whatsapp, date(2025, 1, 5));

        assert!(matches!(result, Err(RetainerError::Notification(_))));
    }

    #[test]
    fn test_compose_paused_subscription_fails() {
        let (_temp, storage, settings, sub) = setup();

        let mut paused = sub.clone();
        paused.pause();
        storage.subscriptions.upsert(paused).unwrap();

        let service = NotificationService::new(&storage, &settings);
        let result = service.compose(sub.id, Channel::Whatsapp, date(2025, 1, 5));

        assert!(matches!(result, Err(RetainerError::Notification(_))));
    }

    #[test]
    fn test_send_manual_queues_and_audits() {
        let (_temp, storage, settings, sub) = setup();
        let service = NotificationService::new(&storage, &settings);

        service
            .send_manual(sub.id, Channel::Whatsapp, date(2025, 2, 1))
            .unwrap();

        assert_eq!(storage.outbox.count().unwrap(), 1);
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_compose_does_not_queue() {
        let (_temp, storage, settings, sub) = setup();
        let service = NotificationService::new(&storage, &settings);

        service
            .compose(sub.id, Channel::Whatsapp, date(2025, 2, 1))
            .unwrap();

        assert_eq!(storage.outbox.count().unwrap(), 0);
    }
}
