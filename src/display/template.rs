//! Notification template display formatting

use crate::models::{NotificationTemplate, OutboundMessage};

use super::truncate;

/// Format a list of templates as a table
pub fn format_template_list(templates: &[NotificationTemplate]) -> String {
    if templates.is_empty() {
        return "No templates found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:26} {:10} {:10} {:8}\n",
        "ID", "Name", "Channel", "Trigger", "Active"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for template in templates {
        output.push_str(&format!(
            "{:12} {:26} {:10} {:10} {:8}\n",
            template.id.to_string(),
            truncate(&template.name, 26),
            template.channel.to_string(),
            template.trigger.to_string(),
            if template.is_active { "Yes" } else { "No" }
        ));
    }

    output.push_str(&format!("\n{} template(s)\n", templates.len()));
    output
}

/// Format template details for display
pub fn format_template_details(template: &NotificationTemplate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Template: {}\n", template.id));
    output.push_str(&format!("Name:     {}\n", template.name));
    output.push_str(&format!("Channel:  {}\n", template.channel));
    output.push_str(&format!("Trigger:  {}\n", template.trigger));
    output.push_str(&format!(
        "Active:   {}\n",
        if template.is_active { "Yes" } else { "No" }
    ));
    if let Some(subject) = &template.subject {
        output.push_str(&format!("Subject:  {}\n", subject));
    }
    output.push_str(&format!("\n{}\n", template.body));

    output
}

/// Format a composed message the way the recipient will see it
pub fn format_message_preview(message: &OutboundMessage) -> String {
    let mut output = String::new();

    output.push_str(&format!("Channel:   {}\n", message.channel));
    output.push_str(&format!("Trigger:   {}\n", message.trigger));
    output.push_str(&format!("Recipient: {}\n", message.recipient));
    if let Some(subject) = &message.subject {
        output.push_str(&format!("Subject:   {}\n", subject));
    }
    output.push_str(&format!("\n{}\n", message.body));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, Trigger};

    #[test]
    fn test_empty_list() {
        assert_eq!(format_template_list(&[]), "No templates found.\n");
    }

    #[test]
    fn test_list_and_details() {
        let template = NotificationTemplate::with_subject(
            "E-mail overdue",
            Channel::Email,
            Trigger::Overdue,
            "Fatura em atraso",
            "Olá {{cliente}}",
        );

        let list = format_template_list(std::slice::from_ref(&template));
        assert!(list.contains("E-mail overdue"));
        assert!(list.contains("Overdue"));

        let details = format_template_details(&template);
        assert!(details.contains("Subject:  Fatura em atraso"));
        assert!(details.contains("Olá {{cliente}}"));
    }

    #[test]
    fn test_message_preview() {
        let mut message = OutboundMessage::new(
            Channel::Email,
            Trigger::Due,
            "billing@acme.com",
            "Olá Maria",
        );
        message.subject = Some("Aviso".to_string());

        let preview = format_message_preview(&message);
        assert!(preview.contains("Recipient: billing@acme.com"));
        assert!(preview.contains("Subject:   Aviso"));
        assert!(preview.contains("Olá Maria"));
    }
}
