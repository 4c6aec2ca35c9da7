//! Client display formatting

use crate::models::Client;

use super::truncate;

/// Format a list of clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:24} {:24} {:16}\n",
        "ID", "Name", "E-mail", "Phone"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for client in clients {
        let archived_marker = if client.archived { " (archived)" } else { "" };
        output.push_str(&format!(
            "{:12} {:24} {:24} {:16}{}\n",
            client.id.to_string(),
            truncate(&client.name, 24),
            truncate(client.email.as_deref().unwrap_or("-"), 24),
            truncate(client.phone.as_deref().unwrap_or("-"), 16),
            archived_marker
        ));
    }

    output.push_str(&format!("\n{} client(s)\n", clients.len()));
    output
}

/// Format client details for display
pub fn format_client_details(client: &Client) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client:   {}\n", client.id));
    output.push_str(&format!("Name:     {}\n", client.name));

    if let Some(contact) = &client.contact_name {
        output.push_str(&format!("Contact:  {}\n", contact));
    }
    if let Some(email) = &client.email {
        output.push_str(&format!("E-mail:   {}\n", email));
    }
    if let Some(phone) = &client.phone {
        output.push_str(&format!("Phone:    {}\n", phone));
    }
    if !client.notes.is_empty() {
        output.push_str(&format!("Notes:    {}\n", client.notes));
    }
    if client.archived {
        output.push_str("Status:   Archived\n");
    }
    output.push_str(&format!(
        "Created:  {}\n",
        client.created_at.format("%Y-%m-%d")
    ));

    output
}
