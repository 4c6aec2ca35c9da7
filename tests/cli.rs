//! End-to-end CLI tests
//!
//! Drives the compiled binary against a throwaway data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn retainer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("retainer").unwrap();
    cmd.env("RETAINER_CLI_DATA_DIR", dir.path());
    cmd
}

#[test]
fn help_describes_the_app() {
    let dir = TempDir::new().unwrap();
    retainer(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recurring-billing CRM"));
}

#[test]
fn init_seeds_default_templates() {
    let dir = TempDir::new().unwrap();

    retainer(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    retainer(&dir)
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 template(s)"));
}

#[test]
fn client_crud_flow() {
    let dir = TempDir::new().unwrap();

    retainer(&dir)
        .args([
            "client",
            "create",
            "Acme Studio",
            "--email",
            "billing@acme.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created client: Acme Studio"));

    retainer(&dir)
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Studio"))
        .stdout(predicate::str::contains("billing@acme.com"));

    retainer(&dir)
        .args(["client", "show", "Acme Studio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:     Acme Studio"));

    // Duplicate names are rejected
    retainer(&dir)
        .args(["client", "create", "acme studio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // Unknown clients are a clean error
    retainer(&dir)
        .args(["client", "show", "Globex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client not found"));
}

#[test]
fn billing_worklist_classifies_cycles() {
    let dir = TempDir::new().unwrap();

    retainer(&dir)
        .args(["client", "create", "Acme Studio"])
        .assert()
        .success();

    retainer(&dir)
        .args([
            "subscription",
            "create",
            "Acme Studio",
            "Hosting",
            "99,00",
            "--due",
            "2025-03-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created subscription: Hosting"));

    // Five days past due, unpaid: overdue
    retainer(&dir)
        .args(["billing", "status", "--date", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overdue (5 days)"))
        .stdout(predicate::str::contains("1 overdue"));

    // Before the due date: pending
    retainer(&dir)
        .args(["billing", "status", "--date", "2025-03-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending"));

    // A month earlier the cycle is in a future month and hidden
    retainer(&dir)
        .args(["billing", "status", "--date", "2025-02-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to collect."));
}

#[test]
fn notification_preview_renders_template() {
    let dir = TempDir::new().unwrap();

    retainer(&dir).arg("init").assert().success();

    retainer(&dir)
        .args([
            "client",
            "create",
            "Acme Studio",
            "--contact",
            "Maria Silva",
            "--phone",
            "(11) 98765-4321",
        ])
        .assert()
        .success();

    retainer(&dir)
        .args([
            "subscription",
            "create",
            "Acme Studio",
            "Hosting",
            "99,00",
            "--due",
            "2025-03-10",
        ])
        .assert()
        .success();

    retainer(&dir)
        .args([
            "billing",
            "preview",
            "Hosting",
            "--channel",
            "whatsapp",
            "--date",
            "2025-04-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trigger:   Overdue"))
        .stdout(predicate::str::contains("Recipient: 5511987654321"))
        .stdout(predicate::str::contains("Maria Silva"))
        .stdout(predicate::str::contains("R$ 99,00"));

    // Preview does not queue anything
    retainer(&dir)
        .args(["billing", "outbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Outbox is empty."));

    // Notify does
    retainer(&dir)
        .args([
            "billing",
            "notify",
            "Hosting",
            "--channel",
            "whatsapp",
            "--date",
            "2025-04-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued WhatsApp notification"));

    retainer(&dir)
        .args(["billing", "outbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 message(s) queued"));
}

#[test]
fn charge_and_dashboard_flow() {
    let dir = TempDir::new().unwrap();

    retainer(&dir)
        .args(["client", "create", "Acme Studio"])
        .assert()
        .success();

    retainer(&dir)
        .args([
            "subscription",
            "create",
            "Acme Studio",
            "Hosting",
            "300,00",
            "--recurrence",
            "quarterly",
            "--due",
            "2025-03-10",
        ])
        .assert()
        .success();

    retainer(&dir)
        .args(["transaction", "charge", "Hosting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Billed 'Hosting'"));

    // A cycle can only be billed once
    retainer(&dir)
        .args(["transaction", "charge", "Hosting"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // Quarterly R$ 300,00 normalizes to R$ 100,00 of MRR
    retainer(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly revenue (MRR): R$ 100,00"))
        .stdout(predicate::str::contains("Active subscriptions: 1"));
}
