use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{gs, init_db, init_db_with_catalogue, setup_test_db, temp_out};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    gs().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());

    gs().args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("already up to date"));
}

#[test]
fn test_overlapping_appointment_is_rejected_and_touching_one_accepted() {
    let db_path = setup_test_db("cli_overlap");
    init_db_with_catalogue(&db_path);

    // 10:00 - 10:45 (Haircut, end from service duration)
    gs().args([
        "--db",
        &db_path,
        "appt",
        "add",
        "--client",
        "1",
        "--date",
        "2025-09-01",
        "--at",
        "10:00",
        "--service",
        "1",
    ])
    .assert()
    .success()
    .stdout(contains("Appointment #1 booked").and(contains("10:00-10:45")));

    gs().args([
        "--db",
        &db_path,
        "appt",
        "add",
        "--client",
        "1",
        "--date",
        "2025-09-01",
        "--at",
        "10:30",
        "--end",
        "11:00",
    ])
    .assert()
    .failure()
    .stderr(contains("overlaps 1 existing appointment"));

    gs().args([
        "--db",
        &db_path,
        "appt",
        "add",
        "--client",
        "1",
        "--date",
        "2025-09-01",
        "--at",
        "10:45",
        "--end",
        "11:15",
    ])
    .assert()
    .success()
    .stdout(contains("Appointment #2 booked"));

    gs().args(["--db", &db_path, "appt", "list", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("Ana Pérez").and(contains("10:45-11:15")));
}

#[test]
fn test_reschedule_does_not_conflict_with_itself() {
    let db_path = setup_test_db("cli_reschedule");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "2025-09-02", "--at",
        "14:00", "--service", "2",
    ])
    .assert()
    .success();

    // shift by 15 minutes: overlaps its own old slot only
    gs().args(["--db", &db_path, "appt", "edit", "1", "--at", "14:15"])
        .assert()
        .success()
        .stdout(contains("14:15-15:15"));
}

#[test]
fn test_invoice_total_from_services() {
    let db_path = setup_test_db("cli_invoice_total");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "2025-09-03", "--at",
        "10:00", "--service", "1", "--service", "2",
    ])
    .assert()
    .success();

    gs().args(["--db", &db_path, "invoice", "generate", "1"])
        .assert()
        .success()
        .stdout(contains("$115,000.00"));

    gs().args(["--db", &db_path, "invoice", "show", "1"])
        .assert()
        .success()
        .stdout(
            contains("Haircut")
                .and(contains("Dye"))
                .and(contains("ISSUED"))
                .and(contains("$115,000.00")),
        );

    gs().args(["--db", &db_path, "invoice", "generate", "1", "--extra", "5000"])
        .assert()
        .success()
        .stdout(contains("$120,000.00"));
}

#[test]
fn test_service_delete_is_restricted() {
    let db_path = setup_test_db("cli_service_restrict");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "2025-09-04", "--at",
        "10:00", "--service", "1",
    ])
    .assert()
    .success();

    gs().args(["--db", &db_path, "invoice", "generate", "1"])
        .assert()
        .success();

    gs().args(["--db", &db_path, "service", "del", "1"])
        .assert()
        .failure()
        .stderr(contains("cannot be deleted"));

    // dropping the appointment leaves the invoice item in place
    gs().args(["--db", &db_path, "appt", "del", "1"])
        .assert()
        .success();

    gs().args(["--db", &db_path, "service", "del", "1"])
        .assert()
        .failure()
        .stderr(contains("1 invoice item(s)"));

    // an unused service can go
    gs().args(["--db", &db_path, "service", "del", "2"])
        .assert()
        .success()
        .stdout(contains("Service #2 deleted"));
}

#[test]
fn test_client_validation() {
    let db_path = setup_test_db("cli_client_validation");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "client", "add", "--name", "Luz", "--phone", "300 123 4567",
    ])
    .assert()
    .failure()
    .stderr(contains("already exists"));

    gs().args(["--db", &db_path, "client", "add", "--name", "Luz", "--phone", "123"])
        .assert()
        .failure()
        .stderr(contains("7 to 12 digits"));

    gs().args(["--db", &db_path, "client", "add", "--name", "  ", "--phone", "3119876543"])
        .assert()
        .failure()
        .stderr(contains("must not be blank"));

    gs().args(["--db", &db_path, "client", "list", "--search", "ana"])
        .assert()
        .success()
        .stdout(contains("Ana Pérez").and(contains("Luz").not()));
}

#[test]
fn test_invoice_pay_and_month_report() {
    let db_path = setup_test_db("cli_month_report");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "today", "--at", "10:00",
        "--service", "2",
    ])
    .assert()
    .success();

    gs().args(["--db", &db_path, "report", "month"])
        .assert()
        .success()
        .stdout(contains("Average ticket : $0.00"));

    gs().args(["--db", &db_path, "invoice", "generate", "1"])
        .assert()
        .success();
    gs().args(["--db", &db_path, "invoice", "pay", "1"])
        .assert()
        .success()
        .stdout(contains("PAID"));

    gs().args(["--db", &db_path, "report", "month"])
        .assert()
        .success()
        .stdout(
            contains("Scheduled      : 1")
                .and(contains("Paid invoices  : 1"))
                .and(contains("Average ticket : $80,000.00")),
        );

    gs().args(["--db", &db_path, "report", "day"])
        .assert()
        .success()
        .stdout(contains("Confirmed income : $80,000.00").and(contains("Expected income  : $80,000.00")));
}

#[test]
fn test_agenda_free_slots() {
    let db_path = setup_test_db("cli_agenda_slots");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "2025-09-05", "--at",
        "10:00", "--end", "11:00",
    ])
    .assert()
    .success();

    gs().args([
        "--db", &db_path, "agenda", "--date", "2025-09-05", "--slots", "--duration", "30",
    ])
    .assert()
    .success()
    .stdout(contains("11:00").and(contains("17:30")).and(contains("10:30").not()));
}

#[test]
fn test_export_clients_csv_and_json() {
    let db_path = setup_test_db("cli_export");
    init_db_with_catalogue(&db_path);

    let csv_out = temp_out("cli_export_clients", "csv");
    gs().args([
        "--db", &db_path, "export", "--what", "clients", "--format", "csv", "--file", &csv_out,
        "--force",
    ])
    .assert()
    .success()
    .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&csv_out).expect("read csv");
    assert!(content.starts_with("id,full_name,phone"));
    assert!(content.contains("Ana Pérez"));

    let json_out = temp_out("cli_export_services", "json");
    gs().args([
        "--db", &db_path, "export", "--what", "services", "--format", "json", "--file",
        &json_out, "--force",
    ])
    .assert()
    .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("read json")).expect("json");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Dye");
    assert_eq!(rows[0]["price_cents"], 8_000_000);
}

#[test]
fn test_export_rejects_relative_path() {
    let db_path = setup_test_db("cli_export_relative");
    init_db(&db_path);

    gs().args(["--db", &db_path, "export", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_catalogue(&db_path);

    gs().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(
            contains("migration_applied")
                .and(contains("client_add"))
                .and(contains("service_add")),
        );
}

#[test]
fn test_backup_compressed() {
    let db_path = setup_test_db("cli_backup");
    init_db(&db_path);

    let out = temp_out("cli_backup", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    gs().args(["--db", &db_path, "backup", "--file", &out, "--compress", "--force"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    assert!(fs::metadata(&zip).is_ok());
    assert!(fs::metadata(&out).is_err());
}

#[test]
fn test_status_changes_have_no_transition_rules() {
    let db_path = setup_test_db("cli_status");
    init_db_with_catalogue(&db_path);

    gs().args([
        "--db", &db_path, "appt", "add", "--client", "1", "--date", "2025-09-06", "--at",
        "12:00", "--service", "1",
    ])
    .assert()
    .success();

    for status in ["completed", "cancelled", "scheduled"] {
        gs().args(["--db", &db_path, "appt", "status", "1", status])
            .assert()
            .success();
    }

    gs().args(["--db", &db_path, "appt", "status", "1", "lost"])
        .assert()
        .failure()
        .stderr(contains("Invalid appointment status"));
}
