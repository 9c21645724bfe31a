//! Versioned schema migrations.
//!
//! Every migration runs inside its own transaction and is recorded in the
//! `log` table as a `migration_applied` row, so re-running is a no-op.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_initial_schema",
        description: "Created clients, services, appointments and invoices tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS clients (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name     TEXT NOT NULL,
            phone         TEXT NOT NULL,
            email         TEXT,
            address       TEXT,
            neighborhood  TEXT,
            notes         TEXT,
            is_vip        INTEGER NOT NULL DEFAULT 0,
            is_active     INTEGER NOT NULL DEFAULT 1,
            created_at    INTEGER NOT NULL,
            updated_at    INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_clients_phone ON clients(phone);
        CREATE INDEX IF NOT EXISTS idx_clients_full_name ON clients(full_name);

        CREATE TABLE IF NOT EXISTS services (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT NOT NULL,
            description       TEXT,
            duration_minutes  INTEGER NOT NULL CHECK(duration_minutes >= 0),
            price_cents       INTEGER NOT NULL CHECK(price_cents >= 0),
            is_active         INTEGER NOT NULL DEFAULT 1,
            created_at        INTEGER NOT NULL,
            updated_at        INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_services_name ON services(name);

        CREATE TABLE IF NOT EXISTS appointments (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id  INTEGER NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
            date_ms    INTEGER NOT NULL,
            start_ms   INTEGER NOT NULL,
            end_ms     INTEGER NOT NULL,
            status     TEXT NOT NULL DEFAULT 'SCHEDULED'
                       CHECK(status IN ('SCHEDULED','COMPLETED','CANCELLED')),
            notes      TEXT,
            CHECK(end_ms > start_ms)
        );
        CREATE INDEX IF NOT EXISTS idx_appointments_client ON appointments(client_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date_ms);

        CREATE TABLE IF NOT EXISTS appointment_services (
            appointment_id  INTEGER NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
            service_id      INTEGER NOT NULL REFERENCES services(id) ON DELETE RESTRICT,
            PRIMARY KEY (appointment_id, service_id)
        );
        CREATE INDEX IF NOT EXISTS idx_appointment_services_service ON appointment_services(service_id);

        CREATE TABLE IF NOT EXISTS invoices (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id    INTEGER NOT NULL REFERENCES clients(id) ON DELETE RESTRICT,
            created_at   INTEGER NOT NULL,
            status       TEXT NOT NULL DEFAULT 'DRAFT'
                         CHECK(status IN ('DRAFT','ISSUED','PAID','VOID')),
            total_cents  INTEGER NOT NULL DEFAULT 0,
            notes        TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices(client_id);
        CREATE INDEX IF NOT EXISTS idx_invoices_created ON invoices(created_at);

        CREATE TABLE IF NOT EXISTS invoice_items (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_id        INTEGER NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
            service_id        INTEGER REFERENCES services(id) ON DELETE RESTRICT,
            quantity          INTEGER NOT NULL DEFAULT 1 CHECK(quantity >= 1),
            unit_price_cents  INTEGER NOT NULL,
            description       TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_invoice_items_invoice ON invoice_items(invoice_id);
        CREATE INDEX IF NOT EXISTS idx_invoice_items_service ON invoice_items(service_id);
        "#,
    },
    Migration {
        version: "20251005_0002_appointment_range_index",
        description: "Added start/end index used by the overlap check",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_start_end ON appointments(start_ms, end_ms);
        CREATE INDEX IF NOT EXISTS idx_invoices_status_created ON invoices(status, created_at);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions not yet applied to this database.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let script = format!(
        "BEGIN;\n{}\nINSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{}', '{}');\nCOMMIT;",
        m.sql, m.version, m.description
    );

    if let Err(e) = conn.execute_batch(&script) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", m.version, e)));
    }
    Ok(())
}

/// Public entry point: run all pending migrations, returning how many ran.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    let pending = pending_migrations(conn)?;

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(pending.len())
}
