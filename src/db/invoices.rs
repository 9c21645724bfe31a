use crate::errors::{AppError, AppResult};
use crate::models::invoice::{Invoice, InvoiceItem, NewInvoiceItem};
use crate::models::invoice_status::InvoiceStatus;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, client_id, created_at, status, total_cents, notes";

pub fn map_invoice(row: &Row) -> rusqlite::Result<Invoice> {
    let status_str: String = row.get("status")?;
    let status = InvoiceStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInvoiceStatus(status_str.clone())),
        )
    })?;

    Ok(Invoice {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        created_at: row.get("created_at")?,
        status,
        total_cents: row.get("total_cents")?,
        notes: row.get("notes")?,
    })
}

pub fn map_item(row: &Row) -> rusqlite::Result<InvoiceItem> {
    Ok(InvoiceItem {
        id: row.get("id")?,
        invoice_id: row.get("invoice_id")?,
        service_id: row.get("service_id")?,
        quantity: row.get("quantity")?,
        unit_price_cents: row.get("unit_price_cents")?,
        description: row.get("description")?,
    })
}

fn collect_invoices(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> AppResult<Vec<Invoice>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, map_invoice)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_invoice(conn: &Connection, inv: &Invoice) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO invoices (client_id, created_at, status, total_cents, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            inv.client_id,
            inv.created_at,
            inv.status.to_db_str(),
            inv.total_cents,
            inv.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_items(conn: &Connection, invoice_id: i64, items: &[NewInvoiceItem]) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO invoice_items (invoice_id, service_id, quantity, unit_price_cents, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for it in items {
        stmt.execute(params![
            invoice_id,
            it.service_id,
            it.quantity,
            it.unit_price_cents,
            it.description,
        ])?;
    }
    Ok(())
}

pub fn get_invoice(conn: &Connection, id: i64) -> AppResult<Option<Invoice>> {
    let sql = format!("SELECT {COLUMNS} FROM invoices WHERE id = ?1 LIMIT 1");
    Ok(conn.query_row(&sql, [id], map_invoice).optional()?)
}

pub fn items_for_invoice(conn: &Connection, invoice_id: i64) -> AppResult<Vec<InvoiceItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, invoice_id, service_id, quantity, unit_price_cents, description
         FROM invoice_items WHERE invoice_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([invoice_id], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_status(conn: &Connection, id: i64, status: InvoiceStatus) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE invoices SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?)
}

pub fn add_to_total(conn: &Connection, id: i64, delta_cents: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE invoices SET total_cents = total_cents + ?1 WHERE id = ?2",
        params![delta_cents, id],
    )?)
}

/// Rewrite `total_cents` from the items; returns the new total.
pub fn recompute_total(conn: &Connection, id: i64) -> AppResult<i64> {
    conn.execute(
        "UPDATE invoices
         SET total_cents = (SELECT IFNULL(SUM(unit_price_cents * quantity), 0)
                            FROM invoice_items WHERE invoice_id = ?1)
         WHERE id = ?1",
        [id],
    )?;
    Ok(conn.query_row(
        "SELECT total_cents FROM invoices WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?)
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<Invoice>> {
    let sql = format!("SELECT {COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC");
    collect_invoices(conn, &sql, params![])
}

pub fn list_by_client(conn: &Connection, client_id: i64) -> AppResult<Vec<Invoice>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM invoices WHERE client_id = ?1
         ORDER BY created_at DESC, id DESC"
    );
    collect_invoices(conn, &sql, [client_id])
}

pub fn list_by_range(conn: &Connection, start_ms: i64, end_ms: i64) -> AppResult<Vec<Invoice>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM invoices
         WHERE created_at >= ?1 AND created_at < ?2
         ORDER BY created_at DESC, id DESC"
    );
    collect_invoices(conn, &sql, [start_ms, end_ms])
}
