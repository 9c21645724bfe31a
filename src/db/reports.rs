//! Read-only aggregate queries over the base tables. Ranges are half-open
//! epoch-millisecond intervals `[start_ms, end_ms)`.

use crate::errors::AppResult;
use crate::models::appointment_status::AppointmentStatus;
use rusqlite::{Connection, params};

/// Sum of PAID invoice totals created in the range.
pub fn sum_paid_in_range(conn: &Connection, start_ms: i64, end_ms: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT IFNULL(SUM(total_cents), 0) FROM invoices
         WHERE status = 'PAID' AND created_at >= ?1 AND created_at < ?2",
        [start_ms, end_ms],
        |row| row.get(0),
    )?)
}

pub fn count_paid_in_range(conn: &Connection, start_ms: i64, end_ms: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM invoices
         WHERE status = 'PAID' AND created_at >= ?1 AND created_at < ?2",
        [start_ms, end_ms],
        |row| row.get(0),
    )?)
}

/// Sum of the prices of every service booked on appointments of that day.
pub fn sum_service_prices_in_day(conn: &Connection, day_start_ms: i64, day_end_ms: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT IFNULL(SUM(s.price_cents), 0)
         FROM appointment_services asr
         INNER JOIN services s ON s.id = asr.service_id
         INNER JOIN appointments a ON a.id = asr.appointment_id
         WHERE a.date_ms >= ?1 AND a.date_ms < ?2",
        [day_start_ms, day_end_ms],
        |row| row.get(0),
    )?)
}

pub fn count_by_status_in_range(
    conn: &Connection,
    status: AppointmentStatus,
    start_ms: i64,
    end_ms: i64,
) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE status = ?1 AND start_ms >= ?2 AND start_ms < ?3",
        params![status.to_db_str(), start_ms, end_ms],
        |row| row.get(0),
    )?)
}

/// (start_ms, end_ms) of every non-cancelled appointment starting in the range.
pub fn intervals_in_range(conn: &Connection, start_ms: i64, end_ms: i64) -> AppResult<Vec<(i64, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT start_ms, end_ms FROM appointments
         WHERE start_ms >= ?1 AND start_ms < ?2 AND status <> 'CANCELLED'
         ORDER BY start_ms ASC",
    )?;
    let rows = stmt.query_map([start_ms, end_ms], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
