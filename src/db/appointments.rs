use crate::errors::{AppError, AppResult};
use crate::models::appointment::{AgendaEntry, Appointment};
use crate::models::appointment_status::AppointmentStatus;
use crate::models::service::Service;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "a.id, a.client_id, a.date_ms, a.start_ms, a.end_ms, a.status, a.notes";

pub fn map_appointment(row: &Row) -> rusqlite::Result<Appointment> {
    let status_str: String = row.get("status")?;
    let status = AppointmentStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidAppointmentStatus(status_str.clone())),
        )
    })?;

    Ok(Appointment {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        date_ms: row.get("date_ms")?,
        start_ms: row.get("start_ms")?,
        end_ms: row.get("end_ms")?,
        status,
        notes: row.get("notes")?,
    })
}

fn map_agenda_entry(row: &Row) -> rusqlite::Result<AgendaEntry> {
    Ok(AgendaEntry {
        appointment: map_appointment(row)?,
        client_name: row.get("client_name")?,
    })
}

pub fn insert_appointment(conn: &Connection, a: &Appointment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO appointments (client_id, date_ms, start_ms, end_ms, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            a.client_id,
            a.date_ms,
            a.start_ms,
            a.end_ms,
            a.status.to_db_str(),
            a.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_appointment(conn: &Connection, a: &Appointment) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE appointments
         SET client_id = ?1, date_ms = ?2, start_ms = ?3, end_ms = ?4,
             status = ?5, notes = ?6
         WHERE id = ?7",
        params![
            a.client_id,
            a.date_ms,
            a.start_ms,
            a.end_ms,
            a.status.to_db_str(),
            a.notes,
            a.id,
        ],
    )?)
}

pub fn get_appointment(conn: &Connection, id: i64) -> AppResult<Option<Appointment>> {
    let sql = format!("SELECT {COLUMNS} FROM appointments a WHERE a.id = ?1 LIMIT 1");
    Ok(conn.query_row(&sql, [id], map_appointment).optional()?)
}

pub fn update_status(conn: &Connection, id: i64, status: AppointmentStatus) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?)
}

/// Associations are removed by `ON DELETE CASCADE`.
pub fn delete_appointment(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM appointments WHERE id = ?1", [id])?)
}

/// Count appointments whose interval strictly intersects `[start_ms, end_ms)`.
///
/// `exclude_id` skips the appointment being edited in place.
pub fn count_overlaps(
    conn: &Connection,
    start_ms: i64,
    end_ms: i64,
    exclude_id: Option<i64>,
    include_cancelled: bool,
) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE (?3 IS NULL OR id <> ?3)
           AND start_ms < ?2
           AND end_ms > ?1
           AND (?4 = 1 OR status <> 'CANCELLED')",
        params![start_ms, end_ms, exclude_id, include_cancelled as i64],
        |row| row.get(0),
    )?)
}

/// Appointments starting in `[start_ms, end_ms)`, with client names.
pub fn list_with_client_in_range(conn: &Connection, start_ms: i64, end_ms: i64) -> AppResult<Vec<AgendaEntry>> {
    let sql = format!(
        "SELECT {COLUMNS}, c.full_name AS client_name
         FROM appointments a
         INNER JOIN clients c ON c.id = a.client_id
         WHERE a.start_ms >= ?1 AND a.start_ms < ?2
         ORDER BY a.start_ms ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([start_ms, end_ms], map_agenda_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_for_client(conn: &Connection, client_id: i64) -> AppResult<Vec<Appointment>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM appointments a
         WHERE a.client_id = ?1
         ORDER BY a.start_ms DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([client_id], map_appointment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn services_for_appointment(conn: &Connection, appointment_id: i64) -> AppResult<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT s.* FROM services s
         INNER JOIN appointment_services asr ON asr.service_id = s.id
         WHERE asr.appointment_id = ?1
         ORDER BY s.name ASC",
    )?;
    let rows = stmt.query_map([appointment_id], crate::db::services::map_service)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn service_ids_for(conn: &Connection, appointment_id: i64) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT service_id FROM appointment_services
         WHERE appointment_id = ?1
         ORDER BY service_id ASC",
    )?;
    let rows = stmt.query_map([appointment_id], |row| row.get(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete-all-then-insert on an open connection or transaction.
///
/// Callers must run this inside a transaction; see
/// [`replace_services`] for the standalone atomic form.
pub fn replace_services_in(conn: &Connection, appointment_id: i64, service_ids: &[i64]) -> AppResult<()> {
    conn.execute(
        "DELETE FROM appointment_services WHERE appointment_id = ?1",
        [appointment_id],
    )?;

    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO appointment_services (appointment_id, service_id)
         VALUES (?1, ?2)",
    )?;
    for sid in service_ids {
        stmt.execute([appointment_id, *sid])?;
    }
    Ok(())
}

/// Replace the service set of an appointment as a single atomic unit.
pub fn replace_services(conn: &mut Connection, appointment_id: i64, service_ids: &[i64]) -> AppResult<()> {
    let tx = conn.transaction()?;
    replace_services_in(&tx, appointment_id, service_ids)?;
    tx.commit()?;
    Ok(())
}
