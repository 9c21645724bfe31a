use crate::errors::AppResult;
use crate::models::service::Service;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str =
    "id, name, description, duration_minutes, price_cents, is_active, created_at, updated_at";

pub fn map_service(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        duration_minutes: row.get("duration_minutes")?,
        price_cents: row.get("price_cents")?,
        is_active: row.get::<_, i64>("is_active")? == 1,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn collect(conn: &Connection, sql: &str, query: Option<&str>) -> AppResult<Vec<Service>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = match query {
        Some(q) => stmt.query_map([q], map_service)?,
        None => stmt.query_map([], map_service)?,
    };

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_service(conn: &Connection, s: &Service) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO services (name, description, duration_minutes, price_cents,
                               is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            s.name,
            s.description,
            s.duration_minutes,
            s.price_cents,
            s.is_active as i64,
            s.created_at,
            s.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_service(conn: &Connection, s: &Service) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE services
         SET name = ?1, description = ?2, duration_minutes = ?3,
             price_cents = ?4, is_active = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            s.name,
            s.description,
            s.duration_minutes,
            s.price_cents,
            s.is_active as i64,
            s.updated_at,
            s.id,
        ],
    )?)
}

pub fn get_service(conn: &Connection, id: i64) -> AppResult<Option<Service>> {
    let sql = format!("SELECT {COLUMNS} FROM services WHERE id = ?1 LIMIT 1");
    Ok(conn.query_row(&sql, [id], map_service).optional()?)
}

pub fn list_active(conn: &Connection) -> AppResult<Vec<Service>> {
    let sql = format!("SELECT {COLUMNS} FROM services WHERE is_active = 1 ORDER BY name ASC");
    collect(conn, &sql, None)
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<Service>> {
    let sql = format!("SELECT {COLUMNS} FROM services ORDER BY name ASC");
    collect(conn, &sql, None)
}

pub fn search_services(conn: &Connection, query: &str) -> AppResult<Vec<Service>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM services
         WHERE name LIKE '%' || ?1 || '%'
         ORDER BY name ASC"
    );
    collect(conn, &sql, Some(query.trim()))
}

pub fn find_name_owner(conn: &Connection, name: &str, exclude_id: Option<i64>) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM services
             WHERE name = ?1 AND (?2 IS NULL OR id <> ?2)
             LIMIT 1",
            params![name, exclude_id],
            |row| row.get(0),
        )
        .optional()?)
}

/// (appointment associations, invoice items) referencing the service.
pub fn count_usage(conn: &Connection, id: i64) -> AppResult<(i64, i64)> {
    Ok(conn.query_row(
        "SELECT (SELECT COUNT(*) FROM appointment_services WHERE service_id = ?1),
                (SELECT COUNT(*) FROM invoice_items WHERE service_id = ?1)",
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?)
}

pub fn set_active(conn: &Connection, id: i64, active: bool, now: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE services SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
        params![active as i64, now, id],
    )?)
}

pub fn delete_service(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM services WHERE id = ?1", [id])?)
}
