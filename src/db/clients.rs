use crate::errors::AppResult;
use crate::models::client::Client;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, full_name, phone, email, address, neighborhood, notes,
                       is_vip, is_active, created_at, updated_at";

pub fn map_client(row: &Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        address: row.get("address")?,
        neighborhood: row.get("neighborhood")?,
        notes: row.get("notes")?,
        is_vip: row.get::<_, i64>("is_vip")? == 1,
        is_active: row.get::<_, i64>("is_active")? == 1,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Insert a client, ignoring `c.id`. Returns the new id.
pub fn insert_client(conn: &Connection, c: &Client) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO clients (full_name, phone, email, address, neighborhood, notes,
                              is_vip, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            c.full_name,
            c.phone,
            c.email,
            c.address,
            c.neighborhood,
            c.notes,
            c.is_vip as i64,
            c.is_active as i64,
            c.created_at,
            c.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update every field except `id` and `created_at`.
pub fn update_client(conn: &Connection, c: &Client) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE clients
         SET full_name = ?1, phone = ?2, email = ?3, address = ?4,
             neighborhood = ?5, notes = ?6, is_vip = ?7, is_active = ?8,
             updated_at = ?9
         WHERE id = ?10",
        params![
            c.full_name,
            c.phone,
            c.email,
            c.address,
            c.neighborhood,
            c.notes,
            c.is_vip as i64,
            c.is_active as i64,
            c.updated_at,
            c.id,
        ],
    )?;
    Ok(n)
}

pub fn get_client(conn: &Connection, id: i64) -> AppResult<Option<Client>> {
    let sql = format!("SELECT {COLUMNS} FROM clients WHERE id = ?1 LIMIT 1");
    Ok(conn.query_row(&sql, [id], map_client).optional()?)
}

pub fn list_clients(conn: &Connection) -> AppResult<Vec<Client>> {
    let sql = format!("SELECT {COLUMNS} FROM clients ORDER BY full_name ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_client)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Case-insensitive substring match on the full name.
pub fn search_clients(conn: &Connection, query: &str) -> AppResult<Vec<Client>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM clients
         WHERE full_name LIKE '%' || ?1 || '%'
         ORDER BY full_name ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([query.trim()], map_client)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Id of another client already using `phone`.
pub fn find_phone_owner(conn: &Connection, phone: &str, exclude_id: Option<i64>) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM clients
             WHERE phone = ?1 AND (?2 IS NULL OR id <> ?2)
             LIMIT 1",
            params![phone, exclude_id],
            |row| row.get(0),
        )
        .optional()?)
}

/// (appointments, invoices) referencing the client.
pub fn count_references(conn: &Connection, id: i64) -> AppResult<(i64, i64)> {
    Ok(conn.query_row(
        "SELECT (SELECT COUNT(*) FROM appointments WHERE client_id = ?1),
                (SELECT COUNT(*) FROM invoices WHERE client_id = ?1)",
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?)
}

pub fn delete_client(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM clients WHERE id = ?1", [id])?)
}
