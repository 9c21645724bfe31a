use crate::config::Config;
use crate::db::clients as repo;
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::client::{Client, ClientInput};
use crate::utils::date::now_ms;
use regex::Regex;

/// Trim optional form text; blank becomes `None`.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Strip common separators and check the digit count.
pub fn normalize_phone(raw: &str, cfg: &Config) -> AppResult<String> {
    let separators = Regex::new(r"[\s\-().]").map_err(|e| AppError::Other(e.to_string()))?;
    let phone = separators.replace_all(raw.trim(), "").into_owned();

    let len = phone.chars().count();
    let all_digits = !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit());

    if !all_digits || len < cfg.phone_min_digits || len > cfg.phone_max_digits {
        return Err(AppError::InvalidPhone {
            value: raw.to_string(),
            min: cfg.phone_min_digits,
            max: cfg.phone_max_digits,
        });
    }
    Ok(phone)
}

pub struct ClientLogic;

impl ClientLogic {
    fn validate(conn: &rusqlite::Connection, input: &ClientInput, cfg: &Config, exclude: Option<i64>) -> AppResult<Client> {
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::BlankField("Full name"));
        }

        let phone = normalize_phone(&input.phone, cfg)?;
        if repo::find_phone_owner(conn, &phone, exclude)?.is_some() {
            return Err(AppError::DuplicatePhone(phone));
        }

        let now = now_ms();
        Ok(Client {
            id: exclude.unwrap_or(0),
            full_name,
            phone,
            email: clean_optional(input.email.as_deref()),
            address: clean_optional(input.address.as_deref()),
            neighborhood: clean_optional(input.neighborhood.as_deref()),
            notes: clean_optional(input.notes.as_deref()),
            is_vip: input.is_vip,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Client> {
        repo::get_client(&pool.conn, id)?.ok_or(AppError::ClientNotFound(id))
    }

    pub fn create(pool: &mut DbPool, cfg: &Config, input: &ClientInput) -> AppResult<Client> {
        let mut client = Self::validate(&pool.conn, input, cfg, None)?;
        client.id = repo::insert_client(&pool.conn, &client)?;

        record(
            &pool.conn,
            "client_add",
            &format!("client #{}", client.id),
            &format!("Added client {} ({})", client.full_name, client.phone),
        );
        Ok(client)
    }

    /// Replace every editable field. Id and creation time never change.
    pub fn update(pool: &mut DbPool, cfg: &Config, id: i64, input: &ClientInput) -> AppResult<Client> {
        let current = Self::get(pool, id)?;
        let mut client = Self::validate(&pool.conn, input, cfg, Some(id))?;
        client.created_at = current.created_at;

        repo::update_client(&pool.conn, &client)?;

        record(
            &pool.conn,
            "client_edit",
            &format!("client #{id}"),
            &format!("Updated client {}", client.full_name),
        );
        Ok(client)
    }

    /// Rejected while appointments or invoices still reference the client.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        let client = Self::get(pool, id)?;

        let (appointments, invoices) = repo::count_references(&pool.conn, id)?;
        if appointments > 0 || invoices > 0 {
            return Err(AppError::ClientInUse {
                id,
                appointments,
                invoices,
            });
        }

        repo::delete_client(&pool.conn, id)?;
        record(
            &pool.conn,
            "client_del",
            &format!("client #{id}"),
            &format!("Deleted client {}", client.full_name),
        );
        Ok(())
    }

    /// All clients, or those whose name contains `query`.
    pub fn list(pool: &DbPool, query: Option<&str>) -> AppResult<Vec<Client>> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => repo::search_clients(&pool.conn, q),
            None => repo::list_clients(&pool.conn),
        }
    }
}
