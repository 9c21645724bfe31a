use crate::config::Config;
use crate::core::clients::clean_optional;
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::db::services as repo;
use crate::errors::{AppError, AppResult};
use crate::models::service::{Service, ServiceInput};
use crate::utils::date::now_ms;
use crate::utils::money::parse_major_units;

pub struct ServiceLogic;

impl ServiceLogic {
    fn validate(pool: &DbPool, cfg: &Config, input: &ServiceInput, exclude: Option<i64>) -> AppResult<Service> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BlankField("Service name"));
        }

        if input.duration_minutes < cfg.min_service_minutes
            || input.duration_minutes > cfg.max_service_minutes
        {
            return Err(AppError::InvalidDuration {
                value: input.duration_minutes,
                min: cfg.min_service_minutes,
                max: cfg.max_service_minutes,
            });
        }

        let price_cents = parse_major_units(&input.price)?;

        if repo::find_name_owner(&pool.conn, &name, exclude)?.is_some() {
            return Err(AppError::DuplicateServiceName(name));
        }

        let now = now_ms();
        Ok(Service {
            id: exclude.unwrap_or(0),
            name,
            description: clean_optional(input.description.as_deref()),
            duration_minutes: input.duration_minutes,
            price_cents,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Service> {
        repo::get_service(&pool.conn, id)?.ok_or(AppError::ServiceNotFound(id))
    }

    pub fn create(pool: &mut DbPool, cfg: &Config, input: &ServiceInput) -> AppResult<Service> {
        let mut service = Self::validate(pool, cfg, input, None)?;
        service.id = repo::insert_service(&pool.conn, &service)?;

        record(
            &pool.conn,
            "service_add",
            &format!("service #{}", service.id),
            &format!("Added service {} ({} cents)", service.name, service.price_cents),
        );
        Ok(service)
    }

    pub fn update(pool: &mut DbPool, cfg: &Config, id: i64, input: &ServiceInput) -> AppResult<Service> {
        let current = Self::get(pool, id)?;
        let mut service = Self::validate(pool, cfg, input, Some(id))?;
        service.created_at = current.created_at;

        repo::update_service(&pool.conn, &service)?;

        record(
            &pool.conn,
            "service_edit",
            &format!("service #{id}"),
            &format!("Updated service {}", service.name),
        );
        Ok(service)
    }

    /// Hide a service from booking without breaking history.
    pub fn set_active(pool: &mut DbPool, id: i64, active: bool) -> AppResult<()> {
        Self::get(pool, id)?;
        repo::set_active(&pool.conn, id, active, now_ms())?;
        record(
            &pool.conn,
            if active { "service_activate" } else { "service_deactivate" },
            &format!("service #{id}"),
            if active { "Service activated" } else { "Service deactivated" },
        );
        Ok(())
    }

    /// Restrict-on-delete: a service referenced by an appointment or an
    /// invoice item cannot be removed.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        let service = Self::get(pool, id)?;

        let (appointments, invoice_items) = repo::count_usage(&pool.conn, id)?;
        if appointments > 0 || invoice_items > 0 {
            return Err(AppError::ServiceInUse {
                id,
                appointments,
                invoice_items,
            });
        }

        repo::delete_service(&pool.conn, id)?;
        record(
            &pool.conn,
            "service_del",
            &format!("service #{id}"),
            &format!("Deleted service {}", service.name),
        );
        Ok(())
    }

    pub fn list(pool: &DbPool, query: Option<&str>, include_inactive: bool) -> AppResult<Vec<Service>> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => repo::search_services(&pool.conn, q),
            None if include_inactive => repo::list_all(&pool.conn),
            None => repo::list_active(&pool.conn),
        }
    }
}
