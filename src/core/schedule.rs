use crate::config::Config;
use crate::core::clients::clean_optional;
use crate::db::appointments as repo;
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::db::{clients, services};
use crate::errors::{AppError, AppResult};
use crate::models::appointment::{AgendaEntry, Appointment};
use crate::models::appointment_status::AppointmentStatus;
use crate::models::client::Client;
use crate::models::service::Service;
use crate::utils::date::{self, format_ms};
use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};

/// Result of a save attempt. A conflict is an expected outcome, not an error:
/// nothing was written and the caller decides how to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(i64),
    Conflict(i64),
}

#[derive(Debug, Clone)]
pub struct AppointmentRequest {
    pub client_id: i64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    /// Defaults to start + the summed duration of the selected services.
    pub end: Option<NaiveTime>,
    pub service_ids: Vec<i64>,
    pub notes: Option<String>,
}

/// Full appointment view: the row, its client and its services.
#[derive(Debug, Clone)]
pub struct AppointmentDetail {
    pub appointment: Appointment,
    pub client: Client,
    pub services: Vec<Service>,
}

impl AppointmentDetail {
    pub fn services_total_cents(&self) -> i64 {
        self.services.iter().map(|s| s.price_cents).sum()
    }
}

fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Resolve the request into absolute `(date_ms, start_ms, end_ms)`.
    pub fn resolve_interval(conn: &Connection, req: &AppointmentRequest) -> AppResult<(i64, i64, i64)> {
        let mut total_minutes = 0;
        for sid in &req.service_ids {
            let service = services::get_service(conn, *sid)?.ok_or(AppError::ServiceNotFound(*sid))?;
            total_minutes += service.duration_minutes;
        }

        let date_ms = date::day_start_ms(req.date)?;
        let start_ms = date::local_ms(req.date, req.start)?;
        let end_ms = match req.end {
            Some(end) => date::local_ms(req.date, end)?,
            None => start_ms + Duration::minutes(total_minutes).num_milliseconds(),
        };

        if end_ms <= start_ms {
            return Err(AppError::InvalidInterval {
                start: format_ms(start_ms, "%Y-%m-%d %H:%M"),
                end: format_ms(end_ms, "%Y-%m-%d %H:%M"),
            });
        }
        Ok((date_ms, start_ms, end_ms))
    }

    /// Number of existing appointments intersecting the candidate interval.
    pub fn count_conflicts(
        conn: &Connection,
        cfg: &Config,
        start_ms: i64,
        end_ms: i64,
        exclude_id: Option<i64>,
    ) -> AppResult<i64> {
        repo::count_overlaps(conn, start_ms, end_ms, exclude_id, cfg.cancelled_blocks_slot)
    }

    /// Insert or update (when `existing` is set) plus service replacement,
    /// all inside one IMMEDIATE transaction so the overlap check and the
    /// write see the same data.
    fn save(pool: &mut DbPool, cfg: &Config, existing: Option<&Appointment>, req: &AppointmentRequest) -> AppResult<SaveOutcome> {
        if clients::get_client(&pool.conn, req.client_id)?.is_none() {
            return Err(AppError::ClientNotFound(req.client_id));
        }

        let service_ids = dedup_ids(&req.service_ids);
        let req = AppointmentRequest {
            service_ids,
            ..req.clone()
        };

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let (date_ms, start_ms, end_ms) = Self::resolve_interval(&tx, &req)?;
        let exclude = existing.map(|a| a.id);

        let conflicts = Self::count_conflicts(&tx, cfg, start_ms, end_ms, exclude)?;
        if conflicts > 0 {
            tx.rollback()?;
            return Ok(SaveOutcome::Conflict(conflicts));
        }

        let mut appt = Appointment {
            id: exclude.unwrap_or(0),
            client_id: req.client_id,
            date_ms,
            start_ms,
            end_ms,
            status: existing
                .map(|a| a.status)
                .unwrap_or(AppointmentStatus::Scheduled),
            notes: clean_optional(req.notes.as_deref()),
        };

        if existing.is_some() {
            repo::update_appointment(&tx, &appt)?;
        } else {
            appt.id = repo::insert_appointment(&tx, &appt)?;
        }
        repo::replace_services_in(&tx, appt.id, &req.service_ids)?;
        tx.commit()?;

        record(
            &pool.conn,
            if existing.is_some() { "appt_edit" } else { "appt_add" },
            &format!("appointment #{}", appt.id),
            &format!(
                "{} - {} for client #{} ({} service(s))",
                format_ms(start_ms, "%Y-%m-%d %H:%M"),
                format_ms(end_ms, "%H:%M"),
                appt.client_id,
                req.service_ids.len()
            ),
        );

        Ok(SaveOutcome::Saved(appt.id))
    }

    pub fn create(pool: &mut DbPool, cfg: &Config, req: &AppointmentRequest) -> AppResult<SaveOutcome> {
        Self::save(pool, cfg, None, req)
    }

    /// Move or re-book an appointment; it never conflicts with itself.
    pub fn reschedule(pool: &mut DbPool, cfg: &Config, id: i64, req: &AppointmentRequest) -> AppResult<SaveOutcome> {
        let current = Self::get(pool, id)?;
        Self::save(pool, cfg, Some(&current), req)
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Appointment> {
        repo::get_appointment(&pool.conn, id)?.ok_or(AppError::AppointmentNotFound(id))
    }

    pub fn detail(pool: &DbPool, id: i64) -> AppResult<AppointmentDetail> {
        let appointment = Self::get(pool, id)?;
        let client = clients::get_client(&pool.conn, appointment.client_id)?
            .ok_or(AppError::ClientNotFound(appointment.client_id))?;
        let services = repo::services_for_appointment(&pool.conn, id)?;
        Ok(AppointmentDetail {
            appointment,
            client,
            services,
        })
    }

    /// No transition rules: any status may follow any other.
    pub fn set_status(pool: &mut DbPool, id: i64, status: AppointmentStatus) -> AppResult<()> {
        let current = Self::get(pool, id)?;
        repo::update_status(&pool.conn, id, status)?;
        record(
            &pool.conn,
            "appt_status",
            &format!("appointment #{id}"),
            &format!("{} → {}", current.status, status),
        );
        Ok(())
    }

    pub fn replace_services(pool: &mut DbPool, id: i64, service_ids: &[i64]) -> AppResult<()> {
        Self::get(pool, id)?;
        let ids = dedup_ids(service_ids);
        for sid in &ids {
            if services::get_service(&pool.conn, *sid)?.is_none() {
                return Err(AppError::ServiceNotFound(*sid));
            }
        }
        repo::replace_services(&mut pool.conn, id, &ids)?;
        record(
            &pool.conn,
            "appt_services",
            &format!("appointment #{id}"),
            &format!("Services set to {:?}", ids),
        );
        Ok(())
    }

    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        Self::get(pool, id)?;
        repo::delete_appointment(&pool.conn, id)?;
        record(&pool.conn, "appt_del", &format!("appointment #{id}"), "Appointment deleted");
        Ok(())
    }

    /// Appointments of an inclusive date interval, with client names.
    pub fn agenda(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<AgendaEntry>> {
        let (start, end) = date::range_bounds(from, to)?;
        repo::list_with_client_in_range(conn, start, end)
    }

    /// Start times between opening and closing, every `slot_minutes`, where an
    /// appointment of `duration_minutes` would fit without conflicts.
    pub fn free_slots(pool: &DbPool, cfg: &Config, day: NaiveDate, duration_minutes: i64) -> AppResult<Vec<NaiveTime>> {
        let opening = cfg.opening()?;
        let closing = cfg.closing()?;
        let step = minutes_within_day(cfg.slot_minutes)?;
        let length = minutes_within_day(duration_minutes)?;

        let booked: Vec<Appointment> = Self::agenda(&pool.conn, day, day)?
            .into_iter()
            .map(|e| e.appointment)
            .filter(|a| cfg.cancelled_blocks_slot || a.status != AppointmentStatus::Cancelled)
            .collect();

        let mut out = Vec::new();
        let mut t = opening;
        while closing.signed_duration_since(t) >= length {
            let start_ms = date::local_ms(day, t)?;
            let end_ms = start_ms + length.num_milliseconds();
            if !booked.iter().any(|a| a.overlaps(start_ms, end_ms)) {
                out.push(t);
            }

            let next = t + step;
            if next <= t {
                break; // wrapped past midnight
            }
            t = next;
        }
        Ok(out)
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

fn minutes_within_day(minutes: i64) -> AppResult<Duration> {
    if !(1..=MINUTES_PER_DAY).contains(&minutes) {
        return Err(AppError::InvalidDuration {
            value: minutes,
            min: 1,
            max: MINUTES_PER_DAY,
        });
    }
    Ok(Duration::minutes(minutes))
}
