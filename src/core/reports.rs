use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::db::reports as repo;
use crate::errors::AppResult;
use crate::models::appointment_status::AppointmentStatus;
use crate::models::report::{DayOccupancy, DaySummary, MonthMetrics};
use crate::utils::date;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// `sum / count`, or 0 when nothing was paid.
pub fn average_ticket(sum_cents: i64, count: i64) -> i64 {
    if count > 0 { sum_cents / count } else { 0 }
}

pub struct ReportLogic;

impl ReportLogic {
    pub fn paid_total(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<i64> {
        let (start, end) = date::range_bounds(from, to)?;
        repo::sum_paid_in_range(conn, start, end)
    }

    /// Revenue expected from the services booked on `day`.
    pub fn expected_for_day(conn: &Connection, day: NaiveDate) -> AppResult<i64> {
        let (start, end) = date::day_bounds(day)?;
        repo::sum_service_prices_in_day(conn, start, end)
    }

    pub fn day_summary(conn: &Connection, day: NaiveDate) -> AppResult<DaySummary> {
        Ok(DaySummary {
            date: day,
            appointments: ScheduleLogic::agenda(conn, day, day)?,
            confirmed_income_cents: Self::paid_total(conn, day, day)?,
            expected_income_cents: Self::expected_for_day(conn, day)?,
        })
    }

    /// Figures for the calendar month containing `any_day`.
    pub fn month_metrics(conn: &Connection, any_day: NaiveDate) -> AppResult<MonthMetrics> {
        let (start, end) = date::month_bounds(any_day)?;

        let paid_total_cents = repo::sum_paid_in_range(conn, start, end)?;
        let paid_count = repo::count_paid_in_range(conn, start, end)?;

        Ok(MonthMetrics {
            scheduled: repo::count_by_status_in_range(conn, AppointmentStatus::Scheduled, start, end)?,
            completed: repo::count_by_status_in_range(conn, AppointmentStatus::Completed, start, end)?,
            cancelled: repo::count_by_status_in_range(conn, AppointmentStatus::Cancelled, start, end)?,
            paid_total_cents,
            paid_count,
            average_ticket_cents: average_ticket(paid_total_cents, paid_count),
        })
    }

    /// Booked minutes per day of the month over the opening hours.
    pub fn occupancy_by_day(conn: &Connection, cfg: &Config, any_day: NaiveDate) -> AppResult<Vec<DayOccupancy>> {
        let (start, end) = date::month_bounds(any_day)?;
        let open_minutes = cfg.opening_minutes()?;

        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for (s, e) in repo::intervals_in_range(conn, start, end)? {
            let day = date::from_ms(s)?.date_naive();
            *per_day.entry(day).or_insert(0) += (e - s).max(0) / 60_000;
        }

        Ok(date::days_of_month(any_day)
            .into_iter()
            .map(|d| {
                let booked_minutes = per_day.get(&d).copied().unwrap_or(0);
                DayOccupancy {
                    date: d,
                    booked_minutes,
                    ratio: (booked_minutes as f64 / open_minutes as f64).clamp(0.0, 1.0),
                }
            })
            .collect())
    }
}
