use super::appointment::AgendaEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// Home screen figures for a single day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub appointments: Vec<AgendaEntry>,
    pub confirmed_income_cents: i64,
    pub expected_income_cents: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MonthMetrics {
    pub scheduled: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub paid_total_cents: i64,
    pub paid_count: i64,
    pub average_ticket_cents: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayOccupancy {
    pub date: NaiveDate,
    pub booked_minutes: i64,
    /// booked / opening minutes, clamped to [0, 1]
    pub ratio: f64,
}
