use super::appointment_status::AppointmentStatus;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub date_ms: i64,  // local midnight of the appointment day
    pub start_ms: i64, // absolute start
    pub end_ms: i64,   // absolute end, always > start_ms
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_ms - self.start_ms).max(0) / 60_000
    }

    /// Strict interval intersection; touching intervals do not overlap.
    pub fn overlaps(&self, start_ms: i64, end_ms: i64) -> bool {
        self.start_ms < end_ms && self.end_ms > start_ms
    }
}

/// Agenda row: an appointment joined with its client's name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgendaEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
}
