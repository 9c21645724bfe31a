/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::appointment_status::AppointmentStatus;
use crate::models::invoice_status::InvoiceStatus;

pub fn appointment_status_color(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => BLUE,
        AppointmentStatus::Completed => GREEN,
        AppointmentStatus::Cancelled => GREY,
    }
}

pub fn invoice_status_color(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Draft => YELLOW,
        InvoiceStatus::Issued => BLUE,
        InvoiceStatus::Paid => GREEN,
        InvoiceStatus::Void => RED,
    }
}

/// Occupancy ratio colour: busy days stand out.
pub fn occupancy_color(ratio: f64) -> &'static str {
    if ratio >= 0.9 {
        RED
    } else if ratio >= 0.5 {
        YELLOW
    } else if ratio > 0.0 {
        GREEN
    } else {
        GREY
    }
}

pub fn paint(text: &str, color: &str) -> String {
    format!("{color}{text}{RESET}")
}
