//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError so that the CLI can
//! report every failure the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid appointment status: {0}")]
    InvalidAppointmentStatus(String),

    #[error("Invalid invoice status: {0}")]
    InvalidInvoiceStatus(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("Phone must contain {min} to {max} digits (got '{value}')")]
    InvalidPhone { value: String, min: usize, max: usize },

    #[error("Duration must be between {min} and {max} minutes (got {value})")]
    InvalidDuration { value: i64, min: i64, max: i64 },

    #[error("Quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    #[error("Appointment must end after it starts ({start} - {end})")]
    InvalidInterval { start: String, end: String },

    // ---------------------------
    // Lookup / integrity errors
    // ---------------------------
    #[error("Client #{0} not found")]
    ClientNotFound(i64),

    #[error("Service #{0} not found")]
    ServiceNotFound(i64),

    #[error("Appointment #{0} not found")]
    AppointmentNotFound(i64),

    #[error("Invoice #{0} not found")]
    InvoiceNotFound(i64),

    #[error("A client with phone {0} already exists")]
    DuplicatePhone(String),

    #[error("A service named '{0}' already exists")]
    DuplicateServiceName(String),

    #[error(
        "Service #{id} cannot be deleted: used by {appointments} appointment(s) and {invoice_items} invoice item(s)"
    )]
    ServiceInUse {
        id: i64,
        appointments: i64,
        invoice_items: i64,
    },

    #[error(
        "Client #{id} cannot be deleted: referenced by {appointments} appointment(s) and {invoices} invoice(s)"
    )]
    ClientInUse {
        id: i64,
        appointments: i64,
        invoices: i64,
    },

    // ---------------------------
    // Scheduling
    // ---------------------------
    #[error("Time slot {start} - {end} overlaps {count} existing appointment(s)")]
    SlotConflict {
        start: String,
        end: String,
        count: i64,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
