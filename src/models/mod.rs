pub mod appointment;
pub mod appointment_status;
pub mod client;
pub mod invoice;
pub mod invoice_status;
pub mod report;
pub mod service;
