pub mod backup;
pub mod billing;
pub mod clients;
pub mod log;
pub mod reports;
pub mod schedule;
pub mod services;
