pub mod agenda;
pub mod appt;
pub mod backup;
pub mod client;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod invoice;
pub mod log;
pub mod report;
pub mod service;
