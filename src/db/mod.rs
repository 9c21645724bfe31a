pub mod appointments;
pub mod clients;
pub mod invoices;
pub mod live;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod reports;
pub mod services;
pub mod stats;
