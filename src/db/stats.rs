use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

const TABLES: &[&str] = &[
    "clients",
    "services",
    "appointments",
    "appointment_services",
    "invoices",
    "invoice_items",
    "log",
];

/// Row count per table, in a fixed order.
pub fn table_counts(pool: &DbPool) -> AppResult<Vec<(&'static str, i64)>> {
    let mut out = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let count: i64 = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        out.push((*table, count));
    }
    Ok(out)
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    println!("{}• Rows:{}", CYAN, RESET);
    for (table, count) in table_counts(pool)? {
        println!("    {:<22} {}{}{}", table, GREEN, count, RESET);
    }

    let first: Option<i64> = pool
        .conn
        .query_row("SELECT MIN(start_ms) FROM appointments", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last: Option<i64> = pool
        .conn
        .query_row("SELECT MAX(start_ms) FROM appointments", [], |row| row.get(0))
        .optional()?
        .flatten();

    let fmt = |v: Option<i64>| match v {
        Some(ms) => crate::utils::date::format_ms(ms, "%Y-%m-%d"),
        None => format!("{GREY}--{RESET}"),
    };

    println!("{}• Appointments range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    println!();
    Ok(())
}
