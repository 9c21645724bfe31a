use crate::cli::commands::appt::print_entries;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::db::live::LiveQuery;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::{format_ms, parse_date_arg};
use chrono::NaiveDate;
use std::thread;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Agenda {
        date,
        slots,
        duration,
        watch,
    } = cmd
    {
        let pool = DbPool::open_migrated(&cfg.database)?;
        let day = parse_date_arg(date)?;

        if *slots {
            print_slots(&pool, cfg, day, *duration)?;
        } else if *watch {
            watch_agenda(&pool, cfg, day)?;
        } else {
            header(format!("Agenda {day}"));
            print_entries(&ScheduleLogic::agenda(&pool.conn, day, day)?);
        }
    }

    Ok(())
}

fn print_slots(pool: &DbPool, cfg: &Config, day: NaiveDate, duration: i64) -> AppResult<()> {
    let free = ScheduleLogic::free_slots(pool, cfg, day, duration)?;

    header(format!("Free {duration}-minute slots on {day}"));
    if free.is_empty() {
        info("No free slots.");
        return Ok(());
    }
    let line: Vec<String> = free.iter().map(|t| t.format("%H:%M").to_string()).collect();
    println!("{}", line.join("  "));
    Ok(())
}

/// Redraw the agenda every time it changes; runs until interrupted.
fn watch_agenda(pool: &DbPool, cfg: &Config, day: NaiveDate) -> AppResult<()> {
    let mut live = LiveQuery::new(move |conn| ScheduleLogic::agenda(conn, day, day));
    let interval = Duration::from_millis(cfg.watch_interval_ms.max(100));

    loop {
        if let Some(entries) = live.poll(&pool.conn)? {
            print!("\x1b[2J\x1b[H");
            header(format!(
                "Agenda {day} (updated {})",
                format_ms(crate::utils::date::now_ms(), "%H:%M:%S")
            ));
            print_entries(entries);
            println!("\nWatching for changes… press Ctrl+C to stop.");
        }
        thread::sleep(interval);
    }
}
