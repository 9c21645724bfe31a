use crate::cli::commands::appt::print_entries;
use crate::cli::parser::ReportCmd;
use crate::config::Config;
use crate::core::reports::ReportLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::colors::{occupancy_color, paint};
use crate::utils::date::{parse_date_arg, parse_range, today};
use crate::utils::table::Table;
use crate::utils::{format_cents, mins2readable};
use chrono::NaiveDate;

/// `YYYY-MM` → first day of that month; `None` → current month.
fn month_arg(month: Option<&str>) -> AppResult<NaiveDate> {
    match month {
        None => Ok(today()),
        Some(m) => NaiveDate::parse_from_str(&format!("{}-01", m.trim()), "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(m.to_string())),
    }
}

pub fn handle(cmd: &ReportCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open_migrated(&cfg.database)?;
    let money = |cents: i64| format_cents(cents, &cfg.currency_symbol);

    match cmd {
        ReportCmd::Day { date } => {
            let day = parse_date_arg(date)?;
            let summary = ReportLogic::day_summary(&pool.conn, day)?;

            header(format!("Day {}", summary.date));
            print_entries(&summary.appointments);
            println!();
            println!("Appointments     : {}", summary.appointments.len());
            println!("Confirmed income : {}", money(summary.confirmed_income_cents));
            println!("Expected income  : {}", money(summary.expected_income_cents));
        }
        ReportCmd::Month { month } => {
            let any_day = month_arg(month.as_deref())?;
            let m = ReportLogic::month_metrics(&pool.conn, any_day)?;

            header(format!("Month {}", any_day.format("%Y-%m")));
            println!("Scheduled      : {}", m.scheduled);
            println!("Completed      : {}", m.completed);
            println!("Cancelled      : {}", m.cancelled);
            println!("Paid invoices  : {}", m.paid_count);
            println!("Paid income    : {}", money(m.paid_total_cents));
            println!("Average ticket : {}", money(m.average_ticket_cents));
        }
        ReportCmd::Occupancy { month } => {
            let any_day = month_arg(month.as_deref())?;
            let days = ReportLogic::occupancy_by_day(&pool.conn, cfg, any_day)?;

            header(format!(
                "Occupancy {} ({}-{})",
                any_day.format("%Y-%m"),
                cfg.opening_time,
                cfg.closing_time
            ));
            let mut table = Table::new(["DATE", "BOOKED", "OCCUPANCY"]);
            for d in &days {
                let pct = format!("{:>5.1}%", d.ratio * 100.0);
                table.add_row(vec![
                    d.date.format("%Y-%m-%d %a").to_string(),
                    mins2readable(d.booked_minutes),
                    paint(&pct, occupancy_color(d.ratio)),
                ]);
            }
            print!("{}", table.render());
        }
        ReportCmd::Paid { range } => {
            let (from, to) = parse_range(range)?;
            let total = ReportLogic::paid_total(&pool.conn, from, to)?;
            header(format!("Paid income {from} → {to}"));
            println!("{}", money(total));
        }
    }

    Ok(())
}
