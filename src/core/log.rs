use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 40;

/// Colour of an operation family (`client_*`, `appt_*`, ...).
fn color_for_operation(op: &str) -> Colour {
    match op.split('_').next().unwrap_or(op) {
        "client" => Colour::Cyan,
        "service" => Colour::Blue,
        "appt" => Colour::Green,
        "invoice" => Colour::Yellow,
        "backup" | "export" => Colour::Purple,
        "migration" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;
        let mut entries = load_log(&pool.conn, limit)?;
        entries.reverse();

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        for e in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(e.date.clone());

            let mut op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };
            if op_target.chars().count() > OP_WIDTH {
                op_target = op_target.chars().take(OP_WIDTH - 3).collect::<String>() + "...";
            }
            let padding = " ".repeat(OP_WIDTH.saturating_sub(op_target.chars().count()));

            let colored = match op_target.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color_for_operation(&e.operation).paint(op), rest),
                None => color_for_operation(&e.operation).paint(op_target.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                e.id,
                date,
                colored,
                padding,
                ansi.replace_all(&e.message, ""),
                id_w = id_w
            );
        }

        Ok(())
    }
}
