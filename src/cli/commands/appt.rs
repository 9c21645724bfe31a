use crate::cli::parser::ApptCmd;
use crate::config::Config;
use crate::core::clients::ClientLogic;
use crate::core::schedule::{AppointmentRequest, SaveOutcome, ScheduleLogic};
use crate::db::appointments::{list_for_client, service_ids_for};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::appointment::AgendaEntry;
use crate::models::appointment_status::AppointmentStatus;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{appointment_status_color, paint};
use crate::utils::date::{format_ms, from_ms, parse_date_arg, parse_range, today};
use crate::utils::table::Table;
use crate::utils::time::{parse_optional_time, parse_time_arg};
use crate::utils::{format_cents, mins2readable};
use chrono::Duration;

pub fn handle(cmd: &ApptCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open_migrated(&cfg.database)?;

    match cmd {
        ApptCmd::Add {
            client,
            date,
            start,
            end,
            services,
            notes,
        } => {
            let req = AppointmentRequest {
                client_id: *client,
                date: parse_date_arg(date)?,
                start: parse_time_arg(start)?,
                end: parse_optional_time(end.as_ref())?,
                service_ids: services.clone(),
                notes: notes.clone(),
            };
            let outcome = ScheduleLogic::create(&mut pool, cfg, &req)?;
            let id = saved_or_conflict(&pool, &req, outcome)?;
            success(format!("Appointment #{id} booked."));
            print_detail(&pool, cfg, id)?;
        }
        ApptCmd::Edit {
            id,
            client,
            date,
            start,
            end,
            services,
            clear_services,
            notes,
        } => {
            let current = ScheduleLogic::get(&pool, *id)?;
            let begins = from_ms(current.start_ms)?;

            let new_start = match start {
                Some(s) => parse_time_arg(s)?,
                None => begins.time(),
            };
            let replaced = *clear_services || !services.is_empty();
            let service_ids = if *clear_services {
                Vec::new()
            } else if !services.is_empty() {
                services.clone()
            } else {
                service_ids_for(&pool.conn, *id)?
            };

            // Explicit end wins; new services set the length; otherwise the
            // appointment keeps its current length.
            let new_end = match end {
                Some(e) => Some(parse_time_arg(e)?),
                None if replaced && !service_ids.is_empty() => None,
                None => Some(new_start + Duration::minutes(current.duration_minutes())),
            };

            let req = AppointmentRequest {
                client_id: client.unwrap_or(current.client_id),
                date: match date {
                    Some(d) => parse_date_arg(d)?,
                    None => begins.date_naive(),
                },
                start: new_start,
                end: new_end,
                service_ids,
                notes: notes.clone().or(current.notes.clone()),
            };
            let outcome = ScheduleLogic::reschedule(&mut pool, cfg, *id, &req)?;
            saved_or_conflict(&pool, &req, outcome)?;
            success(format!("Appointment #{id} updated."));
            print_detail(&pool, cfg, *id)?;
        }
        ApptCmd::Show { id } => print_detail(&pool, cfg, *id)?,
        ApptCmd::List {
            date,
            range,
            client,
        } => {
            let entries = match (client, range, date) {
                (Some(cid), _, _) => {
                    let c = ClientLogic::get(&pool, *cid)?;
                    list_for_client(&pool.conn, *cid)?
                        .into_iter()
                        .map(|appointment| AgendaEntry {
                            appointment,
                            client_name: c.full_name.clone(),
                        })
                        .collect()
                }
                (None, Some(r), _) => {
                    let (from, to) = parse_range(r)?;
                    ScheduleLogic::agenda(&pool.conn, from, to)?
                }
                (None, None, Some(d)) => {
                    let day = parse_date_arg(d)?;
                    ScheduleLogic::agenda(&pool.conn, day, day)?
                }
                (None, None, None) => ScheduleLogic::agenda(&pool.conn, today(), today())?,
            };
            print_entries(&entries);
        }
        ApptCmd::Status { id, status } => {
            let status: AppointmentStatus = status.parse()?;
            ScheduleLogic::set_status(&mut pool, *id, status)?;
            success(format!("Appointment #{id} is now {status}."));
        }
        ApptCmd::Services { id, services } => {
            ScheduleLogic::replace_services(&mut pool, *id, services)?;
            success(format!("Appointment #{id}: {} service(s) set.", services.len()));
        }
        ApptCmd::Del { id } => {
            ScheduleLogic::delete(&mut pool, *id)?;
            success(format!("Appointment #{id} deleted."));
        }
    }

    Ok(())
}

/// Turn a conflict outcome into the user-facing error.
fn saved_or_conflict(pool: &DbPool, req: &AppointmentRequest, outcome: SaveOutcome) -> AppResult<i64> {
    match outcome {
        SaveOutcome::Saved(id) => Ok(id),
        SaveOutcome::Conflict(count) => {
            let (_, start_ms, end_ms) = ScheduleLogic::resolve_interval(&pool.conn, req)?;
            Err(AppError::SlotConflict {
                start: format_ms(start_ms, "%Y-%m-%d %H:%M"),
                end: format_ms(end_ms, "%H:%M"),
                count,
            })
        }
    }
}

pub(crate) fn print_entries(entries: &[AgendaEntry]) {
    if entries.is_empty() {
        info("No appointments found.");
        return;
    }

    let mut table = Table::new(["ID", "DATE", "TIME", "CLIENT", "STATUS", "NOTES"]);
    for e in entries {
        let a = &e.appointment;
        table.add_row(vec![
            a.id.to_string(),
            format_ms(a.start_ms, "%Y-%m-%d"),
            format!(
                "{}-{}",
                format_ms(a.start_ms, "%H:%M"),
                format_ms(a.end_ms, "%H:%M")
            ),
            e.client_name.clone(),
            paint(a.status.to_db_str(), appointment_status_color(a.status)),
            a.notes.clone().unwrap_or_default(),
        ]);
    }
    print!("{}", table.render());
}

fn print_detail(pool: &DbPool, cfg: &Config, id: i64) -> AppResult<()> {
    let d = ScheduleLogic::detail(pool, id)?;
    let a = &d.appointment;

    header(format!("Appointment #{}", a.id));
    println!("Client   : #{} {} ({})", d.client.id, d.client.full_name, d.client.phone);
    println!(
        "When     : {} {}-{} ({})",
        format_ms(a.start_ms, "%Y-%m-%d"),
        format_ms(a.start_ms, "%H:%M"),
        format_ms(a.end_ms, "%H:%M"),
        mins2readable(a.duration_minutes())
    );
    println!(
        "Status   : {}",
        paint(a.status.to_db_str(), appointment_status_color(a.status))
    );
    if let Some(notes) = &a.notes {
        println!("Notes    : {notes}");
    }

    if d.services.is_empty() {
        println!("Services : -");
    } else {
        println!("Services :");
        for s in &d.services {
            println!(
                "  #{:<4} {:<30} {:>8} {:>16}",
                s.id,
                s.name,
                mins2readable(s.duration_minutes),
                format_cents(s.price_cents, &cfg.currency_symbol)
            );
        }
        println!(
            "Total    : {}",
            format_cents(d.services_total_cents(), &cfg.currency_symbol)
        );
    }
    Ok(())
}
