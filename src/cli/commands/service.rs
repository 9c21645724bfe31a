use crate::cli::parser::{ServiceCmd, ServiceFields};
use crate::config::Config;
use crate::core::services::ServiceLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::service::{Service, ServiceInput};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{paint, GREY};
use crate::utils::money::CENTS_PER_UNIT;
use crate::utils::table::Table;
use crate::utils::{format_cents, mins2readable};

pub fn handle(cmd: &ServiceCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open_migrated(&cfg.database)?;

    match cmd {
        ServiceCmd::Add(fields) => {
            let input = ServiceInput {
                name: fields.name.clone().ok_or(AppError::BlankField("Service name"))?,
                description: fields.description.clone(),
                duration_minutes: fields
                    .duration
                    .ok_or(AppError::BlankField("Duration"))?,
                price: fields.price.clone().ok_or(AppError::BlankField("Price"))?,
                is_active: fields.active.unwrap_or(true),
            };
            let s = ServiceLogic::create(&mut pool, cfg, &input)?;
            success(format!(
                "Service #{} added: {} ({}, {})",
                s.id,
                s.name,
                mins2readable(s.duration_minutes),
                format_cents(s.price_cents, &cfg.currency_symbol)
            ));
        }
        ServiceCmd::Edit { id, fields } => {
            let current = ServiceLogic::get(&pool, *id)?;
            let input = merge(&current, fields);
            let s = ServiceLogic::update(&mut pool, cfg, *id, &input)?;
            success(format!("Service #{} updated: {}", s.id, s.name));
        }
        ServiceCmd::Show { id } => {
            let s = ServiceLogic::get(&pool, *id)?;
            header(format!("Service #{} {}", s.id, s.name));
            println!("Description : {}", s.description.as_deref().unwrap_or("-"));
            println!("Duration    : {}", mins2readable(s.duration_minutes));
            println!("Price       : {}", format_cents(s.price_cents, &cfg.currency_symbol));
            println!("Active      : {}", if s.is_active { "yes" } else { "no" });
        }
        ServiceCmd::List { search, all } => {
            let services = ServiceLogic::list(&pool, search.as_deref(), *all)?;
            if services.is_empty() {
                info("No services found.");
                return Ok(());
            }
            let mut table = Table::new(["ID", "NAME", "DURATION", "PRICE", ""]);
            for s in &services {
                table.add_row(vec![
                    s.id.to_string(),
                    s.name.clone(),
                    mins2readable(s.duration_minutes),
                    format_cents(s.price_cents, &cfg.currency_symbol),
                    if s.is_active {
                        String::new()
                    } else {
                        paint("inactive", GREY)
                    },
                ]);
            }
            print!("{}", table.render());
        }
        ServiceCmd::Deactivate { id } => {
            ServiceLogic::set_active(&mut pool, *id, false)?;
            success(format!("Service #{id} deactivated."));
        }
        ServiceCmd::Activate { id } => {
            ServiceLogic::set_active(&mut pool, *id, true)?;
            success(format!("Service #{id} activated."));
        }
        ServiceCmd::Del { id } => {
            ServiceLogic::delete(&mut pool, *id)?;
            success(format!("Service #{id} deleted."));
        }
    }

    Ok(())
}

fn merge(current: &Service, fields: &ServiceFields) -> ServiceInput {
    ServiceInput {
        name: fields.name.clone().unwrap_or_else(|| current.name.clone()),
        description: fields
            .description
            .clone()
            .or_else(|| current.description.clone()),
        duration_minutes: fields.duration.unwrap_or(current.duration_minutes),
        price: fields
            .price
            .clone()
            .unwrap_or_else(|| (current.price_cents / CENTS_PER_UNIT).to_string()),
        is_active: fields.active.unwrap_or(current.is_active),
    }
}
