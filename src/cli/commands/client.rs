use crate::cli::parser::{ClientCmd, ClientFields};
use crate::config::Config;
use crate::core::billing::{BillingLogic, InvoiceFilter};
use crate::core::clients::ClientLogic;
use crate::db::appointments::list_for_client;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::client::{Client, ClientInput};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{appointment_status_color, invoice_status_color, paint, MAGENTA};
use crate::utils::date::format_ms;
use crate::utils::format_cents;
use crate::utils::table::Table;

pub fn handle(cmd: &ClientCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open_migrated(&cfg.database)?;

    match cmd {
        ClientCmd::Add(fields) => {
            let input = ClientInput {
                full_name: fields.name.clone().ok_or(AppError::BlankField("Full name"))?,
                phone: fields.phone.clone().ok_or(AppError::BlankField("Phone"))?,
                email: fields.email.clone(),
                address: fields.address.clone(),
                neighborhood: fields.neighborhood.clone(),
                notes: fields.notes.clone(),
                is_vip: fields.vip.unwrap_or(false),
                is_active: fields.active.unwrap_or(true),
            };
            let client = ClientLogic::create(&mut pool, cfg, &input)?;
            success(format!(
                "Client #{} added: {} ({})",
                client.id, client.full_name, client.phone
            ));
        }
        ClientCmd::Edit { id, fields } => {
            let current = ClientLogic::get(&pool, *id)?;
            let input = merge(&current, fields);
            let client = ClientLogic::update(&mut pool, cfg, *id, &input)?;
            success(format!("Client #{} updated: {}", client.id, client.full_name));
        }
        ClientCmd::Show { id } => show(&pool, cfg, *id)?,
        ClientCmd::List { search } => {
            let clients = ClientLogic::list(&pool, search.as_deref())?;
            if clients.is_empty() {
                info("No clients found.");
                return Ok(());
            }
            let mut table = Table::new(["ID", "NAME", "PHONE", "EMAIL", "NEIGHBORHOOD", "FLAGS"]);
            for c in &clients {
                table.add_row(vec![
                    c.id.to_string(),
                    c.full_name.clone(),
                    c.phone.clone(),
                    c.email.clone().unwrap_or_default(),
                    c.neighborhood.clone().unwrap_or_default(),
                    flags(c),
                ]);
            }
            print!("{}", table.render());
        }
        ClientCmd::Del { id } => {
            ClientLogic::delete(&mut pool, *id)?;
            success(format!("Client #{id} deleted."));
        }
    }

    Ok(())
}

/// Form for `edit`: every omitted flag keeps the stored value.
fn merge(current: &Client, fields: &ClientFields) -> ClientInput {
    ClientInput {
        full_name: fields.name.clone().unwrap_or_else(|| current.full_name.clone()),
        phone: fields.phone.clone().unwrap_or_else(|| current.phone.clone()),
        email: fields.email.clone().or_else(|| current.email.clone()),
        address: fields.address.clone().or_else(|| current.address.clone()),
        neighborhood: fields
            .neighborhood
            .clone()
            .or_else(|| current.neighborhood.clone()),
        notes: fields.notes.clone().or_else(|| current.notes.clone()),
        is_vip: fields.vip.unwrap_or(current.is_vip),
        is_active: fields.active.unwrap_or(current.is_active),
    }
}

fn flags(c: &Client) -> String {
    let mut out = Vec::new();
    if c.is_vip {
        out.push(paint("VIP", MAGENTA));
    }
    if !c.is_active {
        out.push("inactive".to_string());
    }
    out.join(" ")
}

fn show(pool: &DbPool, cfg: &Config, id: i64) -> AppResult<()> {
    let c = ClientLogic::get(pool, id)?;

    header(format!("Client #{} {}", c.id, c.full_name));
    println!("Phone        : {}", c.phone);
    println!("Email        : {}", c.email.as_deref().unwrap_or("-"));
    println!("Address      : {}", c.address.as_deref().unwrap_or("-"));
    println!("Neighborhood : {}", c.neighborhood.as_deref().unwrap_or("-"));
    println!("Notes        : {}", c.notes.as_deref().unwrap_or("-"));
    println!("Flags        : {}", flags(&c));
    println!("Since        : {}", format_ms(c.created_at, "%Y-%m-%d"));

    let appointments = list_for_client(&pool.conn, id)?;
    if !appointments.is_empty() {
        header("Appointments");
        for a in &appointments {
            println!(
                "#{:<5} {} {}-{}  {}",
                a.id,
                format_ms(a.start_ms, "%Y-%m-%d"),
                format_ms(a.start_ms, "%H:%M"),
                format_ms(a.end_ms, "%H:%M"),
                paint(a.status.to_db_str(), appointment_status_color(a.status))
            );
        }
    }

    let invoices = BillingLogic::list(
        pool,
        &InvoiceFilter {
            client_id: Some(id),
            range_ms: None,
        },
    )?;
    if !invoices.is_empty() {
        header("Invoices");
        for i in &invoices {
            println!(
                "#{:<5} {}  {:>16}  {}",
                i.id,
                format_ms(i.created_at, "%Y-%m-%d"),
                format_cents(i.total_cents, &cfg.currency_symbol),
                paint(i.status.to_db_str(), invoice_status_color(i.status))
            );
        }
    }

    Ok(())
}
