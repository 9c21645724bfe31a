use crate::cli::parser::InvoiceCmd;
use crate::config::Config;
use crate::core::billing::{BillingLogic, InvoiceFilter};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::invoice::NewInvoiceItem;
use crate::models::invoice_status::InvoiceStatus;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{invoice_status_color, paint};
use crate::utils::date::{format_ms, parse_range, range_bounds};
use crate::utils::format_cents;
use crate::utils::money::parse_major_units;
use crate::utils::table::Table;

pub fn handle(cmd: &InvoiceCmd, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open_migrated(&cfg.database)?;
    let money = |cents: i64| format_cents(cents, &cfg.currency_symbol);

    match cmd {
        InvoiceCmd::Generate { appointment, extra } => {
            let id = BillingLogic::generate_for_appointment(&mut pool, *appointment, *extra)?;
            let inv = BillingLogic::get(&pool, id)?;
            success(format!(
                "Invoice #{} issued for appointment #{}: total {}",
                id,
                appointment,
                money(inv.total_cents)
            ));
        }
        InvoiceCmd::Add { client, notes } => {
            let id = BillingLogic::create_draft(&mut pool, *client, notes.as_deref())?;
            success(format!("Draft invoice #{id} created for client #{client}."));
        }
        InvoiceCmd::AddItem {
            id,
            price,
            quantity,
            service,
            description,
        } => {
            let total = BillingLogic::add_item(
                &mut pool,
                *id,
                NewInvoiceItem {
                    service_id: *service,
                    quantity: *quantity,
                    unit_price_cents: parse_major_units(price)?,
                    description: description.clone(),
                },
            )?;
            success(format!("Item added to invoice #{id}: total {}", money(total)));
        }
        InvoiceCmd::Show { id } => {
            let d = BillingLogic::detail(&pool, *id)?;
            let inv = &d.invoice;

            header(format!("Invoice #{}", inv.id));
            println!("Client : #{} {}", d.client.id, d.client.full_name);
            println!("Date   : {}", format_ms(inv.created_at, "%Y-%m-%d %H:%M"));
            println!(
                "Status : {}",
                paint(inv.status.to_db_str(), invoice_status_color(inv.status))
            );
            if let Some(notes) = &inv.notes {
                println!("Notes  : {notes}");
            }
            println!();

            let mut table = Table::new(["#", "DESCRIPTION", "QTY", "UNIT", "LINE"]);
            for item in &d.items {
                table.add_row(vec![
                    item.id.to_string(),
                    item.description.clone().unwrap_or_default(),
                    item.quantity.to_string(),
                    money(item.unit_price_cents),
                    money(item.line_total()),
                ]);
            }
            print!("{}", table.render());
            println!("TOTAL  : {}", money(inv.total_cents));

            if d.items_total_cents() != inv.total_cents {
                warning(format!(
                    "Items add up to {}; run `glamstudio invoice recompute {}`.",
                    money(d.items_total_cents()),
                    inv.id
                ));
            }
        }
        InvoiceCmd::List { client, range } => {
            let range_ms = match range {
                Some(r) => {
                    let (from, to) = parse_range(r)?;
                    Some(range_bounds(from, to)?)
                }
                None => None,
            };
            let invoices = BillingLogic::list(
                &pool,
                &InvoiceFilter {
                    client_id: *client,
                    range_ms,
                },
            )?;

            if invoices.is_empty() {
                info("No invoices found.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "DATE", "CLIENT", "STATUS", "TOTAL"]);
            for inv in &invoices {
                table.add_row(vec![
                    inv.id.to_string(),
                    format_ms(inv.created_at, "%Y-%m-%d"),
                    format!("#{}", inv.client_id),
                    paint(inv.status.to_db_str(), invoice_status_color(inv.status)),
                    money(inv.total_cents),
                ]);
            }
            print!("{}", table.render());
        }
        InvoiceCmd::Pay { id } => {
            BillingLogic::mark_paid(&mut pool, *id)?;
            success(format!("Invoice #{id} marked as PAID."));
        }
        InvoiceCmd::Void { id } => {
            BillingLogic::void(&mut pool, *id)?;
            success(format!("Invoice #{id} voided."));
        }
        InvoiceCmd::Status { id, status } => {
            let status: InvoiceStatus = status.parse()?;
            BillingLogic::set_status(&mut pool, *id, status)?;
            success(format!("Invoice #{id} is now {status}."));
        }
        InvoiceCmd::Recompute { id } => {
            let total = BillingLogic::recompute(&mut pool, *id)?;
            success(format!("Invoice #{id} total: {}", money(total)));
        }
    }

    Ok(())
}
