use crate::core::clients::clean_optional;
use crate::db::appointments::{get_appointment, services_for_appointment};
use crate::db::invoices as repo;
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::db::{clients, services};
use crate::errors::{AppError, AppResult};
use crate::models::client::Client;
use crate::models::invoice::{Invoice, InvoiceItem, NewInvoiceItem};
use crate::models::invoice_status::InvoiceStatus;
use crate::utils::date::now_ms;
use crate::utils::money::major_to_cents;

pub const EXTRA_ITEM_DESCRIPTION: &str = "Extra";

#[derive(Debug, Clone)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub client: Client,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceDetail {
    /// Sum of the item lines; equals `invoice.total_cents` unless the
    /// stored total drifted.
    pub fn items_total_cents(&self) -> i64 {
        self.items.iter().map(InvoiceItem::line_total).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub client_id: Option<i64>,
    pub range_ms: Option<(i64, i64)>,
}

pub struct BillingLogic;

impl BillingLogic {
    /// Bill an appointment: one ISSUED invoice for its client with one item
    /// per service (quantity 1, unit price = service price) and, when
    /// `extra_major` is positive, one extra item without service.
    ///
    /// Invoice, items and the extra's total update commit together.
    pub fn generate_for_appointment(pool: &mut DbPool, appointment_id: i64, extra_major: Option<i64>) -> AppResult<i64> {
        let extra_cents = match extra_major {
            Some(v) if v > 0 => Some(major_to_cents(v)?),
            Some(v) if v < 0 => return Err(AppError::InvalidAmount(v.to_string())),
            _ => None,
        };

        let tx = pool.conn.transaction()?;

        let appt = get_appointment(&tx, appointment_id)?
            .ok_or(AppError::AppointmentNotFound(appointment_id))?;
        let booked = services_for_appointment(&tx, appointment_id)?;

        let services_total = booked
            .iter()
            .try_fold(0i64, |acc, s| acc.checked_add(s.price_cents))
            .ok_or_else(|| AppError::InvalidAmount("services total out of range".to_string()))?;
        let total_cents = services_total
            .checked_add(extra_cents.unwrap_or(0))
            .ok_or_else(|| AppError::InvalidAmount(format!("extra {} too large", extra_major.unwrap_or(0))))?;
        let invoice = Invoice {
            id: 0,
            client_id: appt.client_id,
            created_at: now_ms(),
            status: InvoiceStatus::Issued,
            total_cents: services_total,
            notes: None,
        };
        let invoice_id = repo::insert_invoice(&tx, &invoice)?;

        let items: Vec<NewInvoiceItem> = booked
            .iter()
            .map(|s| NewInvoiceItem {
                service_id: Some(s.id),
                quantity: 1,
                unit_price_cents: s.price_cents,
                description: Some(s.name.clone()),
            })
            .collect();
        repo::insert_items(&tx, invoice_id, &items)?;

        if let Some(cents) = extra_cents {
            repo::insert_items(
                &tx,
                invoice_id,
                &[NewInvoiceItem {
                    service_id: None,
                    quantity: 1,
                    unit_price_cents: cents,
                    description: Some(EXTRA_ITEM_DESCRIPTION.to_string()),
                }],
            )?;
            repo::add_to_total(&tx, invoice_id, cents)?;
        }

        tx.commit()?;

        record(
            &pool.conn,
            "invoice_generate",
            &format!("invoice #{invoice_id}"),
            &format!(
                "Generated from appointment #{} ({} item(s), total {} cents)",
                appointment_id,
                items.len() + usize::from(extra_cents.is_some()),
                total_cents
            ),
        );
        Ok(invoice_id)
    }

    /// Empty DRAFT invoice for a client, to be filled with `add_item`.
    pub fn create_draft(pool: &mut DbPool, client_id: i64, notes: Option<&str>) -> AppResult<i64> {
        if clients::get_client(&pool.conn, client_id)?.is_none() {
            return Err(AppError::ClientNotFound(client_id));
        }

        let id = repo::insert_invoice(
            &pool.conn,
            &Invoice {
                id: 0,
                client_id,
                created_at: now_ms(),
                status: InvoiceStatus::Draft,
                total_cents: 0,
                notes: clean_optional(notes),
            },
        )?;

        record(&pool.conn, "invoice_add", &format!("invoice #{id}"), &format!("Draft for client #{client_id}"));
        Ok(id)
    }

    /// Append a line and bring the total in line with the items; returns the
    /// new total.
    pub fn add_item(pool: &mut DbPool, invoice_id: i64, item: NewInvoiceItem) -> AppResult<i64> {
        if item.quantity < 1 {
            return Err(AppError::InvalidQuantity(item.quantity));
        }
        if item.unit_price_cents < 0 || item.unit_price_cents.checked_mul(item.quantity).is_none() {
            return Err(AppError::InvalidAmount(item.unit_price_cents.to_string()));
        }
        if let Some(sid) = item.service_id
            && services::get_service(&pool.conn, sid)?.is_none()
        {
            return Err(AppError::ServiceNotFound(sid));
        }

        let tx = pool.conn.transaction()?;
        if repo::get_invoice(&tx, invoice_id)?.is_none() {
            return Err(AppError::InvoiceNotFound(invoice_id));
        }
        repo::insert_items(&tx, invoice_id, std::slice::from_ref(&item))?;
        let total = repo::recompute_total(&tx, invoice_id)?;
        tx.commit()?;

        record(
            &pool.conn,
            "invoice_item",
            &format!("invoice #{invoice_id}"),
            &format!(
                "Added {} x {} cents, total {} cents",
                item.quantity, item.unit_price_cents, total
            ),
        );
        Ok(total)
    }

    pub fn recompute(pool: &mut DbPool, invoice_id: i64) -> AppResult<i64> {
        Self::get(pool, invoice_id)?;
        let total = repo::recompute_total(&pool.conn, invoice_id)?;
        record(&pool.conn, "invoice_recompute", &format!("invoice #{invoice_id}"), &format!("Total {total} cents"));
        Ok(total)
    }

    /// No transition rules: any status may follow any other.
    pub fn set_status(pool: &mut DbPool, invoice_id: i64, status: InvoiceStatus) -> AppResult<()> {
        let current = Self::get(pool, invoice_id)?;
        repo::update_status(&pool.conn, invoice_id, status)?;
        record(
            &pool.conn,
            "invoice_status",
            &format!("invoice #{invoice_id}"),
            &format!("{} → {}", current.status, status),
        );
        Ok(())
    }

    pub fn mark_paid(pool: &mut DbPool, invoice_id: i64) -> AppResult<()> {
        Self::set_status(pool, invoice_id, InvoiceStatus::Paid)
    }

    pub fn void(pool: &mut DbPool, invoice_id: i64) -> AppResult<()> {
        Self::set_status(pool, invoice_id, InvoiceStatus::Void)
    }

    pub fn get(pool: &DbPool, invoice_id: i64) -> AppResult<Invoice> {
        repo::get_invoice(&pool.conn, invoice_id)?.ok_or(AppError::InvoiceNotFound(invoice_id))
    }

    pub fn detail(pool: &DbPool, invoice_id: i64) -> AppResult<InvoiceDetail> {
        let invoice = Self::get(pool, invoice_id)?;
        let client = clients::get_client(&pool.conn, invoice.client_id)?
            .ok_or(AppError::ClientNotFound(invoice.client_id))?;
        let items = repo::items_for_invoice(&pool.conn, invoice_id)?;
        Ok(InvoiceDetail {
            invoice,
            client,
            items,
        })
    }

    pub fn list(pool: &DbPool, filter: &InvoiceFilter) -> AppResult<Vec<Invoice>> {
        let mut invoices = match filter.client_id {
            Some(cid) => repo::list_by_client(&pool.conn, cid)?,
            None => match filter.range_ms {
                Some((start, end)) => return repo::list_by_range(&pool.conn, start, end),
                None => repo::list_all(&pool.conn)?,
            },
        };

        if let Some((start, end)) = filter.range_ms {
            invoices.retain(|i| i.created_at >= start && i.created_at < end);
        }
        Ok(invoices)
    }
}
