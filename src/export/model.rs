// src/export/model.rs

use crate::models::appointment::AgendaEntry;
use crate::models::client::Client;
use crate::models::invoice::Invoice;
use crate::models::service::Service;
use crate::utils::date::format_ms;
use serde::Serialize;

const STAMP: &str = "%Y-%m-%d %H:%M";

/// Flat rows: timestamps rendered as local text, money kept in cents so the
/// files stay lossless.
#[derive(Serialize, Clone, Debug)]
pub struct ClientExport {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub neighborhood: String,
    pub notes: String,
    pub is_vip: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Client> for ClientExport {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name.clone(),
            phone: c.phone.clone(),
            email: c.email.clone().unwrap_or_default(),
            address: c.address.clone().unwrap_or_default(),
            neighborhood: c.neighborhood.clone().unwrap_or_default(),
            notes: c.notes.clone().unwrap_or_default(),
            is_vip: c.is_vip,
            is_active: c.is_active,
            created_at: format_ms(c.created_at, STAMP),
            updated_at: format_ms(c.updated_at, STAMP),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ServiceExport {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub is_active: bool,
}

impl From<&Service> for ServiceExport {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            description: s.description.clone().unwrap_or_default(),
            duration_minutes: s.duration_minutes,
            price_cents: s.price_cents,
            is_active: s.is_active,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct AppointmentExport {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub status: String,
    pub services: String,
    pub notes: String,
}

impl AppointmentExport {
    pub fn new(entry: &AgendaEntry, service_names: &[String]) -> Self {
        let a = &entry.appointment;
        Self {
            id: a.id,
            client_id: a.client_id,
            client_name: entry.client_name.clone(),
            date: format_ms(a.start_ms, "%Y-%m-%d"),
            start: format_ms(a.start_ms, "%H:%M"),
            end: format_ms(a.end_ms, "%H:%M"),
            status: a.status.to_db_str().to_string(),
            services: service_names.join("; "),
            notes: a.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct InvoiceExport {
    pub id: i64,
    pub client_id: i64,
    pub created_at: String,
    pub status: String,
    pub total_cents: i64,
    pub notes: String,
}

impl From<&Invoice> for InvoiceExport {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id,
            client_id: i.client_id,
            created_at: format_ms(i.created_at, STAMP),
            status: i.status.to_db_str().to_string(),
            total_cents: i.total_cents,
            notes: i.notes.clone().unwrap_or_default(),
        }
    }
}
