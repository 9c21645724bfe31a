use super::invoice_status::InvoiceStatus;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Invoice {
    pub id: i64,
    pub client_id: i64,
    pub created_at: i64,
    pub status: InvoiceStatus,
    pub total_cents: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub service_id: Option<i64>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub description: Option<String>,
}

impl InvoiceItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// Item to be inserted; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceItem {
    pub service_id: Option<i64>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub description: Option<String>,
}
