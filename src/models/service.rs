use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    /// Price in major units as typed by the user (e.g. "35000").
    pub price: String,
    pub is_active: bool,
}
