use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
    pub is_vip: bool,
    pub is_active: bool,
    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

/// Form input for creating or editing a client. Fields are raw user text;
/// `core::clients` trims and validates them.
#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub notes: Option<String>,
    pub is_vip: bool,
    pub is_active: bool,
}
