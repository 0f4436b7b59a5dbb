use serde::{Deserialize, Serialize};

/// An account on the record service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    /// Name to show for this user: `name`, then `username`, then `email`.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.username.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// An authentication token paired with the user it authorizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// A workshop owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taller {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

fn default_deuda() -> String {
    "0".to_string()
}

fn default_activo() -> bool {
    true
}

/// A client of a workshop, with its outstanding debt (`deuda`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_deuda")]
    pub deuda: String,
    pub owner_id: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// A product/order line. `talle` (size) and `cantidad` travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub nombre: String,
    pub color: String,
    pub talle: String,
    pub cantidad: String,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// One page of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    pub items: Vec<T>,
}

fn first_page() -> u32 {
    1
}

impl<T> ListPage<T> {
    /// True when no page follows this one.
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}
