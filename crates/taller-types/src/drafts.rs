//! Outgoing payloads.
//!
//! Drafts carry what a form collects. They never include `owner_id`; the
//! owner is attached from the current session through [`Owned`] at create
//! time, and updates send the bare draft.

use serde::Serialize;

/// Workshop fields collected by the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallerDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Client fields collected by the create/edit form.
///
/// `deuda` and `activo` are only sent when set, so an update leaves the
/// stored balance and status alone. Creates go through [`Self::for_create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deuda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taller_id: Option<String>,
}

impl ClientDraft {
    /// Fills the fields a new client starts with: no debt, active.
    #[must_use]
    pub fn for_create(mut self) -> Self {
        self.deuda.get_or_insert_with(|| "0".to_string());
        self.activo.get_or_insert(true);
        self
    }
}

/// Order-line fields, with `talle` and `cantidad` already normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub nombre: String,
    pub color: String,
    pub talle: String,
    pub cantidad: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// A draft stamped with its owner, ready to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owned<'a, D> {
    #[serde(flatten)]
    pub draft: &'a D,
    pub owner_id: &'a str,
}

/// Account registration fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterFields {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
}
