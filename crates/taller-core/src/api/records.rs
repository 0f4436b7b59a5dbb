//! Typed operations over the workshop collections.
//!
//! Creates stamp `owner_id` from the stored session; updates send the bare
//! draft so ownership never changes.

use serde::Serialize;
use taller_types::{Client, ClientDraft, OrderDraft, OrderLine, Owned, Taller, TallerDraft};

use super::client::{ApiClient, eq_filter};
use super::error::{ApiError, ApiErrorKind};

pub const TALLERES: &str = "talleres";
pub const CLIENTS: &str = "clients";
pub const ORDERS: &str = "products";

impl ApiClient {
    pub async fn list_talleres(&self, owner_id: &str) -> Result<Vec<Taller>, ApiError> {
        self.list_records(TALLERES, &eq_filter("owner_id", owner_id)).await
    }

    pub async fn create_taller(&self, draft: &TallerDraft) -> Result<Taller, ApiError> {
        self.create_owned(TALLERES, draft).await
    }

    pub async fn update_taller(&self, id: &str, draft: &TallerDraft) -> Result<Taller, ApiError> {
        self.update_record(TALLERES, id, draft).await
    }

    pub async fn delete_taller(&self, id: &str) -> Result<(), ApiError> {
        self.delete_record(TALLERES, id).await
    }

    pub async fn list_clients(&self, taller_id: &str) -> Result<Vec<Client>, ApiError> {
        self.list_records(CLIENTS, &eq_filter("taller_id", taller_id)).await
    }

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ApiError> {
        self.create_owned(CLIENTS, &draft.clone().for_create()).await
    }

    pub async fn update_client(&self, id: &str, draft: &ClientDraft) -> Result<Client, ApiError> {
        self.update_record(CLIENTS, id, draft).await
    }

    pub async fn delete_client(&self, id: &str) -> Result<(), ApiError> {
        self.delete_record(CLIENTS, id).await
    }

    pub async fn list_orders(&self, client_id: &str) -> Result<Vec<OrderLine>, ApiError> {
        self.list_records(ORDERS, &eq_filter("client_id", client_id)).await
    }

    pub async fn create_order(&self, draft: &OrderDraft) -> Result<OrderLine, ApiError> {
        self.create_owned(ORDERS, draft).await
    }

    pub async fn update_order(&self, id: &str, draft: &OrderDraft) -> Result<OrderLine, ApiError> {
        self.update_record(ORDERS, id, draft).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        self.delete_record(ORDERS, id).await
    }

    async fn create_owned<D, T>(&self, collection: &str, draft: &D) -> Result<T, ApiError>
    where
        D: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let session = self
            .session()?
            .ok_or_else(|| ApiError::new(ApiErrorKind::Auth, "Not logged in"))?;
        let body = Owned {
            draft,
            owner_id: &session.user.id,
        };
        self.create_record(collection, &body).await
    }
}
