use taller_types::{Client, ClientDraft, OrderDraft, OrderLine, Taller, TallerDraft};

use super::{
    CLIENT_CREATE_FAILED, CLIENTS_LOAD_FAILED, ORDER_CREATE_FAILED, ORDERS_LOAD_FAILED,
    TALLER_CREATE_FAILED, TALLERES_LOAD_FAILED, failure, failure_with_message,
};
use crate::auth::AuthContext;

/// Lists the signed-in user's workshops.
pub async fn list_talleres(auth: &mut AuthContext) -> Result<Vec<Taller>, String> {
    let owner_id = auth
        .require_user()
        .map_err(|e| e.to_string())?
        .id
        .clone();
    let result = auth.client().list_talleres(&owner_id).await;
    result.map_err(|err| failure(auth, &err, TALLERES_LOAD_FAILED))
}

pub async fn create_taller(auth: &mut AuthContext, draft: TallerDraft) -> Result<Taller, String> {
    let result = auth.client().create_taller(&draft).await;
    result.map_err(|err| failure(auth, &err, TALLER_CREATE_FAILED))
}

pub async fn update_taller(
    auth: &mut AuthContext,
    id: &str,
    draft: TallerDraft,
) -> Result<Taller, String> {
    let result = auth.client().update_taller(id, &draft).await;
    result.map_err(|err| failure_with_message(auth, &err))
}

pub async fn delete_taller(auth: &mut AuthContext, id: &str) -> Result<(), String> {
    let result = auth.client().delete_taller(id).await;
    result.map_err(|err| failure_with_message(auth, &err))
}

pub async fn list_clients(auth: &mut AuthContext, taller_id: &str) -> Result<Vec<Client>, String> {
    let result = auth.client().list_clients(taller_id).await;
    result.map_err(|err| failure(auth, &err, CLIENTS_LOAD_FAILED))
}

pub async fn create_client(auth: &mut AuthContext, draft: ClientDraft) -> Result<Client, String> {
    let result = auth.client().create_client(&draft).await;
    result.map_err(|err| failure(auth, &err, CLIENT_CREATE_FAILED))
}

pub async fn update_client(
    auth: &mut AuthContext,
    id: &str,
    draft: ClientDraft,
) -> Result<Client, String> {
    let result = auth.client().update_client(id, &draft).await;
    result.map_err(|err| failure_with_message(auth, &err))
}

pub async fn delete_client(auth: &mut AuthContext, id: &str) -> Result<(), String> {
    let result = auth.client().delete_client(id).await;
    result.map_err(|err| failure_with_message(auth, &err))
}

pub async fn list_orders(
    auth: &mut AuthContext,
    client_id: &str,
) -> Result<Vec<OrderLine>, String> {
    let result = auth.client().list_orders(client_id).await;
    result.map_err(|err| failure(auth, &err, ORDERS_LOAD_FAILED))
}

pub async fn create_order(auth: &mut AuthContext, draft: OrderDraft) -> Result<OrderLine, String> {
    let result = auth.client().create_order(&draft).await;
    result.map_err(|err| failure(auth, &err, ORDER_CREATE_FAILED))
}

pub async fn update_order(
    auth: &mut AuthContext,
    id: &str,
    draft: OrderDraft,
) -> Result<OrderLine, String> {
    let result = auth.client().update_order(id, &draft).await;
    result.map_err(|err| failure_with_message(auth, &err))
}

pub async fn delete_order(auth: &mut AuthContext, id: &str) -> Result<(), String> {
    let result = auth.client().delete_order(id).await;
    result.map_err(|err| failure_with_message(auth, &err))
}
