//! Client command handlers.

use anyhow::Result;
use taller_core::flows;
use taller_core::forms::{ClienteForm, FormController, NumberOrText};
use taller_core::interrupt;
use taller_core::types::Client;

use super::{App, require_login, settle};
use crate::cli::ClientFields;

fn form(fields: ClientFields, taller_id: Option<String>) -> FormController<ClienteForm> {
    FormController::new(ClienteForm {
        nombre: fields.nombre,
        telefono: fields.telefono,
        deuda: fields.deuda.map(NumberOrText::from),
        taller_id,
    })
}

fn print_client(client: &Client) {
    let phone = client.phone.as_deref().unwrap_or("-");
    let estado = if client.activo { "" } else { "  (inactivo)" };
    println!(
        "{}  {}  {}  deuda ${}{}",
        client.id, client.name, phone, client.deuda, estado
    );
}

pub async fn list(app: &mut App, taller_id: &str) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::list_clients(&mut app.auth, taller_id)).await?;
    app.report(result, |clients: &Vec<Client>| {
        if clients.is_empty() {
            println!("No clients found.");
        }
        for client in clients {
            print_client(client);
        }
    })
}

pub async fn create(app: &mut App, taller_id: String, fields: ClientFields) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields, Some(taller_id));
    let auth = &mut app.auth;
    let outcome = form
        .submit(move |draft| flows::create_client(auth, draft), &app.cancel)
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |client| {
        print!("Created client ");
        print_client(client);
    })
}

pub async fn update(
    app: &mut App,
    id: &str,
    taller_id: Option<String>,
    fields: ClientFields,
) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields, taller_id);
    let auth = &mut app.auth;
    let outcome = form
        .submit(
            move |draft| flows::update_client(auth, id, draft),
            &app.cancel,
        )
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |client| {
        print!("Updated client ");
        print_client(client);
    })
}

pub async fn delete(app: &mut App, id: &str) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::delete_client(&mut app.auth, id)).await?;
    app.report(result, |_| println!("Deleted client {id}"))
}
