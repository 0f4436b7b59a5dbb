//! Order-line command handlers.

use anyhow::Result;
use taller_core::flows;
use taller_core::forms::{FormController, NumberOrText, PedidoForm};
use taller_core::interrupt;
use taller_core::types::OrderLine;

use super::{App, require_login, settle};
use crate::cli::OrderFields;

fn form(fields: OrderFields, client_id: Option<String>) -> FormController<PedidoForm> {
    FormController::new(PedidoForm {
        nombre: fields.nombre,
        color: fields.color,
        talle: NumberOrText::from(fields.talle),
        cantidad: NumberOrText::from(fields.cantidad),
        client_id,
    })
}

fn print_order(order: &OrderLine) {
    println!(
        "{}  {}  {}  talle {}  x{}",
        order.id, order.nombre, order.color, order.talle, order.cantidad
    );
}

pub async fn list(app: &mut App, client_id: &str) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::list_orders(&mut app.auth, client_id)).await?;
    app.report(result, |orders: &Vec<OrderLine>| {
        if orders.is_empty() {
            println!("No orders found.");
        }
        for order in orders {
            print_order(order);
        }
    })
}

pub async fn create(app: &mut App, client_id: Option<String>, fields: OrderFields) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields, client_id);
    let auth = &mut app.auth;
    let outcome = form
        .submit(move |draft| flows::create_order(auth, draft), &app.cancel)
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |order| {
        print!("Created order ");
        print_order(order);
    })
}

pub async fn update(
    app: &mut App,
    id: &str,
    client_id: Option<String>,
    fields: OrderFields,
) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields, client_id);
    let auth = &mut app.auth;
    let outcome = form
        .submit(
            move |draft| flows::update_order(auth, id, draft),
            &app.cancel,
        )
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |order| {
        print!("Updated order ");
        print_order(order);
    })
}

pub async fn delete(app: &mut App, id: &str) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::delete_order(&mut app.auth, id)).await?;
    app.report(result, |_| println!("Deleted order {id}"))
}
