//! Workshop command handlers.

use anyhow::Result;
use taller_core::flows;
use taller_core::forms::{FormController, TallerForm};
use taller_core::interrupt;
use taller_core::types::Taller;

use super::{App, require_login, settle};
use crate::cli::TallerFields;

fn form(fields: TallerFields) -> FormController<TallerForm> {
    FormController::new(TallerForm {
        nombre: fields.nombre,
        icono: fields.icono,
    })
}

fn print_taller(taller: &Taller) {
    match &taller.icon {
        Some(icon) => println!("{}  {}  {}", taller.id, taller.name, icon),
        None => println!("{}  {}", taller.id, taller.name),
    }
}

pub async fn list(app: &mut App) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::list_talleres(&mut app.auth)).await?;
    app.report(result, |talleres: &Vec<Taller>| {
        if talleres.is_empty() {
            println!("No talleres found.");
        }
        for taller in talleres {
            print_taller(taller);
        }
    })
}

pub async fn create(app: &mut App, fields: TallerFields) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields);
    let auth = &mut app.auth;
    let outcome = form
        .submit(move |draft| flows::create_taller(auth, draft), &app.cancel)
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |taller| {
        print!("Created taller ");
        print_taller(taller);
    })
}

pub async fn update(app: &mut App, id: &str, fields: TallerFields) -> Result<()> {
    require_login(app)?;
    let mut form = form(fields);
    let auth = &mut app.auth;
    let outcome = form
        .submit(
            move |draft| flows::update_taller(auth, id, draft),
            &app.cancel,
        )
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |taller| {
        print!("Updated taller ");
        print_taller(taller);
    })
}

pub async fn delete(app: &mut App, id: &str) -> Result<()> {
    require_login(app)?;
    let result =
        interrupt::cancellable(&app.cancel, flows::delete_taller(&mut app.auth, id)).await?;
    app.report(result, |_| println!("Deleted taller {id}"))
}
