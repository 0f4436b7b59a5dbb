//! Account command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use taller_core::flows;
use taller_core::forms::{FormController, LoginForm, SignupForm};
use taller_core::types::User;

use super::{App, print_json, settle};

/// Reads one line from stdin, prompting on a terminal.
fn read_secret(prompt: &str) -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("{prompt}: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("read {prompt} from stdin"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(app: &mut App, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_secret("Password")?,
    };

    let mut form = FormController::new(LoginForm { email, password });
    let auth = &mut app.auth;
    let outcome = form
        .submit(move |creds| flows::login(auth, creds), &app.cancel)
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |user: &User| {
        println!("Logged in as {}", user.display_name());
    })
}

pub async fn signup(
    app: &mut App,
    nombre: String,
    email: String,
    password: Option<String>,
    confirm: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_secret("Password")?,
    };
    let confirmacion = match confirm {
        Some(c) => c,
        None => read_secret("Confirm password")?,
    };

    let mut form = FormController::new(SignupForm {
        nombre,
        email,
        password,
        confirmacion,
    });
    let auth = &app.auth;
    let outcome = form
        .submit(move |fields| flows::signup(auth, fields), &app.cancel)
        .await;

    let result = settle(outcome, form.errors())?;
    app.report(result, |user: &User| {
        println!("Account created for {}", user.email);
        println!("Run `taller login --email {}` to sign in.", user.email);
    })
}

pub fn logout(app: &mut App) -> Result<()> {
    let was_signed_in = app.auth.is_authenticated();
    let result = flows::logout(&mut app.auth).map(|()| was_signed_in);
    app.report(result, |had_session| {
        if *had_session {
            println!("Logged out.");
        } else {
            println!("Not logged in.");
        }
    })
}

#[derive(Serialize)]
struct Status<'a> {
    authenticated: bool,
    base_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a User>,
}

pub fn status(app: &App) -> Result<()> {
    let status = Status {
        authenticated: app.auth.is_authenticated(),
        base_url: app.auth.client().base_url(),
        user: app.auth.user(),
    };

    if app.json {
        return print_json(&taller_core::types::ApiResponse::ok(status));
    }

    match status.user {
        Some(user) => println!(
            "Logged in as {} <{}> ({})",
            user.display_name(),
            user.email,
            status.base_url
        ),
        None => println!("Not logged in ({})", status.base_url),
    }
    Ok(())
}
