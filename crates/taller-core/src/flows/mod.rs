//! Submit handlers behind each screen.
//!
//! Every handler returns `Result<T, String>` where the error is the message
//! shown to the user, ready to hand to
//! [`FormController::submit`](crate::forms::FormController::submit).

mod account;
mod records;

pub use account::{login, logout, signup};
pub use records::{
    create_client, create_order, create_taller, delete_client, delete_order, delete_taller,
    list_clients, list_orders, list_talleres, update_client, update_order, update_taller,
};

use crate::api::ApiError;
use crate::auth::AuthContext;

pub const CONNECTION_ERROR: &str = "Error de conexión";
pub const BAD_CREDENTIALS: &str = "Credenciales incorrectas";
pub const EMAIL_TAKEN: &str = "Este email ya está registrado";
pub const SIGNUP_FAILED: &str = "Ocurrió un error en el registro.";
pub const EMAIL_CHECK_FAILED: &str = "Error al verificar el email. Intenta de nuevo.";
pub const SESSION_SAVE_FAILED: &str = "No se pudo guardar la sesión";
pub const TALLERES_LOAD_FAILED: &str = "No se pudieron cargar los talleres";
pub const TALLER_CREATE_FAILED: &str = "No se pudo agregar el taller";
pub const CLIENTS_LOAD_FAILED: &str = "No se pudieron cargar los clientes";
pub const CLIENT_CREATE_FAILED: &str = "No se pudo agregar el cliente";
pub const ORDERS_LOAD_FAILED: &str = "No se pudieron cargar los productos";
pub const ORDER_CREATE_FAILED: &str = "No se pudo agregar el producto";

/// Message for a failed authenticated call: the connection message when the
/// service was unreachable, `fallback` otherwise.
///
/// A rejected token also signs the context out.
fn failure(auth: &mut AuthContext, err: &ApiError, fallback: &str) -> String {
    auth.note_failure(err);
    tracing::debug!(kind = %err.kind, "{}", err.message);
    if err.is_connection() {
        CONNECTION_ERROR.to_string()
    } else {
        fallback.to_string()
    }
}

/// Like [`failure`], but shows the service's own message.
fn failure_with_message(auth: &mut AuthContext, err: &ApiError) -> String {
    auth.note_failure(err);
    tracing::debug!(kind = %err.kind, "{}", err.message);
    if err.is_connection() {
        CONNECTION_ERROR.to_string()
    } else {
        err.message.clone()
    }
}
