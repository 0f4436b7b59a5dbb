use taller_types::{RegisterFields, User};

use super::{
    BAD_CREDENTIALS, CONNECTION_ERROR, EMAIL_CHECK_FAILED, EMAIL_TAKEN, SESSION_SAVE_FAILED,
    SIGNUP_FAILED,
};
use crate::api::ApiErrorKind;
use crate::auth::AuthContext;
use crate::forms::Credentials;

/// Signs in; on success the context is authenticated.
pub async fn login(auth: &mut AuthContext, credentials: Credentials) -> Result<User, String> {
    match auth.login(&credentials.email, &credentials.password).await {
        Ok(user) => Ok(user),
        Err(err) if err.is_connection() => Err(CONNECTION_ERROR.to_string()),
        Err(err) if err.kind == ApiErrorKind::Storage => {
            tracing::warn!("signed in but the session was not saved: {}", err.message);
            Err(format!("{SESSION_SAVE_FAILED}: {}", err.message))
        }
        Err(err) => {
            tracing::debug!(kind = %err.kind, "login rejected: {}", err.message);
            Err(BAD_CREDENTIALS.to_string())
        }
    }
}

/// Creates an account. The user still has to sign in afterwards.
///
/// When registration fails the email is looked up to tell a duplicate
/// account apart from other rejections.
pub async fn signup(auth: &AuthContext, fields: RegisterFields) -> Result<User, String> {
    let err = match auth.register(&fields).await {
        Ok(user) => return Ok(user),
        Err(err) if err.is_connection() => return Err(CONNECTION_ERROR.to_string()),
        Err(err) => err,
    };

    match auth.client().check_email_exists(&fields.email).await {
        Ok(true) => Err(EMAIL_TAKEN.to_string()),
        Ok(false) if err.message.trim().is_empty() => Err(SIGNUP_FAILED.to_string()),
        Ok(false) => Err(err.message),
        Err(check_err) => {
            tracing::warn!(kind = %check_err.kind, "email lookup failed: {}", check_err.message);
            Err(EMAIL_CHECK_FAILED.to_string())
        }
    }
}

/// Signs out. Storage failures are reported, but the context is signed out
/// regardless.
pub fn logout(auth: &mut AuthContext) -> Result<(), String> {
    auth.logout().map_err(|e| e.message)
}
