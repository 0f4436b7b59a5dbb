//! Login and signup forms.

use taller_types::RegisterFields;

use super::rules::{has_min_chars, is_email};
use super::{FieldErrors, Validate};

const EMAIL_INVALID: &str = "El campo 'email' debe ser un correo válido";
const PASSWORD_REQUIRED: &str = "El campo 'contraseña' es obligatorio";
const PASSWORD_SHORT: &str = "El campo 'contraseña' debe contener al menos 8 caracteres";
const NAME_SHORT: &str = "El campo 'nombre' debe contener al menos 2 caracteres";
const CONFIRM_REQUIRED: &str = "El campo 'confirmación' es obligatorio";
const PASSWORDS_DIFFER: &str = "Las contraseñas no coinciden";

const MIN_PASSWORD_CHARS: usize = 8;

// The format rule runs first, so an empty email reports the format message.
fn check_email(errors: &mut FieldErrors, email: &str) {
    if !is_email(email) {
        errors.add("email", EMAIL_INVALID);
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.add("contraseña", PASSWORD_REQUIRED);
    } else if !has_min_chars(password, MIN_PASSWORD_CHARS) {
        errors.add("contraseña", PASSWORD_SHORT);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validated login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for LoginForm {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result(|| Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub confirmacion: String,
}

impl Validate for SignupForm {
    type Output = RegisterFields;

    fn validate(&self) -> Result<RegisterFields, FieldErrors> {
        let mut errors = FieldErrors::new();
        if !has_min_chars(&self.nombre, 2) {
            errors.add("nombre", NAME_SHORT);
        }
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.confirmacion.is_empty() {
            errors.add("confirmacion", CONFIRM_REQUIRED);
        }

        // Only compared once every field is individually valid.
        if errors.is_empty() && self.password != self.confirmacion {
            errors.add("confirmacion", PASSWORDS_DIFFER);
        }

        errors.into_result(|| RegisterFields {
            name: self.nombre.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.confirmacion.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            nombre: "Maria".into(),
            email: "maria@example.com".into(),
            password: "secret123".into(),
            confirmacion: "secret123".into(),
        }
    }

    #[test]
    fn test_login_empty_fields_report_first_rule() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));
        assert_eq!(errors.get("contraseña"), Some(PASSWORD_REQUIRED));
    }

    #[test]
    fn test_login_rejects_bad_email_and_short_password() {
        let form = LoginForm {
            email: "maria".into(),
            password: "1234567".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));
        assert_eq!(errors.get("contraseña"), Some(PASSWORD_SHORT));
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: "maria@example.com".into(),
            password: "12345678".into(),
        };
        let creds = form.validate().unwrap();
        assert_eq!(creds.email, "maria@example.com");
    }

    #[test]
    fn test_signup_valid_trims_name_and_email() {
        let form = SignupForm {
            nombre: "  Maria ".into(),
            ..signup()
        };
        let fields = form.validate().unwrap();
        assert_eq!(fields.name, "Maria");
        assert_eq!(fields.password_confirm, "secret123");
    }

    #[test]
    fn test_signup_empty_email_reports_format() {
        let form = SignupForm {
            email: String::new(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_signup_mismatch_reported_on_confirmation() {
        let form = SignupForm {
            confirmacion: "secret124".into(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirmacion"), Some(PASSWORDS_DIFFER));
    }

    #[test]
    fn test_signup_mismatch_hidden_while_other_fields_fail() {
        let form = SignupForm {
            nombre: "M".into(),
            confirmacion: "different".into(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("nombre"), Some(NAME_SHORT));
        assert!(!errors.has("confirmacion"));
    }

    #[test]
    fn test_signup_empty_confirmation() {
        let form = SignupForm {
            confirmacion: String::new(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("confirmacion"), Some(CONFIRM_REQUIRED));
    }

    #[test]
    fn test_signup_errors_follow_field_order() {
        let errors = SignupForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["nombre", "email", "contraseña", "confirmacion"]);
    }
}
