//! Form validation and submission.
//!
//! Each form is a plain struct of field values implementing [`Validate`].
//! [`FormController`] drives one submission: validate, run the handler,
//! and keep the per-field errors, general error and loading flag a screen
//! renders.

mod account;
mod records;
pub mod rules;

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

pub use account::{Credentials, LoginForm, SignupForm};
pub use records::{ClienteForm, PedidoForm, TallerForm};
pub use rules::NumberOrText;

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field errors in the order the fields were checked, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has an error.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Turns raw field values into a payload, or reports what is wrong.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
}

/// Result of [`FormController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// Validation failed; the handler was not called
    Invalid,
    Succeeded(T),
    /// The handler failed with a message for the user
    Failed(String),
    Cancelled,
}

/// Submission state for one form.
#[derive(Debug, Default)]
pub struct FormController<F> {
    form: F,
    phase: FormPhase,
    errors: FieldErrors,
    general_error: Option<String>,
    loading: bool,
}

impl<F: Validate> FormController<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            phase: FormPhase::Idle,
            errors: FieldErrors::new(),
            general_error: None,
            loading: false,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validates the form and, if it passes, runs `handler` with the payload.
    ///
    /// The handler races `cancel`; a cancelled handler is dropped. `loading`
    /// is false again whenever this returns.
    pub async fn submit<H, Fut, T>(
        &mut self,
        handler: H,
        cancel: &CancellationToken,
    ) -> SubmitOutcome<T>
    where
        H: FnOnce(F::Output) -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        self.general_error = None;
        self.phase = FormPhase::Validating;

        let payload = match self.form.validate() {
            Ok(payload) => {
                self.errors = FieldErrors::new();
                payload
            }
            Err(errors) => {
                tracing::debug!(count = errors.len(), "form rejected");
                self.errors = errors;
                self.phase = FormPhase::Idle;
                return SubmitOutcome::Invalid;
            }
        };

        self.phase = FormPhase::Submitting;
        self.loading = true;

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            out = handler(payload) => Some(out),
        };

        self.loading = false;
        match result {
            Some(Ok(value)) => {
                self.phase = FormPhase::Success;
                SubmitOutcome::Succeeded(value)
            }
            Some(Err(message)) => {
                self.phase = FormPhase::Idle;
                self.general_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
            None => {
                tracing::debug!("submission cancelled");
                self.phase = FormPhase::Idle;
                SubmitOutcome::Cancelled
            }
        }
    }
}
