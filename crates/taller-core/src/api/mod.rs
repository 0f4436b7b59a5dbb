//! Record service API.

mod client;
mod error;
mod records;

pub use client::{ApiClient, USER_AGENT};
pub use error::{ApiError, ApiErrorKind, ServerFieldError};
pub use records::{CLIENTS, ORDERS, TALLERES};
