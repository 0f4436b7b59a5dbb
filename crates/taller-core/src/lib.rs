//! Core taller library (API client, session, auth, forms, config).

pub mod api;
pub mod auth;
pub mod config;
pub mod flows;
pub mod forms;
pub mod interrupt;
pub mod logging;
pub mod session;

pub use taller_types as types;
