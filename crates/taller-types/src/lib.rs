//! Data model shared by the taller client crates.
//!
//! Records mirror the JSON exchanged with the record service. Unknown fields
//! are ignored on read so server-side additions don't break decoding.

mod drafts;
mod records;
mod response;

pub use drafts::{ClientDraft, OrderDraft, Owned, RegisterFields, TallerDraft};
pub use records::{Client, ListPage, OrderLine, Session, Taller, User};
pub use response::ApiResponse;
