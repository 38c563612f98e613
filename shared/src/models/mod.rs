//! Request / response models
//!
//! Shared between gastro-server and any Rust client of its API.
//! Required fields of create payloads are `Option` so handlers can name the
//! missing field in the 400 response instead of failing deserialization.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod customer;
pub mod feedback;
pub mod order;
pub mod reservation;

pub use customer::*;
pub use feedback::*;
pub use order::*;
pub use reservation::*;
