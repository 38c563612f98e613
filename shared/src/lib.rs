//! Shared types for GastroMind
//!
//! Error system and API request/response models used by the server and its
//! clients.

pub mod error;
pub mod models;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
