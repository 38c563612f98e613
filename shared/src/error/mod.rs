//! Unified error system for GastroMind
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Error response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Reservation errors
//! - 3xxx: Order errors
//! - 4xxx: Feedback errors
//! - 5xxx: Menu and report errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::CustomerNotFound);
//!
//! let err = AppError::validation("Party size must be at least 1")
//!     .with_detail("field", "party_size");
//!
//! let body = ApiResponse::error(&err);
//! assert_eq!(body.code, 2);
//! assert_eq!(body.error_code(), Some(ErrorCode::ValidationFailed));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
