//! GastroMind server
//!
//! Restaurant backend over SQLite: CRUD endpoints, canned reports, and a
//! transactional cascade engine for removing customers.
//!
//! ```text
//! gastro-server/src/
//! ├── api/          # axum routers and handlers
//! ├── db/           # query gateway, referential graph, cascade, statements
//! ├── middleware/   # request logging
//! ├── config.rs     # env-driven configuration
//! ├── error.rs      # ServiceError (store → AppError bridge)
//! ├── logger.rs     # tracing subscriber setup
//! ├── state.rs      # AppState
//! └── validation.rs # input checks
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod state;
pub mod validation;

pub use api::build_app;
pub use config::Config;
pub use db::{CascadeDeleter, CascadeOutcome, CascadeReport, Gateway, GatewayError};
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
