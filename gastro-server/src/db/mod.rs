//! Store access
//!
//! [`gateway`] owns the pool, [`graph`] and [`cascade`] implement cascading
//! deletes, and the remaining modules hold the statements for each resource.

pub mod cascade;
pub mod gateway;
pub mod graph;

pub mod customers;
pub mod feedback;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod reservations;

pub use cascade::{CascadeDeleter, CascadeOutcome, CascadeReport};
pub use gateway::{DbConfig, Gateway, GatewayError, Row, ScopedTransaction, SqlParam};
pub use graph::{Entity, ReferentialGraph};
