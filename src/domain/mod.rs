//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, reservation rules and domain error types.

pub mod borrow;
pub mod errors;
pub mod repositories;
pub mod reservation;

pub use borrow::{BorrowStatus, Role};
pub use errors::DomainError;
pub use repositories::*;
pub use reservation::{ReservationError, StockLevel};
