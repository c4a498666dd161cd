//! Services Layer
//!
//! Business operations that touch more than one table or need a transaction.
//! HTTP handlers call these; reads that map one-to-one onto a repository
//! method go straight to the repository instead.

pub mod account_service;
pub mod borrow_service;
pub mod cart_service;
pub mod inventory_service;

/// Timestamp stored in every `*_at` column.
///
/// Fixed-width UTC so that ordering by the text column is chronological.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
