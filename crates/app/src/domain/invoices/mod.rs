//! Invoices

pub mod data;
pub mod errors;
pub mod money;
pub mod records;
mod repositories;
pub mod service;

pub use errors::InvoicesServiceError;
pub use service::*;
