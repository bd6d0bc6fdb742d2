//! Invoice client: HTTP transport for the invoicing API and the view state an
//! invoice screen keeps in sync with it.

pub mod api;
pub mod board;
pub mod editor;
pub mod models;
pub mod notices;
pub mod sort;
pub mod validation;

pub use api::{ApiError, HttpInvoicesApi, InvoicesApi};
pub use board::InvoiceBoard;
