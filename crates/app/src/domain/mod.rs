//! Invoicing Domain Concerns

pub mod invoices;
