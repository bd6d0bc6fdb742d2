//! Invoice store: domain records, Postgres persistence and the invoices service.

pub mod context;
pub mod database;
pub mod domain;
pub mod ids;

pub use domain::invoices;

#[cfg(test)]
mod test;
