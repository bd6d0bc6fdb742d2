//! Invoice Repositories

mod invoices;
mod items;

pub(crate) use invoices::{InvoiceFields, PgInvoicesRepository};
pub(crate) use items::PgInvoiceItemsRepository;
