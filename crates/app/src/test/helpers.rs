//! Test Helpers

use std::str::FromStr;

use jiff::civil::date;
use rust_decimal::Decimal;

use crate::domain::invoices::{
    data::{InvoiceUpdate, NewInvoice, NewInvoiceItem},
    records::InvoiceRecord,
};

/// An Acme invoice dated 2025-01-01 with the given number and items.
pub(crate) fn new_invoice(number: &str, items: Vec<NewInvoiceItem>) -> NewInvoice {
    NewInvoice {
        number: number.to_string(),
        date: date(2025, 1, 1),
        reference: None,
        customer_name: "Acme".to_string(),
        items,
    }
}

pub(crate) fn item(product_name: &str, unit_price: &str, quantity: u32) -> NewInvoiceItem {
    NewInvoiceItem {
        product_name: product_name.to_string(),
        unit_price: Decimal::from_str(unit_price).expect("valid unit price literal"),
        quantity,
    }
}

/// An update that rewrites `record` as-is, based on its current version.
pub(crate) fn update_from(record: &InvoiceRecord) -> InvoiceUpdate {
    InvoiceUpdate {
        number: record.number.clone(),
        date: record.date,
        reference: record.reference.clone(),
        customer_name: record.customer_name.clone(),
        items: record
            .items
            .iter()
            .map(|item| NewInvoiceItem {
                product_name: item.product_name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
            })
            .collect(),
        expected_version: Some(record.version),
    }
}
