//! Invoice Records

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::ids::TypedId;

/// Invoice ID
pub type InvoiceId = TypedId<InvoiceRecord>;

/// Invoice Record
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub number: String,
    pub date: Date,
    pub reference: Option<String>,
    pub customer_name: String,
    pub version: i64,
    pub items: Vec<InvoiceItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InvoiceRecord {
    /// Sum of the stored item totals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_amount).sum()
    }
}

/// Invoice Item ID
pub type InvoiceItemId = TypedId<InvoiceItemRecord>;

/// Invoice Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItemRecord {
    pub id: InvoiceItemId,
    pub invoice_id: InvoiceId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_amount: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of invoices plus the counts needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoicesPage {
    pub invoices: Vec<InvoiceRecord>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}
