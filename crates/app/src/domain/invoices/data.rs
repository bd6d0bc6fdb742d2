//! Invoice Data

use jiff::civil::Date;
use rust_decimal::Decimal;

/// Default number of invoices per page.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u64 = 100;

/// New Invoice Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub number: String,
    pub date: Date,
    pub reference: Option<String>,
    pub customer_name: String,
    pub items: Vec<NewInvoiceItem>,
}

/// New Invoice Item Data
///
/// Item totals are always derived from `unit_price` and `quantity` when the
/// item is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceItem {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// Invoice Update Data
///
/// Replaces every scalar field and the entire item set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceUpdate {
    pub number: String,
    pub date: Date,
    pub reference: Option<String>,
    pub customer_name: String,
    pub items: Vec<NewInvoiceItem>,

    /// Version the caller last saw. `None` skips the staleness check.
    pub expected_version: Option<i64>,
}

/// Invoice list filter; every criterion is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,

    /// Inclusive lower bound on the invoice date.
    pub date_from: Option<Date>,

    /// Inclusive upper bound on the invoice date.
    pub date_to: Option<Date>,
}

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Build a page request, raising `page` to 1 and clamping `per_page` to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of rows that precede this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Last page for `total` rows; an empty set still has one page.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}
