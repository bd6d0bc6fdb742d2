//! Invoice Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use invoicing_app::invoices::records::{InvoiceItemRecord, InvoiceRecord, InvoicesPage};

/// Amounts are rendered with exactly two decimals, `"10.00"`.
fn amount(mut value: Decimal) -> String {
    value.rescale(2);
    value.to_string()
}

/// Invoice Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvoiceResponse {
    pub id: i64,
    pub number: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub reference: Option<String>,
    pub customer_name: String,
    /// Send back on update to detect concurrent edits
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
    pub invoice_items: Vec<InvoiceItemResponse>,
}

/// Invoice Item Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvoiceItemResponse {
    pub id: i64,
    pub invoice_id: i64,
    pub product_name: String,
    pub unit_price: String,
    pub quantity: u32,
    /// Always `unit_price * quantity`
    pub total_amount: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InvoiceRecord> for InvoiceResponse {
    fn from(invoice: InvoiceRecord) -> Self {
        Self {
            id: invoice.id.into_i64(),
            number: invoice.number,
            date: invoice.date.to_string(),
            reference: invoice.reference,
            customer_name: invoice.customer_name,
            version: invoice.version,
            created_at: invoice.created_at.to_string(),
            updated_at: invoice.updated_at.to_string(),
            invoice_items: invoice.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<InvoiceItemRecord> for InvoiceItemResponse {
    fn from(item: InvoiceItemRecord) -> Self {
        Self {
            id: item.id.into_i64(),
            invoice_id: item.invoice_id.into_i64(),
            product_name: item.product_name,
            unit_price: amount(item.unit_price),
            quantity: item.quantity,
            total_amount: amount(item.total_amount),
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Invoice Envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvoiceEnvelope {
    pub message: String,
    pub data: InvoiceResponse,
}

impl InvoiceEnvelope {
    pub(crate) fn new(message: &str, invoice: InvoiceRecord) -> Self {
        Self {
            message: message.to_string(),
            data: invoice.into(),
        }
    }
}

/// Message Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

/// Invoices Page Response
///
/// Page links are relative to the API root and carry only the page number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvoicesPageResponse {
    pub current_page: u64,
    pub data: Vec<InvoiceResponse>,
    pub first_page_url: String,
    /// One-based position of the first invoice on this page
    pub from: Option<u64>,
    pub last_page: u64,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub path: String,
    pub per_page: u64,
    pub prev_page_url: Option<String>,
    /// One-based position of the last invoice on this page
    pub to: Option<u64>,
    pub total: u64,
}

impl InvoicesPageResponse {
    pub(crate) fn new(page: InvoicesPage, path: &str) -> Self {
        let url = |number: u64| format!("{path}?page={number}");

        let offset = page.page.saturating_sub(1).saturating_mul(page.per_page);
        let count = page.invoices.len() as u64;
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + count))
        };

        Self {
            current_page: page.page,
            first_page_url: url(1),
            from,
            last_page: page.last_page,
            last_page_url: url(page.last_page),
            next_page_url: (page.page < page.last_page).then(|| url(page.page + 1)),
            path: path.to_string(),
            per_page: page.per_page,
            prev_page_url: (page.page > 1).then(|| url(page.page - 1)),
            to,
            total: page.total,
            data: page.invoices.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::make_invoice;

    use super::*;

    #[test]
    fn invoice_response_formats_amounts_with_two_decimals() {
        let response = InvoiceResponse::from(make_invoice(7));

        assert_eq!(response.date, "2025-01-01");
        assert_eq!(response.invoice_items[0].unit_price, "10.00");
        assert_eq!(response.invoice_items[0].total_amount, "30.00");
        assert_eq!(response.invoice_items[0].invoice_id, 7);
    }

    #[test]
    fn page_response_links_neighbouring_pages() {
        let response = InvoicesPageResponse::new(
            InvoicesPage {
                invoices: vec![make_invoice(21), make_invoice(22), make_invoice(23)],
                page: 3,
                per_page: 10,
                total: 23,
                last_page: 3,
            },
            "/api/invoices",
        );

        assert_eq!(response.from, Some(21), "from");
        assert_eq!(response.to, Some(23), "to");
        assert_eq!(response.first_page_url, "/api/invoices?page=1");
        assert_eq!(response.last_page_url, "/api/invoices?page=3");
        assert_eq!(response.prev_page_url.as_deref(), Some("/api/invoices?page=2"));
        assert_eq!(response.next_page_url, None, "last page has no next");
    }

    #[test]
    fn empty_page_has_no_bounds() {
        let response = InvoicesPageResponse::new(
            InvoicesPage {
                invoices: Vec::new(),
                page: 9,
                per_page: 15,
                total: 4,
                last_page: 1,
            },
            "/api/invoices",
        );

        assert!(response.data.is_empty(), "past the end is empty");
        assert_eq!(response.from, None, "from");
        assert_eq!(response.to, None, "to");
        assert_eq!(response.current_page, 9);
        assert_eq!(response.next_page_url, None, "no next past the end");
    }
}
