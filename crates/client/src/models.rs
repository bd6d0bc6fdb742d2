//! Wire Models

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Server-assigned id
    pub id: i64,
    /// Unique invoice number
    pub number: String,
    /// Invoice date
    pub date: Date,
    /// Optional customer reference, such as a PO number
    pub reference: Option<String>,
    /// Billed customer
    pub customer_name: String,
    /// Bumped on every update; echoed back to detect concurrent edits
    pub version: i64,
    /// Creation time
    pub created_at: Timestamp,
    /// Last update time
    pub updated_at: Timestamp,
    /// Lines in insertion order
    pub invoice_items: Vec<InvoiceItem>,
}

impl Invoice {
    /// Sum of the server-computed item totals.
    pub fn total(&self) -> Decimal {
        self.invoice_items.iter().map(|item| item.total_amount).sum()
    }
}

/// Invoice line as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Server-assigned id
    pub id: i64,
    /// Owning invoice
    pub invoice_id: i64,
    /// Product description
    pub product_name: String,
    /// Price per unit, two decimals
    pub unit_price: Decimal,
    /// Units, at least 1
    pub quantity: u32,
    /// `unit_price * quantity`, computed by the server
    pub total_amount: Decimal,
    /// Creation time
    pub created_at: Timestamp,
    /// Last update time
    pub updated_at: Timestamp,
}

/// One page of the invoice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePage {
    /// One-based page number
    pub current_page: u64,
    /// Invoices on this page
    pub data: Vec<Invoice>,
    /// Last page number, at least 1
    pub last_page: u64,
    /// Page size used by the server
    pub per_page: u64,
    /// Matching invoices across all pages
    pub total: u64,
}

/// Body sent on create and update. Item totals are always computed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayload {
    /// Unique invoice number
    pub number: String,
    /// Invoice date
    pub date: Date,
    /// Optional customer reference
    pub reference: Option<String>,
    /// Billed customer
    pub customer_name: String,
    /// Version the edit was based on; omitted for last-write-wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Replaces the invoice's full item set
    pub items: Vec<InvoiceItemPayload>,
}

/// Invoice line in a create or update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemPayload {
    /// Product description
    pub product_name: String,
    /// Price per unit
    pub unit_price: Decimal,
    /// Units, at least 1
    pub quantity: u32,
}

/// List filters and page selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// Substring match on the customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Earliest invoice date, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<Date>,
    /// Latest invoice date, inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<Date>,
    /// Page size
    pub per_page: u64,
    /// One-based page number
    pub page: u64,
}

impl ListQuery {
    /// Unfiltered request for `page`.
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            customer_name: None,
            date_from: None,
            date_to: None,
            per_page,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn invoice_decodes_server_json() -> TestResult {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": 1,
            "number": "INV-100",
            "date": "2025-01-01",
            "reference": null,
            "customer_name": "Acme",
            "version": 1,
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-01T10:00:00Z",
            "invoice_items": [{
                "id": 10,
                "invoice_id": 1,
                "product_name": "Widget",
                "unit_price": "10.00",
                "quantity": 3,
                "total_amount": "30.00",
                "created_at": "2025-01-01T10:00:00Z",
                "updated_at": "2025-01-01T10:00:00Z",
            }],
        }))?;

        assert_eq!(invoice.total(), Decimal::new(3000, 2));
        assert_eq!(invoice.date, jiff::civil::date(2025, 1, 1));

        Ok(())
    }

    #[test]
    fn list_query_omits_absent_filters() -> TestResult {
        let query = serde_json::to_value(ListQuery::page(2, 10))?;

        assert_eq!(query, json!({ "per_page": 10, "page": 2 }));

        Ok(())
    }
}
