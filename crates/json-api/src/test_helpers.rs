//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use invoicing_app::{
    context::AppContext,
    invoices::{
        MockInvoicesService,
        records::{InvoiceId, InvoiceItemId, InvoiceItemRecord, InvoiceRecord},
    },
};

use crate::state::State;

/// Invoice `INV-{id}` dated 2025-01-01 with one `Widget` line of 3 x 10.00.
pub(crate) fn make_invoice(id: i64) -> InvoiceRecord {
    InvoiceRecord {
        id: InvoiceId::from_i64(id),
        number: format!("INV-{id:03}"),
        date: date(2025, 1, 1),
        reference: None,
        customer_name: "Acme".to_string(),
        version: 1,
        items: vec![InvoiceItemRecord {
            id: InvoiceItemId::from_i64(id * 10),
            invoice_id: InvoiceId::from_i64(id),
            product_name: "Widget".to_string(),
            unit_price: Decimal::from(10),
            quantity: 3,
            total_amount: Decimal::from(30),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn state_with_invoices(invoices: MockInvoicesService) -> Arc<State> {
    State::from_app_context(AppContext {
        invoices: Arc::new(invoices),
    })
}

pub(crate) fn invoices_service(invoices: MockInvoicesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_invoices(invoices)))
            .push(route),
    )
}
