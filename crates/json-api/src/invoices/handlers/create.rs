//! Create Invoice Handler

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde_json::Value;
use tracing::info;

use crate::{
    extensions::*,
    invoices::{
        INVOICES_PATH,
        errors::{Action, ApiError, into_api_error},
        requests::InvoicePayload,
        responses::InvoiceEnvelope,
    },
};

/// Create Invoice Handler
///
/// Validates the whole body before anything is written; the invoice and its
/// items are stored together or not at all.
#[endpoint(
    tags("invoices"),
    summary = "Create Invoice",
    responses((status_code = StatusCode::CREATED, description = "Invoice created")),
)]
#[tracing::instrument(
    name = "invoices.create",
    skip_all,
    fields(invoice_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<Value>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<InvoiceEnvelope>, ApiError> {
    let payload = InvoicePayload::parse(&json.into_inner())?;
    let state = depot.state_or_500()?;

    let invoice = state
        .app
        .invoices
        .create_invoice(payload.into_new_invoice())
        .await
        .map_err(|error| into_api_error(error, Action::Create))?;

    let id = invoice.id;

    tracing::Span::current().record("invoice_id", tracing::field::display(id));

    res.add_header(LOCATION, format!("{INVOICES_PATH}/{id}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    info!(invoice_id = %id, number = %invoice.number, "created invoice");

    Ok(Json(InvoiceEnvelope::new("Invoice created successfully", invoice)))
}
