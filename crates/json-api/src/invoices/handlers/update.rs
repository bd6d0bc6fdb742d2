//! Update Invoice Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde_json::Value;
use tracing::info;

use crate::{
    extensions::*,
    invoices::{
        errors::{Action, ApiError, into_api_error},
        requests::{InvoicePayload, parse_id},
        responses::InvoiceEnvelope,
    },
};

/// Update Invoice Handler
///
/// Replaces every field and the whole item set. Include the `version` last
/// read to have concurrent edits rejected with 409.
#[endpoint(tags("invoices"), summary = "Update Invoice")]
#[tracing::instrument(
    name = "invoices.update",
    skip_all,
    fields(invoice_id = tracing::field::Empty, items_count = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<Value>,
    depot: &mut Depot,
) -> Result<Json<InvoiceEnvelope>, ApiError> {
    let id = parse_id(&id.into_inner())?;
    let payload = InvoicePayload::parse(&json.into_inner())?;
    let state = depot.state_or_500()?;

    let span = tracing::Span::current();

    span.record("invoice_id", tracing::field::display(id));
    span.record("items_count", payload.items.len());

    let invoice = state
        .app
        .invoices
        .update_invoice(id, payload.into_update())
        .await
        .map_err(|error| into_api_error(error, Action::Update))?;

    info!(invoice_id = %id, version = invoice.version, "updated invoice");

    Ok(Json(InvoiceEnvelope::new("Invoice updated successfully", invoice)))
}
