//! Delete Invoice Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use crate::{
    extensions::*,
    invoices::{
        errors::{Action, ApiError, into_api_error},
        requests::parse_id,
        responses::MessageResponse,
    },
};

/// Delete Invoice Handler
///
/// Removes the invoice and all of its items.
#[endpoint(tags("invoices"), summary = "Delete Invoice")]
#[tracing::instrument(
    name = "invoices.delete",
    skip_all,
    fields(invoice_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id.into_inner())?;
    let state = depot.state_or_500()?;

    tracing::Span::current().record("invoice_id", tracing::field::display(id));

    state
        .app
        .invoices
        .delete_invoice(id)
        .await
        .map_err(|error| into_api_error(error, Action::Delete))?;

    info!(invoice_id = %id, "deleted invoice");

    Ok(Json(MessageResponse {
        message: "Invoice deleted successfully".to_string(),
    }))
}
