//! Invoice Search Handler

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    invoices::{
        errors::{Action, ApiError, into_api_error},
        responses::InvoiceResponse,
    },
};

/// Invoice Search Handler
///
/// Matches `q` against number, customer, reference, date, item names and
/// invoice totals. A missing or blank `q` matches nothing.
#[endpoint(tags("invoices"), summary = "Search Invoices")]
pub(crate) async fn handler(
    q: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    let Some(term) = q
        .into_inner()
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
    else {
        return Ok(Json(Vec::new()));
    };

    let state = depot.state_or_500()?;

    let invoices = state
        .app
        .invoices
        .search_invoices(term)
        .await
        .map_err(|error| into_api_error(error, Action::Fetch))?;

    Ok(Json(invoices.into_iter().map(Into::into).collect()))
}
