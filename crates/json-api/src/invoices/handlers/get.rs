//! Get Invoice Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    invoices::{
        errors::{Action, ApiError, into_api_error},
        requests::parse_id,
        responses::InvoiceResponse,
    },
};

/// Get Invoice Handler
///
/// Returns a single invoice with its items.
#[endpoint(tags("invoices"), summary = "Get Invoice")]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let id = parse_id(&id.into_inner())?;
    let state = depot.state_or_500()?;

    let invoice = state
        .app
        .invoices
        .get_invoice(id)
        .await
        .map_err(|error| into_api_error(error, Action::Fetch))?;

    Ok(Json(invoice.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use invoicing_app::invoices::{InvoicesServiceError, MockInvoicesService, records::InvoiceId};

    use crate::test_helpers::{invoices_service, make_invoice};

    use super::*;

    fn make_service(invoices: MockInvoicesService) -> Service {
        invoices_service(invoices, Router::with_path("api/invoices/{id}").get(handler))
    }

    #[tokio::test]
    async fn test_get_invoice_success() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_get_invoice()
            .once()
            .withf(|id| *id == InvoiceId::from_i64(5))
            .return_once(|_| Ok(make_invoice(5)));

        let mut res = TestClient::get("http://example.com/api/invoices/5")
            .send(&make_service(invoices))
            .await;

        let body: InvoiceResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.id, 5);
        assert_eq!(body.number, "INV-005");
        assert_eq!(body.invoice_items.len(), 1, "items attached");
        assert_eq!(body.invoice_items[0].unit_price, "10.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invoice_not_found_returns_404() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_get_invoice()
            .once()
            .return_once(|_| Err(InvoicesServiceError::NotFound));

        let mut res = TestClient::get("http://example.com/api/invoices/99")
            .send(&make_service(invoices))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body["message"], "Invoice not found");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invoice_with_non_numeric_id_returns_404() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices.expect_get_invoice().never();

        let res = TestClient::get("http://example.com/api/invoices/first")
            .send(&make_service(invoices))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
