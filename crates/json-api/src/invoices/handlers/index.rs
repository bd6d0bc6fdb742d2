//! Invoice Index Handler

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    invoices::{
        INVOICES_PATH,
        errors::{Action, ApiError, into_api_error},
        requests::ListParams,
        responses::InvoicesPageResponse,
    },
};

/// Invoice Index Handler
///
/// Returns one page of invoices, newest date first. Blank parameters are
/// ignored; `per_page` is clamped to 1..=100.
#[endpoint(tags("invoices"), summary = "List Invoices")]
pub(crate) async fn handler(
    customer_name: QueryParam<String, false>,
    date_from: QueryParam<String, false>,
    date_to: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
    page: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<InvoicesPageResponse>, ApiError> {
    let state = depot.state_or_500()?;

    let (filter, page) = ListParams {
        customer_name: customer_name.into_inner(),
        date_from: date_from.into_inner(),
        date_to: date_to.into_inner(),
        per_page: per_page.into_inner(),
        page: page.into_inner(),
    }
    .parse()?;

    let invoices = state
        .app
        .invoices
        .list_invoices(filter, page)
        .await
        .map_err(|error| into_api_error(error, Action::Fetch))?;

    Ok(Json(InvoicesPageResponse::new(invoices, INVOICES_PATH)))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use invoicing_app::invoices::{
        InvoicesServiceError, MockInvoicesService,
        data::{InvoiceFilter, PageRequest},
        records::InvoicesPage,
    };

    use crate::test_helpers::{invoices_service, make_invoice};

    use super::*;

    fn make_service(invoices: MockInvoicesService) -> Service {
        invoices_service(invoices, Router::with_path("api/invoices").get(handler))
    }

    fn empty_page(page: PageRequest) -> InvoicesPage {
        InvoicesPage {
            invoices: vec![],
            page: page.page(),
            per_page: page.per_page(),
            total: 0,
            last_page: 1,
        }
    }

    #[tokio::test]
    async fn test_index_uses_default_page() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_list_invoices()
            .once()
            .withf(|filter, page| {
                *filter == InvoiceFilter::default() && *page == PageRequest::default()
            })
            .return_once(|_, page| Ok(empty_page(page)));

        let mut res = TestClient::get("http://example.com/api/invoices")
            .send(&make_service(invoices))
            .await;

        let body: InvoicesPageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.per_page, 15);
        assert_eq!(body.current_page, 1);
        assert!(body.data.is_empty(), "no invoices");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters_and_clamps_page_size() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_list_invoices()
            .once()
            .withf(|filter, page| {
                *filter
                    == InvoiceFilter {
                        customer_name: Some("acme".to_string()),
                        date_from: Some(date(2025, 1, 1)),
                        date_to: Some(date(2025, 1, 31)),
                    }
                    && *page == PageRequest::new(2, 100)
            })
            .return_once(|_, page| Ok(empty_page(page)));

        let res = TestClient::get(
            "http://example.com/api/invoices?customer_name=acme&date_from=2025-01-01\
             &date_to=2025-01-31&per_page=1000&page=2",
        )
        .send(&make_service(invoices))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_renders_page_descriptor() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_list_invoices()
            .once()
            .return_once(|_, _| {
                Ok(InvoicesPage {
                    invoices: vec![make_invoice(3), make_invoice(2), make_invoice(1)],
                    page: 3,
                    per_page: 10,
                    total: 23,
                    last_page: 3,
                })
            });

        let body: Value = TestClient::get("http://example.com/api/invoices?per_page=10&page=3")
            .send(&make_service(invoices))
            .await
            .take_json()
            .await?;

        assert_eq!(body["total"], 23);
        assert_eq!(body["last_page"], 3);
        assert_eq!(body["from"], 21);
        assert_eq!(body["to"], 23);
        assert_eq!(body["next_page_url"], Value::Null);
        assert_eq!(body["prev_page_url"], "/api/invoices?page=2");
        assert_eq!(body["data"][0]["invoice_items"][0]["total_amount"], "30.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_bad_date_filter_with_422() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices.expect_list_invoices().never();

        let mut res = TestClient::get("http://example.com/api/invoices?date_to=soon")
            .send(&make_service(invoices))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["date_to"][0], "The date to field must be a valid date.");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_store_error_returns_500() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_list_invoices()
            .once()
            .return_once(|_, _| Err(InvoicesServiceError::InvalidData));

        let res = TestClient::get("http://example.com/api/invoices")
            .send(&make_service(invoices))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
