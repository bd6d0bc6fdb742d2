//! Invoices

mod errors;
mod handlers;
mod requests;
mod responses;

use salvo::Router;

pub(crate) use handlers::*;

/// Public path of the invoice collection, used for page links.
pub(crate) const INVOICES_PATH: &str = "/api/invoices";

/// `/invoices` routes, mounted under `/api`.
///
/// `search` is registered ahead of `{id}` so it is never taken for an id.
pub(crate) fn router() -> Router {
    Router::with_path("invoices")
        .get(index::handler)
        .post(create::handler)
        .push(Router::with_path("search").get(search::handler))
        .push(
            Router::with_path("{id}")
                .get(get::handler)
                .put(update::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::Value;
    use testresult::TestResult;

    use invoicing_app::invoices::MockInvoicesService;

    use crate::test_helpers::invoices_service;

    use super::*;

    #[tokio::test]
    async fn search_route_is_not_captured_by_id() -> TestResult {
        let mut invoices = MockInvoicesService::new();

        invoices
            .expect_search_invoices()
            .once()
            .withf(|term| term == "acme")
            .return_once(|_| Ok(vec![]));

        invoices.expect_get_invoice().never();

        let service = invoices_service(invoices, Router::with_path("api").push(router()));

        let mut res = TestClient::get("http://example.com/api/invoices/search?q=acme")
            .send(&service)
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, serde_json::json!([]));

        Ok(())
    }
}
