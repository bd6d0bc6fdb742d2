//! Invoicing API transport.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    models::{Invoice, InvoicePage, InvoicePayload, ListQuery},
    validation::FieldErrors,
};

/// Errors that can occur when talking to the invoicing API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API rejected the request body (422).
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The invoice does not exist (404).
    #[error("invoice not found")]
    NotFound,

    /// The invoice changed after it was loaded (409).
    #[error("invoice was modified by another request")]
    Conflict,

    /// Any other non-2xx response.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// The body's `message`, or the canonical reason
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    errors: Option<FieldErrors>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Decode a non-2xx response body.
fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let body: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::CONFLICT => ApiError::Conflict,
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(body.errors.unwrap_or_default()),
        _ => ApiError::Server {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
        },
    }
}

/// Invoice operations the board needs from the server.
#[automock]
#[async_trait]
pub trait InvoicesApi: Send + Sync {
    /// Fetch one page of invoices.
    async fn list_invoices(&self, query: ListQuery) -> Result<InvoicePage, ApiError>;

    /// Free-text search; the term is sent as typed.
    async fn search_invoices(&self, term: String) -> Result<Vec<Invoice>, ApiError>;

    /// Fetch one invoice with its items.
    async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError>;

    /// Create an invoice.
    async fn create_invoice(&self, payload: InvoicePayload) -> Result<Invoice, ApiError>;

    /// Replace an invoice; send `version` to have concurrent edits rejected.
    async fn update_invoice(&self, id: i64, payload: InvoicePayload)
    -> Result<Invoice, ApiError>;

    /// Delete an invoice and its items.
    async fn delete_invoice(&self, id: i64) -> Result<(), ApiError>;
}

/// [`InvoicesApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpInvoicesApi {
    base_url: String,
    http: Client,
}

impl HttpInvoicesApi {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    /// Like [`Self::new`] with a preconfigured reqwest client.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/invoices{path}", self.base_url)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        tracing::debug!(status = status.as_u16(), "invoicing api request failed");

        Err(error_from_response(status, &body))
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        Ok(Self::send(request).await?.json().await?)
    }
}

#[async_trait]
impl InvoicesApi for HttpInvoicesApi {
    async fn list_invoices(&self, query: ListQuery) -> Result<InvoicePage, ApiError> {
        Self::json(self.http.get(self.url("")).query(&query)).await
    }

    async fn search_invoices(&self, term: String) -> Result<Vec<Invoice>, ApiError> {
        Self::json(self.http.get(self.url("/search")).query(&[("q", term)])).await
    }

    async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError> {
        Self::json(self.http.get(self.url(&format!("/{id}")))).await
    }

    async fn create_invoice(&self, payload: InvoicePayload) -> Result<Invoice, ApiError> {
        let envelope: Envelope<Invoice> =
            Self::json(self.http.post(self.url("")).json(&payload)).await?;

        Ok(envelope.data)
    }

    async fn update_invoice(
        &self,
        id: i64,
        payload: InvoicePayload,
    ) -> Result<Invoice, ApiError> {
        let envelope: Envelope<Invoice> =
            Self::json(self.http.put(self.url(&format!("/{id}"))).json(&payload)).await?;

        Ok(envelope.data)
    }

    async fn delete_invoice(&self, id: i64) -> Result<(), ApiError> {
        Self::send(self.http.delete(self.url(&format!("/{id}")))).await?;

        Ok(())
    }
}
