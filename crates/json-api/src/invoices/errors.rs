//! Invoice API Errors

use std::collections::BTreeMap;

use salvo::{
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use invoicing_app::invoices::InvoicesServiceError;

/// Message returned with every 422 response.
pub(crate) const VALIDATION_FAILED: &str = "Validation failed";

/// Field error for a number that another invoice already uses.
pub(crate) const NUMBER_TAKEN: &str = "The number has already been taken.";

/// Validation messages keyed by field path (`number`, `items.0.unit_price`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub(crate) struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub(crate) fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub(crate) fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();

        errors.add(field, message);

        errors
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no errors were collected.
    pub(crate) fn into_result<T>(self, value: T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Human-readable summary
    pub message: String,

    /// Per-field validation messages, present on 422 responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Operation a request was performing, named in 500 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Create,
    Update,
    Delete,
    Fetch,
}

impl Action {
    fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create invoice",
            Self::Update => "Failed to update invoice",
            Self::Delete => "Failed to delete invoice",
            Self::Fetch => "Failed to fetch invoices",
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// 422 with per-field messages.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// 404.
    #[error("invoice not found")]
    NotFound,

    /// 409, the invoice changed since the submitted version.
    #[error("invoice version is stale")]
    Conflict,

    /// 500 with a generic message; the cause has already been logged.
    #[error("{}", .0.failure_message())]
    Failed(Action),

    /// Framework-level failure rendered as-is.
    #[error(transparent)]
    Status(StatusError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Status(error) => error.code,
        }
    }
}

impl From<StatusError> for ApiError {
    fn from(error: StatusError) -> Self {
        Self::Status(error)
    }
}

pub(crate) fn into_api_error(error: InvoicesServiceError, action: Action) -> ApiError {
    match error {
        InvoicesServiceError::DuplicateNumber => {
            ApiError::Validation(FieldErrors::single("number", NUMBER_TAKEN))
        }
        InvoicesServiceError::NotFound => ApiError::NotFound,
        InvoicesServiceError::StaleVersion => ApiError::Conflict,
        InvoicesServiceError::InvalidReference
        | InvoicesServiceError::MissingRequiredData
        | InvoicesServiceError::InvalidData => {
            error!("{}: rejected by store: {error}", action.failure_message());

            ApiError::Failed(action)
        }
        InvoicesServiceError::Sql(ref source) => {
            error!("{}: {source}", action.failure_message());

            ApiError::Failed(action)
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        let status = self.status_code();

        let body = match self {
            Self::Status(error) => {
                res.render(error);
                return;
            }
            Self::Validation(errors) => ErrorResponse {
                message: VALIDATION_FAILED.to_string(),
                errors: Some(errors),
            },
            Self::NotFound => ErrorResponse {
                message: "Invoice not found".to_string(),
                errors: None,
            },
            Self::Conflict => ErrorResponse {
                message: "Invoice was modified by another request. Reload it and try again."
                    .to_string(),
                errors: None,
            },
            Self::Failed(action) => ErrorResponse {
                message: action.failure_message().to_string(),
                errors: None,
            },
        };

        res.status_code(status);
        res.render(Json(body));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::NOT_FOUND, "Invoice not found"),
            (StatusCode::CONFLICT, "Invoice version is stale"),
            (StatusCode::UNPROCESSABLE_ENTITY, VALIDATION_FAILED),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ErrorResponse::to_schema(components)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_number_becomes_number_field_error() {
        let error = into_api_error(InvoicesServiceError::DuplicateNumber, Action::Create);

        let ApiError::Validation(errors) = error else {
            panic!("expected validation error, got {error:?}");
        };

        assert_eq!(errors.get("number"), Some([NUMBER_TAKEN.to_string()].as_slice()));
    }

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(
            into_api_error(InvoicesServiceError::NotFound, Action::Update).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            into_api_error(InvoicesServiceError::StaleVersion, Action::Update).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            into_api_error(InvoicesServiceError::InvalidData, Action::Delete).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_rejections_become_generic_failures() {
        for error in [
            InvoicesServiceError::InvalidReference,
            InvoicesServiceError::MissingRequiredData,
            InvoicesServiceError::InvalidData,
        ] {
            let error = into_api_error(error, Action::Create);

            assert!(
                matches!(error, ApiError::Failed(Action::Create)),
                "expected generic failure, got {error:?}"
            );
            assert_eq!(error.to_string(), "Failed to create invoice");
        }
    }

    #[test]
    fn field_errors_serialize_as_plain_map() -> testresult::TestResult {
        let mut errors = FieldErrors::default();

        errors.add("items.0.quantity", "The items.0.quantity field must be at least 1.");
        errors.add("number", "The number field is required.");

        assert_eq!(
            serde_json::to_value(&errors)?,
            serde_json::json!({
                "items.0.quantity": ["The items.0.quantity field must be at least 1."],
                "number": ["The number field is required."],
            })
        );

        Ok(())
    }
}
