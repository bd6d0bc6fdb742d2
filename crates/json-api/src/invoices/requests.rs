//! Invoice Request Parsing
//!
//! Request bodies are taken as raw JSON and checked field by field so that
//! every problem is reported at once, keyed by its path (`items.0.quantity`).

use std::str::FromStr;

use jiff::{Timestamp, civil, tz::TimeZone};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use invoicing_app::invoices::{
    data::{InvoiceFilter, InvoiceUpdate, NewInvoice, NewInvoiceItem, PageRequest},
    records::InvoiceId,
};

use super::errors::{ApiError, FieldErrors};

const MAX_STRING_LENGTH: usize = 255;

/// Validated invoice body shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvoicePayload {
    pub number: String,
    pub date: civil::Date,
    pub reference: Option<String>,
    pub customer_name: String,
    pub items: Vec<NewInvoiceItem>,
    pub version: Option<i64>,
}

impl InvoicePayload {
    /// Validate a raw JSON body. A body that is not an object fails every
    /// required field.
    pub(crate) fn parse(body: &Value) -> Result<Self, ApiError> {
        let empty = Map::new();
        let body = body.as_object().unwrap_or(&empty);

        let mut errors = FieldErrors::default();

        let number = required_string(body, "number", &mut errors);
        let date = required_date(body, "date", &mut errors);
        let reference = optional_string(body, "reference", &mut errors);
        let customer_name = required_string(body, "customer_name", &mut errors);
        let items = item_list(body, &mut errors);
        let version = optional_version(body, "version", &mut errors);

        match (number, date, customer_name, items) {
            (Some(number), Some(date), Some(customer_name), Some(items)) if errors.is_empty() => {
                Ok(Self {
                    number,
                    date,
                    reference,
                    customer_name,
                    items,
                    version,
                })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }

    pub(crate) fn into_new_invoice(self) -> NewInvoice {
        NewInvoice {
            number: self.number,
            date: self.date,
            reference: self.reference,
            customer_name: self.customer_name,
            items: self.items,
        }
    }

    pub(crate) fn into_update(self) -> InvoiceUpdate {
        InvoiceUpdate {
            number: self.number,
            date: self.date,
            reference: self.reference,
            customer_name: self.customer_name,
            items: self.items,
            expected_version: self.version,
        }
    }
}

/// Raw list query parameters.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListParams {
    pub customer_name: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    /// Blank values are ignored and unparsable page numbers fall back to
    /// their defaults. Only a bad date is rejected.
    pub(crate) fn parse(self) -> Result<(InvoiceFilter, PageRequest), ApiError> {
        let mut errors = FieldErrors::default();

        let date_from = filter_date(self.date_from, "date_from", &mut errors);
        let date_to = filter_date(self.date_to, "date_to", &mut errors);

        let filter = InvoiceFilter {
            customer_name: non_blank(self.customer_name),
            date_from,
            date_to,
        };

        let defaults = PageRequest::default();

        let page = PageRequest::new(
            parse_count(self.page).unwrap_or(defaults.page()),
            parse_count(self.per_page).unwrap_or(defaults.per_page()),
        );

        errors.into_result((filter, page))
    }
}

/// Unknown or malformed ids cannot name an invoice.
pub(crate) fn parse_id(raw: &str) -> Result<InvoiceId, ApiError> {
    raw.parse().map_err(|_ignored| ApiError::NotFound)
}

/// Largest value a `NUMERIC(10, 2)` column holds.
fn max_unit_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn required(field: &str) -> String {
    format!("The {} field is required.", attribute(field))
}

fn must_be(field: &str, rule: &str) -> String {
    format!("The {} field must be {rule}.", attribute(field))
}

fn too_long(field: &str) -> String {
    format!(
        "The {} field must not be greater than {MAX_STRING_LENGTH} characters.",
        attribute(field)
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(values)) => values.is_empty(),
        Some(_) => false,
    }
}

fn string_value(value: &Value, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let Value::String(text) = value else {
        errors.add(field, must_be(field, "a string"));
        return None;
    };

    let text = text.trim();

    if text.chars().count() > MAX_STRING_LENGTH {
        errors.add(field, too_long(field));
        return None;
    }

    Some(text.to_string())
}

fn required_string(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = body.get(field);

    if is_missing(value) {
        errors.add(field, required(field));
        return None;
    }

    string_value(value?, field, errors)
}

fn optional_string(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = body.get(field);

    if is_missing(value) {
        return None;
    }

    string_value(value?, field, errors)
}

fn parse_date(text: &str) -> Option<civil::Date> {
    let text = text.trim();

    text.parse::<civil::Date>()
        .ok()
        .or_else(|| text.parse::<civil::DateTime>().ok().map(|value| value.date()))
        .or_else(|| {
            text.parse::<Timestamp>()
                .ok()
                .map(|value| value.to_zoned(TimeZone::UTC).date())
        })
}

fn required_date(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<civil::Date> {
    let value = body.get(field);

    if is_missing(value) {
        errors.add(field, required(field));
        return None;
    }

    let date = value.and_then(Value::as_str).and_then(parse_date);

    if date.is_none() {
        errors.add(field, must_be(field, "a valid date"));
    }

    date
}

fn filter_date(
    value: Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<civil::Date> {
    let value = non_blank(value)?;
    let date = parse_date(&value);

    if date.is_none() {
        errors.add(field, must_be(field, "a valid date"));
    }

    date
}

fn parse_count(value: Option<String>) -> Option<u64> {
    non_blank(value)?
        .parse::<i64>()
        .ok()
        .map(|count| count.max(1).unsigned_abs())
}

fn optional_version(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<i64> {
    let value = body.get(field);

    if is_missing(value) {
        return None;
    }

    match integer(value?) {
        Some(version) if version >= 1 => Some(version),
        Some(_) => {
            errors.add(field, must_be(field, "at least 1"));
            None
        }
        None => {
            errors.add(field, must_be(field, "an integer"));
            None
        }
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_ignored| Decimal::from_scientific(&text))
        .ok()
}

fn item_list(body: &Map<String, Value>, errors: &mut FieldErrors) -> Option<Vec<NewInvoiceItem>> {
    let value = body.get("items");

    if is_missing(value) {
        errors.add("items", required("items"));
        return None;
    }

    let Some(Value::Array(values)) = value else {
        errors.add("items", must_be("items", "an array"));
        return None;
    };

    let empty = Map::new();
    let mut items = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        let item = value.as_object().unwrap_or(&empty);

        if let Some(item) = invoice_item(item, index, errors) {
            items.push(item);
        }
    }

    (items.len() == values.len()).then_some(items)
}

fn invoice_item(
    item: &Map<String, Value>,
    index: usize,
    errors: &mut FieldErrors,
) -> Option<NewInvoiceItem> {
    let product_name = {
        let field = format!("items.{index}.product_name");

        if is_missing(item.get("product_name")) {
            errors.add(&field, required(&field));
            None
        } else {
            item.get("product_name")
                .and_then(|value| string_value(value, &field, errors))
        }
    };

    let unit_price = unit_price(
        item.get("unit_price"),
        &format!("items.{index}.unit_price"),
        errors,
    );
    let quantity = quantity(item.get("quantity"), &format!("items.{index}.quantity"), errors);

    Some(NewInvoiceItem {
        product_name: product_name?,
        unit_price: unit_price?,
        quantity: quantity?,
    })
}

fn unit_price(value: Option<&Value>, field: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    if is_missing(value) {
        errors.add(field, required(field));
        return None;
    }

    let Some(price) = value.and_then(decimal) else {
        errors.add(field, must_be(field, "a number"));
        return None;
    };

    if price < Decimal::ZERO {
        errors.add(field, must_be(field, "at least 0"));
        return None;
    }

    if price > max_unit_price() {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {}.",
                attribute(field),
                max_unit_price()
            ),
        );
        return None;
    }

    Some(price)
}

fn quantity(value: Option<&Value>, field: &str, errors: &mut FieldErrors) -> Option<u32> {
    if is_missing(value) {
        errors.add(field, required(field));
        return None;
    }

    let Some(quantity) = value.and_then(integer) else {
        errors.add(field, must_be(field, "an integer"));
        return None;
    };

    if quantity < 1 {
        errors.add(field, must_be(field, "at least 1"));
        return None;
    }

    match i32::try_from(quantity).ok().and_then(|quantity| u32::try_from(quantity).ok()) {
        Some(quantity) => Some(quantity),
        None => {
            errors.add(
                field,
                format!("The {} field must not be greater than {}.", attribute(field), i32::MAX),
            );
            None
        }
    }
}
