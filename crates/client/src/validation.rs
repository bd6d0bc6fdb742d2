//! Client-side validation, keyed and worded like the API's 422 errors so both
//! can be shown the same way.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    editor::{DraftItem, InvoiceDraft},
    models::{InvoiceItemPayload, InvoicePayload},
};

const MAX_STRING_LENGTH: usize = 255;

/// Message the API uses when another invoice already has the number.
const NUMBER_TAKEN: &str = "has already been taken";

/// Friendlier wording shown for a duplicate number.
pub const DUPLICATE_NUMBER_MESSAGE: &str =
    "This invoice number already exists. Please use a different number.";

/// Messages keyed by field path, e.g. `items.0.unit_price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Append `message` to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether no field has errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Fields and their messages, ordered by field.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Replace the server's duplicate-number message with one that tells the
    /// user what to do.
    #[must_use]
    pub fn rephrase_duplicate_number(mut self) -> Self {
        if let Some(messages) = self.0.get_mut("number") {
            for message in messages.iter_mut() {
                if message.contains(NUMBER_TAKEN) {
                    *message = DUPLICATE_NUMBER_MESSAGE.to_string();
                }
            }
        }

        self
    }
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn required(errors: &mut FieldErrors, field: &str) {
    errors.add(field, format!("The {} field is required.", attribute(field)));
}

fn must_be(errors: &mut FieldErrors, field: &str, rule: &str) {
    errors.add(field, format!("The {} field must be {rule}.", attribute(field)));
}

fn text(errors: &mut FieldErrors, field: &str, value: &str) -> Option<String> {
    let value = value.trim();

    if value.is_empty() {
        required(errors, field);
        return None;
    }

    if value.chars().count() > MAX_STRING_LENGTH {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {MAX_STRING_LENGTH} characters.",
                attribute(field)
            ),
        );
        return None;
    }

    Some(value.to_string())
}

/// Validate a draft and build the request body for it.
///
/// # Errors
///
/// Returns every problem found, keyed by field.
pub fn validate(draft: &InvoiceDraft, version: Option<i64>) -> Result<InvoicePayload, FieldErrors> {
    let mut errors = FieldErrors::default();

    let number = text(&mut errors, "number", &draft.number);
    let customer_name = text(&mut errors, "customer_name", &draft.customer_name);

    let date = if draft.date.trim().is_empty() {
        required(&mut errors, "date");
        None
    } else {
        let date = draft.date.trim().parse::<Date>().ok();

        if date.is_none() {
            must_be(&mut errors, "date", "a valid date");
        }

        date
    };

    let reference = if draft.reference.trim().is_empty() {
        None
    } else {
        text(&mut errors, "reference", &draft.reference)
    };

    if draft.items.is_empty() {
        required(&mut errors, "items");
    }

    let items: Vec<_> = draft
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| validate_item(&mut errors, index, item))
        .collect();

    match (number, date, customer_name) {
        (Some(number), Some(date), Some(customer_name)) if errors.is_empty() => Ok(InvoicePayload {
            number,
            date,
            reference,
            customer_name,
            version,
            items,
        }),
        _ => Err(errors),
    }
}

fn validate_item(
    errors: &mut FieldErrors,
    index: usize,
    item: &DraftItem,
) -> Option<InvoiceItemPayload> {
    let product_name = text(errors, &format!("items.{index}.product_name"), &item.product_name);

    let unit_price = {
        let field = format!("items.{index}.unit_price");

        match item.unit_price.trim() {
            "" => {
                required(errors, &field);
                None
            }
            raw => match raw.parse::<Decimal>() {
                Ok(price) if price < Decimal::ZERO => {
                    must_be(errors, &field, "at least 0");
                    None
                }
                Ok(price) => Some(price),
                Err(_) => {
                    must_be(errors, &field, "a number");
                    None
                }
            },
        }
    };

    let quantity = {
        let field = format!("items.{index}.quantity");

        match item.quantity.trim() {
            "" => {
                required(errors, &field);
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(quantity) if quantity < 1 => {
                    must_be(errors, &field, "at least 1");
                    None
                }
                Ok(quantity) => match u32::try_from(quantity) {
                    Ok(quantity) if i32::try_from(quantity).is_ok() => Some(quantity),
                    _ => {
                        errors.add(
                            field.clone(),
                            format!(
                                "The {} field must not be greater than {}.",
                                attribute(&field),
                                i32::MAX
                            ),
                        );
                        None
                    }
                },
                Err(_) => {
                    must_be(errors, &field, "an integer");
                    None
                }
            },
        }
    };

    Some(InvoiceItemPayload {
        product_name: product_name?,
        unit_price: unit_price?,
        quantity: quantity?,
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            number: "INV-100".to_string(),
            date: "2025-01-01".to_string(),
            reference: String::new(),
            customer_name: "Acme".to_string(),
            items: vec![DraftItem {
                id: None,
                product_name: "Widget".to_string(),
                unit_price: "10".to_string(),
                quantity: "3".to_string(),
            }],
        }
    }

    #[test]
    fn valid_draft_becomes_payload() -> TestResult {
        let payload = validate(&draft(), Some(2)).map_err(|errors| format!("{errors:?}"))?;

        assert_eq!(payload.date, date(2025, 1, 1));
        assert_eq!(payload.reference, None, "blank reference is omitted");
        assert_eq!(payload.version, Some(2));
        assert_eq!(
            payload.items,
            vec![InvoiceItemPayload {
                product_name: "Widget".to_string(),
                unit_price: Decimal::from(10),
                quantity: 3,
            }]
        );

        Ok(())
    }

    #[test]
    fn errors_use_api_keys_and_wording() {
        let mut draft = draft();

        draft.number = "  ".to_string();
        draft.date = "31/01/2025".to_string();
        draft.items.push(DraftItem {
            id: None,
            product_name: String::new(),
            unit_price: "-1".to_string(),
            quantity: "0".to_string(),
        });

        let Err(errors) = validate(&draft, None) else {
            panic!("draft should be rejected");
        };

        assert_eq!(
            errors.get("number"),
            Some(["The number field is required.".to_string()].as_slice())
        );
        assert_eq!(
            errors.get("date"),
            Some(["The date field must be a valid date.".to_string()].as_slice())
        );
        assert_eq!(
            errors.get("items.1.product_name"),
            Some(["The items.1.product name field is required.".to_string()].as_slice())
        );
        assert_eq!(
            errors.get("items.1.unit_price"),
            Some(["The items.1.unit price field must be at least 0.".to_string()].as_slice())
        );
        assert_eq!(
            errors.get("items.1.quantity"),
            Some(["The items.1.quantity field must be at least 1.".to_string()].as_slice())
        );
        assert!(errors.get("items.0.quantity").is_none(), "first item is fine");
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let mut draft = draft();

        draft.items.clear();

        let Err(errors) = validate(&draft, None) else {
            panic!("draft should be rejected");
        };

        assert_eq!(
            errors.get("items"),
            Some(["The items field is required.".to_string()].as_slice())
        );
    }

    #[test]
    fn duplicate_number_is_rephrased() {
        let mut errors = FieldErrors::default();

        errors.add("number", "The number has already been taken.");
        errors.add("date", "The date field is required.");

        let errors = errors.rephrase_duplicate_number();

        assert_eq!(
            errors.get("number"),
            Some([DUPLICATE_NUMBER_MESSAGE.to_string()].as_slice())
        );
        assert_eq!(
            errors.get("date"),
            Some(["The date field is required.".to_string()].as_slice()),
            "other fields untouched"
        );
    }
}
