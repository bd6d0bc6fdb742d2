//! Edit Modal State
//!
//! The editor never touches the invoice it was opened from. It works on a
//! draft of plain strings so half-typed values survive until validation.

use jiff::Zoned;
use rust_decimal::Decimal;

use crate::{
    models::{Invoice, InvoiceItem},
    validation::FieldErrors,
};

const AMOUNT_SCALE: u32 = 2;

/// Whether the editor accepts changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Read-only
    View,
    /// Draft can be changed and saved
    Edit,
}

/// Editable copy of an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Invoice number
    pub number: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Empty for no reference
    pub reference: String,
    /// Billed customer
    pub customer_name: String,
    /// Lines in display order
    pub items: Vec<DraftItem>,
}

/// Editable invoice line; `id` is `None` for lines added in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftItem {
    /// Stored line id
    pub id: Option<i64>,
    /// Product description as typed
    pub product_name: String,
    /// Unit price as typed
    pub unit_price: String,
    /// Quantity as typed
    pub quantity: String,
}

/// Item field a user can type into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    /// [`DraftItem::product_name`]
    ProductName,
    /// [`DraftItem::unit_price`]
    UnitPrice,
    /// [`DraftItem::quantity`]
    Quantity,
}

fn format_amount(mut value: Decimal) -> String {
    value.rescale(AMOUNT_SCALE);
    value.to_string()
}

impl DraftItem {
    /// The price truncated to cents times the quantity, as the server stores it.
    /// `None` while either is not a number.
    pub fn line_total(&self) -> Option<Decimal> {
        let unit_price = self.unit_price.trim().parse::<Decimal>().ok()?;
        let quantity = self.quantity.trim().parse::<u32>().ok()?;

        unit_price
            .trunc_with_scale(AMOUNT_SCALE)
            .checked_mul(Decimal::from(quantity))
            .map(|total| total.trunc_with_scale(AMOUNT_SCALE))
    }
}

impl From<&InvoiceItem> for DraftItem {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            id: Some(item.id),
            product_name: item.product_name.clone(),
            unit_price: format_amount(item.unit_price),
            quantity: item.quantity.to_string(),
        }
    }
}

impl From<&Invoice> for InvoiceDraft {
    fn from(invoice: &Invoice) -> Self {
        Self {
            number: invoice.number.clone(),
            date: invoice.date.to_string(),
            reference: invoice.reference.clone().unwrap_or_default(),
            customer_name: invoice.customer_name.clone(),
            items: invoice.invoice_items.iter().map(DraftItem::from).collect(),
        }
    }
}

impl InvoiceDraft {
    /// Live total of the lines that currently parse.
    pub fn total(&self) -> Decimal {
        self.items.iter().filter_map(DraftItem::line_total).sum()
    }
}

/// Modal editor over one invoice.
#[derive(Debug, Clone)]
pub struct Editor {
    mode: EditorMode,
    original: Invoice,
    draft: InvoiceDraft,
    errors: FieldErrors,
}

impl Editor {
    /// Open an editor on a copy of `invoice`.
    pub fn open(mode: EditorMode, invoice: &Invoice) -> Self {
        Self {
            mode,
            original: invoice.clone(),
            draft: InvoiceDraft::from(invoice),
            errors: FieldErrors::default(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The invoice as it was when opened.
    pub fn original(&self) -> &Invoice {
        &self.original
    }

    /// The edit buffer.
    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    /// Mutable edit buffer for direct field edits.
    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    /// Field errors from the last failed save.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Throw away every edit and start again from the original.
    pub fn reset(&mut self) {
        self.draft = InvoiceDraft::from(&self.original);
        self.errors = FieldErrors::default();
    }

    /// Whether the draft differs from the original.
    pub fn has_changes(&self) -> bool {
        self.draft != InvoiceDraft::from(&self.original)
    }

    /// Append a blank line with quantity 1.
    pub fn add_item(&mut self) {
        self.draft.items.push(DraftItem {
            id: None,
            product_name: String::new(),
            unit_price: format_amount(Decimal::ZERO),
            quantity: "1".to_string(),
        });
    }

    /// Remove and return the line at `index`, if any.
    pub fn remove_item(&mut self, index: usize) -> Option<DraftItem> {
        (index < self.draft.items.len()).then(|| self.draft.items.remove(index))
    }

    /// Returns `false` when there is no item at `index`.
    pub fn update_item(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> bool {
        let Some(item) = self.draft.items.get_mut(index) else {
            return false;
        };

        let value = value.into();

        match field {
            ItemField::ProductName => item.product_name = value,
            ItemField::UnitPrice => item.unit_price = value,
            ItemField::Quantity => item.quantity = value,
        }

        true
    }

    /// Live total of the draft.
    pub fn total(&self) -> Decimal {
        self.draft.total()
    }

    /// Replace the number with `INV-YYYYMMDD-NNNN`, the suffix taken from the
    /// clock's milliseconds.
    pub fn suggest_number(&mut self, now: &Zoned) {
        let suffix = now.timestamp().as_millisecond().rem_euclid(10_000);

        self.draft.number = format!("INV-{}-{suffix:04}", now.strftime("%Y%m%d"));
        self.errors = FieldErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date, tz::TimeZone};

    use super::*;

    fn invoice() -> Invoice {
        let item = |id: i64, name: &str, price: i64, quantity: u32| InvoiceItem {
            id,
            invoice_id: 1,
            product_name: name.to_string(),
            unit_price: Decimal::new(price, 2),
            quantity,
            total_amount: Decimal::new(price * i64::from(quantity), 2),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };

        Invoice {
            id: 1,
            number: "INV-001".to_string(),
            date: date(2025, 1, 1),
            reference: Some("PO-1".to_string()),
            customer_name: "Acme".to_string(),
            version: 1,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            invoice_items: vec![item(10, "Widget", 1000, 3), item(11, "Gadget", 250, 2)],
        }
    }

    #[test]
    fn draft_is_a_deep_copy() {
        let original = invoice();
        let mut editor = Editor::open(EditorMode::Edit, &original);

        editor.draft_mut().customer_name = "Beta".to_string();
        editor.update_item(0, ItemField::ProductName, "Sprocket");

        assert_eq!(editor.original(), &original, "original untouched");
        assert_eq!(editor.draft().items[0].unit_price, "10.00");
        assert!(editor.has_changes(), "edits are detected");
    }

    #[test]
    fn line_totals_follow_edits_and_truncate() {
        let mut editor = Editor::open(EditorMode::Edit, &invoice());

        assert_eq!(editor.total(), Decimal::new(3500, 2));

        editor.update_item(1, ItemField::UnitPrice, "0.333");
        editor.update_item(1, ItemField::Quantity, "2");

        assert_eq!(editor.draft().items[1].line_total(), Some(Decimal::new(66, 2)));
        assert_eq!(editor.total(), Decimal::new(3066, 2));

        editor.update_item(1, ItemField::Quantity, "two");

        assert_eq!(editor.draft().items[1].line_total(), None, "unparsable line");
        assert_eq!(editor.total(), Decimal::new(3000, 2), "only parsable lines count");
    }

    #[test]
    fn line_total_truncates_price_before_multiplying() {
        let item = DraftItem {
            id: None,
            product_name: "Bolt".to_string(),
            unit_price: "0.335".to_string(),
            quantity: "3".to_string(),
        };

        assert_eq!(item.line_total(), Some(Decimal::new(99, 2)), "0.33 x 3");
    }

    #[test]
    fn reset_restores_original() {
        let mut editor = Editor::open(EditorMode::Edit, &invoice());

        editor.add_item();
        editor.remove_item(0);
        editor.set_errors({
            let mut errors = FieldErrors::default();
            errors.add("number", "The number field is required.");
            errors
        });

        assert!(editor.has_changes(), "items changed");

        editor.reset();

        assert!(!editor.has_changes(), "draft matches original again");
        assert!(editor.errors().is_empty(), "errors cleared");
    }

    #[test]
    fn item_edits_out_of_range_are_ignored() {
        let mut editor = Editor::open(EditorMode::Edit, &invoice());

        assert!(!editor.update_item(5, ItemField::Quantity, "1"), "no item 5");
        assert_eq!(editor.remove_item(5), None);
        assert!(!editor.has_changes(), "nothing changed");
    }

    #[test]
    fn new_items_start_blank_with_quantity_one() {
        let mut editor = Editor::open(EditorMode::Edit, &invoice());

        editor.add_item();

        assert_eq!(
            editor.draft().items.last(),
            Some(&DraftItem {
                id: None,
                product_name: String::new(),
                unit_price: "0.00".to_string(),
                quantity: "1".to_string(),
            })
        );
    }

    #[test]
    fn suggested_number_uses_date_and_clock() -> testresult::TestResult {
        let now = "2025-03-09T12:00:01.234Z"
            .parse::<Timestamp>()?
            .to_zoned(TimeZone::UTC);
        let mut editor = Editor::open(EditorMode::Edit, &invoice());

        editor.suggest_number(&now);

        assert_eq!(editor.draft().number, "INV-20250309-1234");

        Ok(())
    }
}
