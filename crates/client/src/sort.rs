//! Column Sorting

use std::{cmp::Ordering, str::FromStr};

use thiserror::Error;

use crate::models::Invoice;

/// Sortable invoice table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// Invoice number
    Number,
    /// Invoice date
    Date,
    /// Customer name
    Customer,
    /// Reference, missing sorts first
    Reference,
    /// Number of items
    Items,
    /// Sum of item totals
    Total,
}

/// Column name that matches no [`SortColumn`].
#[derive(Debug, Error)]
#[error("unknown sort column: {0}")]
pub struct UnknownSortColumn(String);

impl FromStr for SortColumn {
    type Err = UnknownSortColumn;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "customer" => Ok(Self::Customer),
            "reference" => Ok(Self::Reference),
            "items" => Ok(Self::Items),
            "total" => Ok(Self::Total),
            other => Err(UnknownSortColumn(other.to_string())),
        }
    }
}

/// Sort order for the active column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Active sort; no column means server order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<SortColumn>,
    direction: SortDirection,
}

impl SortState {
    /// Active column, `None` for server order.
    pub fn column(&self) -> Option<SortColumn> {
        self.column
    }

    /// Direction of the active column.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Same column flips the direction; a new column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Stable sort: invoices that compare equal keep their order.
    pub fn apply(&self, invoices: &mut [Invoice]) {
        let Some(column) = self.column else {
            return;
        };

        invoices.sort_by(|a, b| {
            let ordering = compare(a, b, column);

            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare(a: &Invoice, b: &Invoice, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Number => compare_ignoring_case(&a.number, &b.number),
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Customer => compare_ignoring_case(&a.customer_name, &b.customer_name),
        SortColumn::Reference => compare_ignoring_case(
            a.reference.as_deref().unwrap_or_default(),
            b.reference.as_deref().unwrap_or_default(),
        ),
        SortColumn::Items => a.invoice_items.len().cmp(&b.invoice_items.len()),
        SortColumn::Total => a.total().cmp(&b.total()),
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use rust_decimal::Decimal;

    use crate::models::InvoiceItem;

    use super::*;

    fn invoice(id: i64, number: &str, customer: &str, day: i8, totals: &[i64]) -> Invoice {
        Invoice {
            id,
            number: number.to_string(),
            date: date(2025, 1, day),
            reference: None,
            customer_name: customer.to_string(),
            version: 1,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            invoice_items: totals
                .iter()
                .map(|total| InvoiceItem {
                    id: 0,
                    invoice_id: id,
                    product_name: "Widget".to_string(),
                    unit_price: Decimal::from(*total),
                    quantity: 1,
                    total_amount: Decimal::from(*total),
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
                .collect(),
        }
    }

    fn ids(invoices: &[Invoice]) -> Vec<i64> {
        invoices.iter().map(|invoice| invoice.id).collect()
    }

    #[test]
    fn toggle_flips_or_resets_direction() {
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Date);
        assert_eq!(sort.direction(), SortDirection::Ascending);

        sort.toggle(SortColumn::Date);
        assert_eq!(sort.direction(), SortDirection::Descending);

        sort.toggle(SortColumn::Total);
        assert_eq!(sort.column(), Some(SortColumn::Total));
        assert_eq!(sort.direction(), SortDirection::Ascending, "new column resets");
    }

    #[test]
    fn strings_sort_case_insensitively() {
        let mut invoices = vec![
            invoice(1, "inv-b", "beta", 1, &[1]),
            invoice(2, "INV-A", "Alpha", 2, &[1]),
            invoice(3, "Inv-C", "gamma", 3, &[1]),
        ];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Number);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [2, 1, 3]);

        sort.toggle(SortColumn::Customer);
        sort.toggle(SortColumn::Customer);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [3, 1, 2], "customer descending");
    }

    #[test]
    fn numeric_columns_compare_numerically() {
        let mut invoices = vec![
            invoice(1, "a", "a", 1, &[100]),
            invoice(2, "b", "b", 1, &[9, 9]),
            invoice(3, "c", "c", 1, &[20, 1, 1]),
        ];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Total);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [2, 3, 1], "18 < 22 < 100");

        sort.toggle(SortColumn::Items);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [1, 2, 3], "1 < 2 < 3 items");
    }

    #[test]
    fn equal_keys_keep_their_order_both_ways() {
        let mut invoices = vec![
            invoice(1, "a", "x", 5, &[1]),
            invoice(2, "b", "y", 1, &[1]),
            invoice(3, "c", "z", 5, &[1]),
            invoice(4, "d", "w", 5, &[1]),
        ];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Date);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [2, 1, 3, 4]);

        sort.toggle(SortColumn::Date);
        sort.apply(&mut invoices);
        assert_eq!(ids(&invoices), [1, 3, 4, 2], "ties stay in place when reversed");
    }

    #[test]
    fn missing_reference_sorts_as_empty() {
        let mut with_reference = invoice(1, "a", "a", 1, &[1]);

        with_reference.reference = Some("PO-1".to_string());

        let mut invoices = vec![with_reference, invoice(2, "b", "b", 1, &[1])];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Reference);
        sort.apply(&mut invoices);

        assert_eq!(ids(&invoices), [2, 1]);
    }

    #[test]
    fn column_names_parse() {
        assert!(matches!("total".parse(), Ok(SortColumn::Total)), "total");
        assert!("price".parse::<SortColumn>().is_err(), "unknown column");
    }
}
