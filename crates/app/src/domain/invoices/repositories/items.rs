//! Invoice Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::invoices::{
    data::NewInvoiceItem,
    money::{line_total, truncate_amount},
    records::{InvoiceId, InvoiceItemId, InvoiceItemRecord},
};

const GET_INVOICE_ITEMS_SQL: &str = include_str!("../sql/get_invoice_items.sql");
const CREATE_INVOICE_ITEM_SQL: &str = include_str!("../sql/create_invoice_item.sql");
const DELETE_INVOICE_ITEMS_SQL: &str = include_str!("../sql/delete_invoice_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInvoiceItemsRepository;

impl PgInvoiceItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Items for every invoice in `invoices`, grouped by invoice in insertion order.
    pub(crate) async fn get_invoice_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoices: &[InvoiceId],
    ) -> Result<FxHashMap<InvoiceId, Vec<InvoiceItemRecord>>, sqlx::Error> {
        if invoices.is_empty() {
            return Ok(FxHashMap::default());
        }

        let ids: Vec<i64> = invoices.iter().map(|id| id.into_i64()).collect();

        let items = query_as::<Postgres, InvoiceItemRecord>(GET_INVOICE_ITEMS_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        let mut grouped: FxHashMap<InvoiceId, Vec<InvoiceItemRecord>> = FxHashMap::default();

        for item in items {
            grouped.entry(item.invoice_id).or_default().push(item);
        }

        Ok(grouped)
    }

    pub(crate) async fn create_invoice_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
        item: &NewInvoiceItem,
    ) -> Result<InvoiceItemRecord, sqlx::Error> {
        let quantity = i32::try_from(item.quantity)
            .map_err(|e| sqlx::Error::Encode(format!("quantity out of range: {e}").into()))?;

        query_as::<Postgres, InvoiceItemRecord>(CREATE_INVOICE_ITEM_SQL)
            .bind(invoice.into_i64())
            .bind(&item.product_name)
            .bind(truncate_amount(item.unit_price))
            .bind(quantity)
            .bind(line_total(item.unit_price, item.quantity))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_invoice_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_INVOICE_ITEMS_SQL)
            .bind(invoice.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for InvoiceItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            id: InvoiceItemId::from_i64(row.try_get("id")?),
            invoice_id: InvoiceId::from_i64(row.try_get("invoice_id")?),
            product_name: row.try_get("product_name")?,
            unit_price: row.try_get("unit_price")?,
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?,
            total_amount: row.try_get("total_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
