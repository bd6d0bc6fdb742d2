//! Invoices Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tracing::debug;

use crate::domain::invoices::{
    data::{InvoiceFilter, PageRequest},
    records::{InvoiceId, InvoiceRecord},
};

const GET_INVOICE_SQL: &str = include_str!("../sql/get_invoice.sql");
const CREATE_INVOICE_SQL: &str = include_str!("../sql/create_invoice.sql");
const UPDATE_INVOICE_SQL: &str = include_str!("../sql/update_invoice.sql");
const INVOICE_EXISTS_SQL: &str = include_str!("../sql/invoice_exists.sql");
const DELETE_INVOICE_SQL: &str = include_str!("../sql/delete_invoice.sql");
const LIST_INVOICES_SQL: &str = include_str!("../sql/list_invoices.sql");
const COUNT_INVOICES_SQL: &str = include_str!("../sql/count_invoices.sql");
const SEARCH_INVOICES_SQL: &str = include_str!("../sql/search_invoices.sql");

/// Scalar invoice columns shared by create and update.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InvoiceFields<'a> {
    pub(crate) number: &'a str,
    pub(crate) date: Date,
    pub(crate) reference: Option<&'a str>,
    pub(crate) customer_name: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInvoicesRepository;

impl PgInvoicesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
    ) -> Result<InvoiceRecord, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(GET_INVOICE_SQL)
            .bind(invoice.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fields: InvoiceFields<'_>,
    ) -> Result<InvoiceRecord, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(CREATE_INVOICE_SQL)
            .bind(fields.number)
            .bind(SqlxDate::from(fields.date))
            .bind(fields.reference)
            .bind(fields.customer_name)
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite the scalar columns and bump the version.
    ///
    /// Returns `None` when no row has the id, or when `expected_version` is
    /// set and the stored version differs.
    pub(crate) async fn update_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
        fields: InvoiceFields<'_>,
        expected_version: Option<i64>,
    ) -> Result<Option<InvoiceRecord>, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(UPDATE_INVOICE_SQL)
            .bind(invoice.into_i64())
            .bind(fields.number)
            .bind(SqlxDate::from(fields.date))
            .bind(fields.reference)
            .bind(fields.customer_name)
            .bind(expected_version)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn invoice_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(INVOICE_EXISTS_SQL)
            .bind(invoice.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_INVOICE_SQL)
            .bind(invoice.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_invoices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &InvoiceFilter,
        page: PageRequest,
    ) -> Result<Vec<InvoiceRecord>, sqlx::Error> {
        query_as::<Postgres, InvoiceRecord>(LIST_INVOICES_SQL)
            .bind(filter.customer_name.as_deref().map(contains_pattern))
            .bind(filter.date_from.map(SqlxDate::from))
            .bind(filter.date_to.map(SqlxDate::from))
            .bind(saturating_i64(page.per_page()))
            .bind(saturating_i64(page.offset()))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_invoices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &InvoiceFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_INVOICES_SQL)
            .bind(filter.customer_name.as_deref().map(contains_pattern))
            .bind(filter.date_from.map(SqlxDate::from))
            .bind(filter.date_to.map(SqlxDate::from))
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    #[tracing::instrument(
        name = "invoices.repository.search_invoices",
        skip(self, tx),
        fields(result_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn search_invoices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        term: &str,
        match_totals: bool,
    ) -> Result<Vec<InvoiceRecord>, sqlx::Error> {
        let invoices = query_as::<Postgres, InvoiceRecord>(SEARCH_INVOICES_SQL)
            .bind(contains_pattern(term))
            .bind(match_totals)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("result_count", invoices.len());

        debug!(result_count = invoices.len(), "searched invoices");

        Ok(invoices)
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` taken literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);

    pattern.push('%');

    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }

        pattern.push(c);
    }

    pattern.push('%');

    pattern
}

/// Postgres `LIMIT`/`OFFSET` are `bigint`; anything past `i64::MAX` selects no rows anyway.
fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl<'r> FromRow<'r, PgRow> for InvoiceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: InvoiceId::from_i64(row.try_get("id")?),
            number: row.try_get("number")?,
            date: row.try_get::<SqlxDate, _>("date")?.to_jiff(),
            reference: row.try_get("reference")?,
            customer_name: row.try_get("customer_name")?,
            version: row.try_get("version")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
