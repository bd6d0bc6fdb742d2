//! Invoices service.

use std::str::FromStr;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::{Db, commit_or_rollback},
    domain::invoices::{
        data::{InvoiceFilter, InvoiceUpdate, NewInvoice, NewInvoiceItem, PageRequest},
        errors::InvoicesServiceError,
        records::{InvoiceId, InvoiceItemRecord, InvoiceRecord, InvoicesPage},
        repositories::{InvoiceFields, PgInvoiceItemsRepository, PgInvoicesRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgInvoicesService {
    db: Db,
    invoices_repository: PgInvoicesRepository,
    items_repository: PgInvoiceItemsRepository,
}

impl PgInvoicesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            invoices_repository: PgInvoicesRepository::new(),
            items_repository: PgInvoiceItemsRepository::new(),
        }
    }

    async fn insert_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: &NewInvoice,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        let mut record = self
            .invoices_repository
            .create_invoice(
                tx,
                InvoiceFields {
                    number: &invoice.number,
                    date: invoice.date,
                    reference: invoice.reference.as_deref(),
                    customer_name: &invoice.customer_name,
                },
            )
            .await?;

        record.items = self.insert_items(tx, record.id, &invoice.items).await?;

        Ok(record)
    }

    async fn replace_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: InvoiceId,
        update: &InvoiceUpdate,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        let updated = self
            .invoices_repository
            .update_invoice(
                tx,
                id,
                InvoiceFields {
                    number: &update.number,
                    date: update.date,
                    reference: update.reference.as_deref(),
                    customer_name: &update.customer_name,
                },
                update.expected_version,
            )
            .await?;

        let Some(mut record) = updated else {
            return if self.invoices_repository.invoice_exists(tx, id).await? {
                Err(InvoicesServiceError::StaleVersion)
            } else {
                Err(InvoicesServiceError::NotFound)
            };
        };

        let removed = self.items_repository.delete_invoice_items(tx, id).await?;

        Span::current().record("removed_item_count", removed);

        record.items = self.insert_items(tx, id, &update.items).await?;

        Ok(record)
    }

    async fn insert_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        invoice: InvoiceId,
        items: &[NewInvoiceItem],
    ) -> Result<Vec<InvoiceItemRecord>, InvoicesServiceError> {
        let mut records = Vec::with_capacity(items.len());

        for item in items {
            let record = self
                .items_repository
                .create_invoice_item(tx, invoice, item)
                .await?;

            records.push(record);
        }

        Ok(records)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut invoices: Vec<InvoiceRecord>,
    ) -> Result<Vec<InvoiceRecord>, InvoicesServiceError> {
        let ids: Vec<InvoiceId> = invoices.iter().map(|invoice| invoice.id).collect();

        let mut items = self.items_repository.get_invoice_items(tx, &ids).await?;

        for invoice in &mut invoices {
            invoice.items = items.remove(&invoice.id).unwrap_or_default();
        }

        Ok(invoices)
    }
}

#[async_trait]
impl InvoicesService for PgInvoicesService {
    #[tracing::instrument(
        name = "invoices.service.create_invoice",
        skip(self, invoice),
        fields(
            number = %invoice.number,
            item_count = invoice.items.len(),
            invoice_id = tracing::field::Empty
        ),
        err
    )]
    async fn create_invoice(
        &self,
        invoice: NewInvoice,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        if invoice.items.is_empty() {
            return Err(InvoicesServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let result = self.insert_invoice(&mut tx, &invoice).await;

        let record = commit_or_rollback(tx, result).await?;

        Span::current().record("invoice_id", tracing::field::display(record.id));

        info!(invoice_id = %record.id, "created invoice");

        Ok(record)
    }

    #[tracing::instrument(
        name = "invoices.service.update_invoice",
        skip(self, update),
        fields(
            invoice_id = %id,
            item_count = update.items.len(),
            expected_version = ?update.expected_version,
            removed_item_count = tracing::field::Empty
        ),
        err
    )]
    async fn update_invoice(
        &self,
        id: InvoiceId,
        update: InvoiceUpdate,
    ) -> Result<InvoiceRecord, InvoicesServiceError> {
        if update.items.is_empty() {
            return Err(InvoicesServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let result = self.replace_invoice(&mut tx, id, &update).await;

        let record = commit_or_rollback(tx, result).await?;

        info!(invoice_id = %record.id, version = record.version, "updated invoice");

        Ok(record)
    }

    #[tracing::instrument(
        name = "invoices.service.delete_invoice",
        skip(self),
        fields(invoice_id = %id),
        err
    )]
    async fn delete_invoice(&self, id: InvoiceId) -> Result<(), InvoicesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let result = match self.invoices_repository.delete_invoice(&mut tx, id).await {
            Ok(0) => Err(InvoicesServiceError::NotFound),
            Ok(_) => Ok(()),
            Err(error) => Err(error.into()),
        };

        commit_or_rollback(tx, result).await?;

        info!(invoice_id = %id, "deleted invoice");

        Ok(())
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoicesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let invoice = self.invoices_repository.get_invoice(&mut tx, id).await?;

        let mut invoices = self.attach_items(&mut tx, vec![invoice]).await?;

        tx.commit().await?;

        invoices.pop().ok_or(InvoicesServiceError::NotFound)
    }

    async fn list_invoices(
        &self,
        filter: InvoiceFilter,
        page: PageRequest,
    ) -> Result<InvoicesPage, InvoicesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let total = self
            .invoices_repository
            .count_invoices(&mut tx, &filter)
            .await?;

        let invoices = self
            .invoices_repository
            .list_invoices(&mut tx, &filter, page)
            .await?;

        let invoices = self.attach_items(&mut tx, invoices).await?;

        tx.commit().await?;

        Ok(InvoicesPage {
            invoices,
            page: page.page(),
            per_page: page.per_page(),
            total,
            last_page: page.last_page(total),
        })
    }

    async fn search_invoices(
        &self,
        term: String,
    ) -> Result<Vec<InvoiceRecord>, InvoicesServiceError> {
        let term = term.trim();

        if term.is_empty() {
            return Ok(Vec::new());
        }

        let match_totals = Decimal::from_str(term).is_ok();

        let mut tx = self.db.begin_transaction().await?;

        let invoices = self
            .invoices_repository
            .search_invoices(&mut tx, term, match_totals)
            .await?;

        let invoices = self.attach_items(&mut tx, invoices).await?;

        tx.commit().await?;

        Ok(invoices)
    }
}

#[automock]
#[async_trait]
pub trait InvoicesService: Send + Sync {
    /// Create an invoice together with its items.
    async fn create_invoice(
        &self,
        invoice: NewInvoice,
    ) -> Result<InvoiceRecord, InvoicesServiceError>;

    /// Replace an invoice's fields and its entire item set.
    async fn update_invoice(
        &self,
        id: InvoiceId,
        update: InvoiceUpdate,
    ) -> Result<InvoiceRecord, InvoicesServiceError>;

    /// Delete an invoice and, by cascade, its items.
    async fn delete_invoice(&self, id: InvoiceId) -> Result<(), InvoicesServiceError>;

    /// Retrieve a single invoice with its items.
    async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoicesServiceError>;

    /// List one page of invoices matching `filter`, newest date first.
    async fn list_invoices(
        &self,
        filter: InvoiceFilter,
        page: PageRequest,
    ) -> Result<InvoicesPage, InvoicesServiceError>;

    /// Free-text search across invoice fields, item names and totals.
    async fn search_invoices(&self, term: String)
    -> Result<Vec<InvoiceRecord>, InvoicesServiceError>;
}
