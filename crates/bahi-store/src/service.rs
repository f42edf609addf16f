//! # Invoice Service
//!
//! Business operations over injected repositories.
//!
//! ## Issuance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       issue_invoice(draft)                              │
//! │                                                                         │
//! │  lock issuance mutex ─────────────────────────────────────┐             │
//! │    │                                                      │             │
//! │    ├── invoices.numbers()          (authoritative state)  │ critical    │
//! │    ├── next_invoice_number(scheme, numbers, draft.date)   │ section     │
//! │    ├── build_invoice(draft, number, uuid, now)            │             │
//! │    └── invoices.insert(invoice)                           │             │
//! │                                                           │             │
//! │  unlock ◄─────────────────────────────────────────────────┘             │
//! │                                                                         │
//! │  Two concurrent issuances can never derive the same number.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use bahi_core::numbering::next_invoice_number;
use bahi_core::tax::build_invoice;
use bahi_core::validation::{validate_gstin, validate_hsn_code, validate_name, validate_rate};
use bahi_core::{
    CatalogItem, Customer, CustomerSnapshot, DraftLine, Invoice, InvoiceDraft, InvoiceStatus,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::repository::{
    same_name, CatalogRepository, CustomerRepository, InvoiceRepository, MemoryStore,
};
use crate::summary::{DateRange, SalesSummary};

/// Customer fields as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub gstin: Option<String>,
    pub address: Option<String>,
}

/// Catalog item fields as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub hsn_code: Option<String>,
    pub rate: Decimal,
}

/// Customer, catalog and invoice operations.
pub struct InvoiceService {
    customers: Arc<dyn CustomerRepository>,
    catalog: Arc<dyn CatalogRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    config: StoreConfig,
    issuance: Mutex<()>,
}

impl InvoiceService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        catalog: Arc<dyn CatalogRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        config: StoreConfig,
    ) -> Self {
        Self {
            customers,
            catalog,
            invoices,
            config,
            issuance: Mutex::new(()),
        }
    }

    /// Uses one [`MemoryStore`] for all three repositories.
    pub fn in_memory(store: Arc<MemoryStore>, config: StoreConfig) -> Self {
        Self::new(store.clone(), store.clone(), store, config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn create_customer(&self, input: NewCustomer) -> StoreResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            gstin: normalize_gstin(input.gstin.as_deref())?,
            address: non_blank(input.address.as_deref()),
            created_at: Utc::now(),
        };
        validate_name("customer name", &customer.name)?;

        self.customers.insert(&customer).await?;
        info!(id = %customer.id, name = %customer.name, "Created customer");
        Ok(customer)
    }

    /// Replaces the editable fields. Issued invoices keep their snapshot.
    pub async fn update_customer(&self, id: &str, input: NewCustomer) -> StoreResult<Customer> {
        let mut customer = self
            .customers
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        let name = input.name.trim().to_string();
        validate_name("customer name", &name)?;

        customer.name = name;
        customer.gstin = normalize_gstin(input.gstin.as_deref())?;
        customer.address = non_blank(input.address.as_deref());

        self.customers.update(&customer).await?;
        debug!(id = %customer.id, "Updated customer");
        Ok(customer)
    }

    pub async fn delete_customer(&self, id: &str) -> StoreResult<()> {
        self.customers.delete(id).await
    }

    pub async fn customers(&self) -> StoreResult<Vec<Customer>> {
        self.customers.all().await
    }

    pub async fn find_customer(&self, name: &str) -> StoreResult<Option<Customer>> {
        self.customers.find_by_name(name).await
    }

    /// Frozen display fields for a new invoice.
    pub async fn customer_snapshot(&self, customer_id: &str) -> StoreResult<CustomerSnapshot> {
        self.customers
            .get(customer_id)
            .await?
            .map(|c| c.snapshot())
            .ok_or_else(|| StoreError::not_found("Customer", customer_id))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn create_item(&self, input: NewItem) -> StoreResult<CatalogItem> {
        let item = CatalogItem {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            hsn_code: normalize_hsn(input.hsn_code.as_deref())?,
            rate: input.rate,
            created_at: Utc::now(),
        };
        validate_name("item name", &item.name)?;
        validate_rate(item.rate)?;

        self.catalog.insert(&item).await?;
        info!(id = %item.id, name = %item.name, rate = %item.rate, "Created item");
        Ok(item)
    }

    /// Replaces the editable fields. Lines already drafted keep their copy.
    pub async fn update_item(&self, id: &str, input: NewItem) -> StoreResult<CatalogItem> {
        let mut item = self
            .catalog
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Item", id))?;

        let name = input.name.trim().to_string();
        validate_name("item name", &name)?;
        validate_rate(input.rate)?;

        item.name = name;
        item.hsn_code = normalize_hsn(input.hsn_code.as_deref())?;
        item.rate = input.rate;

        self.catalog.update(&item).await?;
        debug!(id = %item.id, "Updated item");
        Ok(item)
    }

    pub async fn delete_item(&self, id: &str) -> StoreResult<()> {
        self.catalog.delete(id).await
    }

    pub async fn items(&self) -> StoreResult<Vec<CatalogItem>> {
        self.catalog.all().await
    }

    pub async fn find_item(&self, name: &str) -> StoreResult<Option<CatalogItem>> {
        self.catalog.find_by_name(name).await
    }

    /// Starts a draft line by copying a catalog item's name, HSN and rate.
    pub async fn line_from_catalog(
        &self,
        item_id: &str,
        qty: Decimal,
        tax_percent: Decimal,
    ) -> StoreResult<DraftLine> {
        let item = self
            .catalog
            .get(item_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Item", item_id))?;
        Ok(item.draft_line(qty, tax_percent))
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    /// Numbers, computes and stores a new invoice.
    ///
    /// The number is derived under the issuance lock from the invoice
    /// repository's current contents. Year-scoped numbers use the year of
    /// the invoice date.
    ///
    /// ## Errors
    /// - [`StoreError::Core`] for an invalid draft or a number collision
    /// - [`StoreError::Duplicate`] if the repository already holds the number
    pub async fn issue_invoice(&self, draft: &InvoiceDraft) -> StoreResult<Invoice> {
        let _guard = self.issuance.lock().await;

        let numbers = self.invoices.numbers().await?;
        let invoice_number = next_invoice_number(&self.config.numbering, &numbers, draft.date)?;
        let invoice = build_invoice(
            draft,
            invoice_number,
            Uuid::new_v4().to_string(),
            Utc::now(),
        )?;

        self.invoices.insert(&invoice).await?;
        info!(
            invoice_number = %invoice.invoice_number,
            lines = invoice.lines.len(),
            grand_total = %invoice.grand_total,
            "Issued invoice"
        );
        Ok(invoice)
    }

    /// Recomputes a stored invoice from an edited draft.
    ///
    /// Id, number and creation time are kept; `updated_at` moves forward.
    pub async fn update_invoice(&self, id: &str, draft: &InvoiceDraft) -> StoreResult<Invoice> {
        let stored = self.get_invoice(id).await?;
        let revised = stored.recompute(draft, Utc::now())?;

        self.invoices.update(&revised).await?;
        info!(
            invoice_number = %revised.invoice_number,
            grand_total = %revised.grand_total,
            "Updated invoice"
        );
        Ok(revised)
    }

    pub async fn set_status(&self, id: &str, status: InvoiceStatus) -> StoreResult<Invoice> {
        let mut invoice = self.get_invoice(id).await?;
        invoice.status = status;
        invoice.updated_at = Utc::now();

        self.invoices.update(&invoice).await?;
        info!(invoice_number = %invoice.invoice_number, %status, "Invoice status changed");
        Ok(invoice)
    }

    pub async fn delete_invoice(&self, id: &str) -> StoreResult<()> {
        self.invoices.delete(id).await?;
        info!(id, "Deleted invoice");
        Ok(())
    }

    pub async fn get_invoice(&self, id: &str) -> StoreResult<Invoice> {
        self.invoices
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Invoice", id))
    }

    pub async fn find_invoice(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        self.invoices.find_by_number(invoice_number).await
    }

    /// All invoices, newest first.
    pub async fn invoices(&self) -> StoreResult<Vec<Invoice>> {
        let mut invoices = self.invoices.all().await?;
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    /// Invoices whose customer snapshot name matches `name`.
    pub async fn invoices_for_customer(&self, name: &str) -> StoreResult<Vec<Invoice>> {
        Ok(self
            .invoices()
            .await?
            .into_iter()
            .filter(|i| same_name(&i.customer.name, name))
            .collect())
    }

    pub async fn sales_summary(&self, range: DateRange) -> StoreResult<SalesSummary> {
        let invoices = self.invoices.all().await?;
        Ok(SalesSummary::from_invoices(&invoices, range)?)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn normalize_gstin(value: Option<&str>) -> StoreResult<Option<String>> {
    match non_blank(value).map(|g| g.to_uppercase()) {
        Some(gstin) => {
            validate_gstin(&gstin)?;
            Ok(Some(gstin))
        }
        None => Ok(None),
    }
}

fn normalize_hsn(value: Option<&str>) -> StoreResult<Option<String>> {
    match non_blank(value) {
        Some(code) => {
            validate_hsn_code(&code)?;
            Ok(Some(code))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bahi_core::{CoreError, Money, NumberingScheme, ValidationError};
    use chrono::NaiveDate;

    fn service(numbering: NumberingScheme) -> InvoiceService {
        InvoiceService::in_memory(
            Arc::new(MemoryStore::new()),
            StoreConfig::with_numbering(numbering),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(date: NaiveDate) -> InvoiceDraft {
        InvoiceDraft {
            customer_id: None,
            customer: CustomerSnapshot {
                name: "Acme Traders".to_string(),
                gstin: Some("27AAPFU0939F1ZV".to_string()),
                address: None,
            },
            date,
            po: Some("PO-77".to_string()),
            lines: vec![DraftLine::new("Steel bracket", Decimal::new(100, 0), Decimal::new(2, 0))
                .with_hsn("7216")
                .with_tax_percent(Decimal::new(18, 0))],
            status: InvoiceStatus::Pending,
        }
    }

    fn acme() -> NewCustomer {
        NewCustomer {
            name: "Acme Traders".to_string(),
            gstin: Some(" 27aapfu0939f1zv ".to_string()),
            address: Some("  ".to_string()),
        }
    }

    // =========================================================================
    // Customers and catalog
    // =========================================================================

    #[tokio::test]
    async fn test_create_customer_normalizes_fields() {
        let svc = service(NumberingScheme::global());
        let customer = svc.create_customer(acme()).await.unwrap();

        assert_eq!(customer.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(customer.address, None);
        assert_eq!(svc.customers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_customer_name_is_unique_ignoring_case() {
        let svc = service(NumberingScheme::global());
        svc.create_customer(acme()).await.unwrap();

        let err = svc
            .create_customer(NewCustomer {
                name: "acme traders".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_invalid_gstin_rejected() {
        let svc = service(NumberingScheme::global());
        let err = svc
            .create_customer(NewCustomer {
                name: "Bharat Steel".to_string(),
                gstin: Some("27AAPFU0939".to_string()),
                address: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InvalidFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_customer_keeps_invoice_snapshot() {
        let svc = service(NumberingScheme::global());
        let customer = svc.create_customer(acme()).await.unwrap();

        let mut d = draft(date(2026, 4, 1));
        d.customer_id = Some(customer.id.clone());
        d.customer = svc.customer_snapshot(&customer.id).await.unwrap();
        let invoice = svc.issue_invoice(&d).await.unwrap();

        svc.update_customer(
            &customer.id,
            NewCustomer {
                name: "Acme Industries".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stored = svc.get_invoice(&invoice.id).await.unwrap();
        assert_eq!(stored.customer.name, "Acme Traders");
        assert_eq!(
            svc.find_customer("ACME INDUSTRIES").await.unwrap().map(|c| c.id),
            Some(customer.id)
        );
    }

    #[tokio::test]
    async fn test_line_from_catalog_copies_item() {
        let svc = service(NumberingScheme::global());
        let item = svc
            .create_item(NewItem {
                name: "Steel bracket".to_string(),
                hsn_code: Some("7216".to_string()),
                rate: Decimal::new(100, 0),
            })
            .await
            .unwrap();

        let line = svc
            .line_from_catalog(&item.id, Decimal::new(3, 0), Decimal::new(18, 0))
            .await
            .unwrap();
        assert_eq!(line.item_id.as_deref(), Some(item.id.as_str()));
        assert_eq!(line.rate, Decimal::new(100, 0));

        // later catalog edits do not reach the drafted line
        svc.update_item(
            &item.id,
            NewItem {
                name: "Steel bracket".to_string(),
                hsn_code: Some("7216".to_string()),
                rate: Decimal::new(120, 0),
            },
        )
        .await
        .unwrap();
        assert_eq!(line.rate, Decimal::new(100, 0));

        let err = svc
            .line_from_catalog("missing", Decimal::ONE, Decimal::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_item_hsn_validated() {
        let svc = service(NumberingScheme::global());
        let err = svc
            .create_item(NewItem {
                name: "Bolt".to_string(),
                hsn_code: Some("72A".to_string()),
                rate: Decimal::ONE,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let item = svc
            .create_item(NewItem {
                name: "Bolt".to_string(),
                hsn_code: Some("".to_string()),
                rate: Decimal::ONE,
            })
            .await
            .unwrap();
        assert_eq!(item.hsn_code, None);
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    #[tokio::test]
    async fn test_issue_invoice_end_to_end() {
        let svc = service(NumberingScheme::global());
        let invoice = svc.issue_invoice(&draft(date(2026, 4, 1))).await.unwrap();

        assert_eq!(invoice.invoice_number, "INV-001");
        assert_eq!(invoice.subtotal, Money::from_rupees_paise(200, 0));
        assert_eq!(invoice.total_tax, Money::from_rupees_paise(36, 0));
        assert_eq!(invoice.grand_total, Money::from_rupees_paise(236, 0));

        let next = svc.issue_invoice(&draft(date(2026, 4, 2))).await.unwrap();
        assert_eq!(next.invoice_number, "INV-002");
    }

    #[tokio::test]
    async fn test_year_scoped_numbers_follow_invoice_year() {
        let svc = service(NumberingScheme::year_scoped());

        let a = svc.issue_invoice(&draft(date(2025, 12, 30))).await.unwrap();
        let b = svc.issue_invoice(&draft(date(2026, 1, 2))).await.unwrap();
        let c = svc.issue_invoice(&draft(date(2026, 1, 3))).await.unwrap();

        assert_eq!(a.invoice_number, "INV-2025-0001");
        assert_eq!(b.invoice_number, "INV-2026-0001");
        assert_eq!(c.invoice_number, "INV-2026-0002");
    }

    #[tokio::test]
    async fn test_invalid_draft_stores_nothing() {
        let svc = service(NumberingScheme::global());
        let mut d = draft(date(2026, 4, 1));
        d.lines.push(DraftLine::new("Bad", Decimal::new(-1, 0), Decimal::ONE));

        let err = svc.issue_invoice(&d).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidLine { line: 2, .. })
        ));
        assert!(svc.invoices().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuance_yields_unique_numbers() {
        let svc = Arc::new(service(NumberingScheme::global()));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.issue_invoice(&draft(date(2026, 4, 1))).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().invoice_number);
        }
        numbers.sort();
        numbers.dedup();

        assert_eq!(numbers.len(), 32);
        assert_eq!(numbers.first().map(String::as_str), Some("INV-001"));
        assert_eq!(numbers.last().map(String::as_str), Some("INV-032"));
    }

    // =========================================================================
    // Edit, status, delete, summary
    // =========================================================================

    #[tokio::test]
    async fn test_update_invoice_recomputes() {
        let svc = service(NumberingScheme::global());
        let invoice = svc.issue_invoice(&draft(date(2026, 4, 1))).await.unwrap();

        let mut edited = draft(date(2026, 4, 1));
        edited.lines[0].qty = Decimal::new(3, 0);
        let revised = svc.update_invoice(&invoice.id, &edited).await.unwrap();

        assert_eq!(revised.invoice_number, invoice.invoice_number);
        assert_eq!(revised.created_at, invoice.created_at);
        assert!(revised.updated_at >= invoice.updated_at);
        assert_eq!(revised.grand_total, Money::from_rupees_paise(354, 0));
        assert_eq!(svc.get_invoice(&invoice.id).await.unwrap(), revised);
    }

    #[tokio::test]
    async fn test_set_status_and_summary() {
        let svc = service(NumberingScheme::global());
        let first = svc.issue_invoice(&draft(date(2026, 4, 1))).await.unwrap();
        svc.issue_invoice(&draft(date(2026, 4, 2))).await.unwrap();

        let paid = svc.set_status(&first.id, InvoiceStatus::Paid).await.unwrap();
        assert!(paid.is_paid());

        let summary = svc.sales_summary(DateRange::default()).await.unwrap();
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.collected, Money::from_rupees_paise(236, 0));
        assert_eq!(summary.outstanding, Money::from_rupees_paise(236, 0));
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let svc = service(NumberingScheme::global());
        let invoice = svc.issue_invoice(&draft(date(2026, 4, 1))).await.unwrap();

        svc.delete_invoice(&invoice.id).await.unwrap();
        assert!(matches!(
            svc.get_invoice(&invoice.id).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            svc.delete_invoice(&invoice.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_invoice_and_customer_history() {
        let svc = service(NumberingScheme::global());
        svc.issue_invoice(&draft(date(2026, 4, 1))).await.unwrap();

        let found = svc.find_invoice("INV-001").await.unwrap().unwrap();
        assert_eq!(found.po.as_deref(), Some("PO-77"));
        assert_eq!(svc.invoices_for_customer("acme traders").await.unwrap().len(), 1);
        assert!(svc.invoices_for_customer("Nobody").await.unwrap().is_empty());
    }
}
