//! # Repository Module
//!
//! Async storage traits for each entity.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Pattern                                 │
//! │                                                                         │
//! │  ┌─────────────┐      ┌─────────────────────┐      ┌────────────────┐  │
//! │  │InvoiceService│ ───►│ dyn XxxRepository   │ ───► │ MemoryStore    │  │
//! │  │ (business   │      │ (all/get/insert/    │      │ (RwLock<Vec>)  │  │
//! │  │  logic)     │      │  update/delete)     │      │ or an external │  │
//! │  └─────────────┘      └─────────────────────┘      │ backend        │  │
//! │                                                    └────────────────┘  │
//! │                                                                         │
//! │  The service never reaches a global store: every repository is        │
//! │  injected when the service is built.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `insert` fails with [`StoreError::Duplicate`] for an existing id
//! - `update` and `delete` fail with [`StoreError::NotFound`] for an
//!   unknown id
//! - customer and item names are unique after trimming, ignoring case;
//!   `insert` and `update` check this in the same write as the change
//! - `all` returns records in insertion order
//!
//! [`StoreError::Duplicate`]: crate::error::StoreError::Duplicate
//! [`StoreError::NotFound`]: crate::error::StoreError::NotFound

pub mod memory;

use async_trait::async_trait;

use bahi_core::{CatalogItem, Customer, Invoice};

use crate::error::StoreResult;

pub use memory::MemoryStore;

/// Customer storage.
///
/// `insert` and `update` reject a name that [`find_by_name`] would already
/// resolve to another customer.
///
/// [`find_by_name`]: CustomerRepository::find_by_name
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<Customer>>;

    async fn get(&self, id: &str) -> StoreResult<Option<Customer>>;

    async fn insert(&self, customer: &Customer) -> StoreResult<()>;

    async fn update(&self, customer: &Customer) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Case-insensitive lookup on the trimmed name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Customer>>;
}

/// Catalog item storage.
///
/// `insert` and `update` reject a name that [`find_by_name`] would already
/// resolve to another item.
///
/// [`find_by_name`]: CatalogRepository::find_by_name
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<CatalogItem>>;

    async fn get(&self, id: &str) -> StoreResult<Option<CatalogItem>>;

    async fn insert(&self, item: &CatalogItem) -> StoreResult<()>;

    async fn update(&self, item: &CatalogItem) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Case-insensitive lookup on the trimmed name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<CatalogItem>>;
}

/// Invoice storage.
///
/// Besides the id check, `insert` and `update` reject an invoice number that
/// another stored invoice already carries.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<Invoice>>;

    async fn get(&self, id: &str) -> StoreResult<Option<Invoice>>;

    async fn insert(&self, invoice: &Invoice) -> StoreResult<()>;

    async fn update(&self, invoice: &Invoice) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Every stored invoice number, in insertion order.
    async fn numbers(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .map(|invoice| invoice.invoice_number)
            .collect())
    }

    async fn find_by_number(&self, invoice_number: &str) -> StoreResult<Option<Invoice>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .find(|invoice| invoice.invoice_number == invoice_number))
    }
}

/// Compares display names the way lookups do.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
