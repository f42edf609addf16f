//! In-process repository backed by `tokio::sync::RwLock<Vec<T>>` tables.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use bahi_core::{CatalogItem, Customer, Invoice};

use super::{same_name, CatalogRepository, CustomerRepository, InvoiceRepository};
use crate::error::{StoreError, StoreResult};

fn name_clash(field: &'static str, stored: &str, name: &str) -> Option<StoreError> {
    same_name(stored, name).then(|| StoreError::duplicate(field, name))
}

/// A record kept in a [`Table`].
trait Record: Clone + Send + Sync {
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}

impl Record for Customer {
    const ENTITY: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for CatalogItem {
    const ENTITY: &'static str = "Item";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Invoice {
    const ENTITY: &'static str = "Invoice";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Insertion-ordered rows of one entity.
#[derive(Debug)]
struct Table<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> Table<T> {
    async fn all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    async fn get(&self, id: &str) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.id() == id).cloned()
    }

    async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().await.iter().find(|r| pred(r)).cloned()
    }

    /// Appends `record` unless `conflict` reports a clash with a stored row.
    async fn insert_checked(
        &self,
        record: &T,
        conflict: impl Fn(&T) -> Option<StoreError>,
    ) -> StoreResult<()> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::duplicate("id", record.id()));
        }
        if let Some(err) = rows.iter().find_map(&conflict) {
            return Err(err);
        }

        rows.push(record.clone());
        debug!(entity = T::ENTITY, id = record.id(), "Inserted");
        Ok(())
    }

    /// Replaces the row with `record`'s id unless `conflict` reports a clash
    /// with one of the other rows.
    async fn update_checked(
        &self,
        record: &T,
        conflict: impl Fn(&T) -> Option<StoreError>,
    ) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| StoreError::not_found(T::ENTITY, record.id()))?;

        if let Some(err) = rows
            .iter()
            .filter(|r| r.id() != record.id())
            .find_map(&conflict)
        {
            return Err(err);
        }

        rows[slot] = record.clone();
        debug!(entity = T::ENTITY, id = record.id(), "Updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);

        if rows.len() == before {
            return Err(StoreError::not_found(T::ENTITY, id));
        }
        debug!(entity = T::ENTITY, id, "Deleted");
        Ok(())
    }
}

/// Customers, catalog items and invoices held in memory.
///
/// Share it behind an `Arc` and hand it to
/// [`InvoiceService::new`](crate::InvoiceService::new) for all three
/// repository roles.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: Table<Customer>,
    items: Table<CatalogItem>,
    invoices: Table<Invoice>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn all(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.all().await)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.get(id).await)
    }

    async fn insert(&self, customer: &Customer) -> StoreResult<()> {
        self.customers
            .insert_checked(customer, |c| name_clash("customer name", &c.name, &customer.name))
            .await
    }

    async fn update(&self, customer: &Customer) -> StoreResult<()> {
        self.customers
            .update_checked(customer, |c| name_clash("customer name", &c.name, &customer.name))
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.customers.delete(id).await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.find(|c| same_name(&c.name, name)).await)
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn all(&self) -> StoreResult<Vec<CatalogItem>> {
        Ok(self.items.all().await)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CatalogItem>> {
        Ok(self.items.get(id).await)
    }

    async fn insert(&self, item: &CatalogItem) -> StoreResult<()> {
        self.items
            .insert_checked(item, |i| name_clash("item name", &i.name, &item.name))
            .await
    }

    async fn update(&self, item: &CatalogItem) -> StoreResult<()> {
        self.items
            .update_checked(item, |i| name_clash("item name", &i.name, &item.name))
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.items.delete(id).await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<CatalogItem>> {
        Ok(self.items.find(|i| same_name(&i.name, name)).await)
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn all(&self) -> StoreResult<Vec<Invoice>> {
        Ok(self.invoices.all().await)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Invoice>> {
        Ok(self.invoices.get(id).await)
    }

    async fn insert(&self, invoice: &Invoice) -> StoreResult<()> {
        self.invoices
            .insert_checked(invoice, |stored| {
                (stored.invoice_number == invoice.invoice_number).then(|| {
                    StoreError::duplicate("invoice_number", invoice.invoice_number.clone())
                })
            })
            .await
    }

    async fn update(&self, invoice: &Invoice) -> StoreResult<()> {
        self.invoices
            .update_checked(invoice, |stored| {
                (stored.invoice_number == invoice.invoice_number).then(|| {
                    StoreError::duplicate("invoice_number", invoice.invoice_number.clone())
                })
            })
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.invoices.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            gstin: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_all_in_order() {
        let store = MemoryStore::new();
        CustomerRepository::insert(&store, &customer("c1", "Acme Traders")).await.unwrap();
        CustomerRepository::insert(&store, &customer("c2", "Bharat Steel")).await.unwrap();

        let all = CustomerRepository::all(&store).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Acme Traders", "Bharat Steel"]);

        let got = CustomerRepository::get(&store, "c2").await.unwrap().unwrap();
        assert_eq!(got.name, "Bharat Steel");
        assert!(CustomerRepository::get(&store, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        CustomerRepository::insert(&store, &customer("c1", "Acme")).await.unwrap();

        let err = CustomerRepository::insert(&store, &customer("c1", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field, .. } if field == "id"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = MemoryStore::new();

        let err = CustomerRepository::update(&store, &customer("ghost", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = CustomerRepository::delete(&store, "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Customer not found: ghost");
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let store = MemoryStore::new();
        CustomerRepository::insert(&store, &customer("c1", "Acme")).await.unwrap();
        CustomerRepository::insert(&store, &customer("c2", "Bharat")).await.unwrap();

        CustomerRepository::update(&store, &customer("c1", "Acme Industries"))
            .await
            .unwrap();

        let all = CustomerRepository::all(&store).await.unwrap();
        assert_eq!(all[0].name, "Acme Industries");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case_and_padding() {
        let store = MemoryStore::new();
        CustomerRepository::insert(&store, &customer("c1", "Acme Traders")).await.unwrap();

        let found = CustomerRepository::find_by_name(&store, "  ACME traders ")
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some("c1".to_string()));
        assert!(CustomerRepository::find_by_name(&store, "Acme").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_by_store() {
        let store = MemoryStore::new();
        CustomerRepository::insert(&store, &customer("c1", "Acme Traders")).await.unwrap();
        CustomerRepository::insert(&store, &customer("c2", "Bharat Steel")).await.unwrap();

        let err = CustomerRepository::insert(&store, &customer("c3", " ACME traders"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field, .. } if field == "customer name"));

        let err = CustomerRepository::update(&store, &customer("c2", "acme traders"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // renaming a record to its own name is not a clash
        CustomerRepository::update(&store, &customer("c1", "ACME TRADERS"))
            .await
            .unwrap();

        let all = CustomerRepository::all(&store).await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ACME TRADERS", "Bharat Steel"]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_one_name() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    CustomerRepository::insert(&*store, &customer(&format!("c{}", i), "Acme"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(CustomerRepository::all(&*store).await.unwrap().len(), 1);
    }
}
