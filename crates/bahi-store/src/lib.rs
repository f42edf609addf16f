//! # bahi-store: Repositories and Invoice Service for Bahi
//!
//! Storage is explicit: the [`InvoiceService`] receives its repositories
//! when it is built and never reaches for a global store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           bahi-store                                    │
//! │                                                                         │
//! │   caller (UI / API / CLI)                                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌──────────────────┐    issuance mutex    ┌────────────────────────┐  │
//! │   │  InvoiceService  │ ───────────────────► │ bahi-core              │  │
//! │   │  (service.rs)    │  numbering + build   │ numbering / tax        │  │
//! │   └────────┬─────────┘                      └────────────────────────┘  │
//! │            │ Arc<dyn ...Repository>                                     │
//! │            ▼                                                            │
//! │   ┌──────────────────┐                                                  │
//! │   │  MemoryStore     │   or any external backend implementing the      │
//! │   │  (memory.rs)     │   repository traits                             │
//! │   └──────────────────┘                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`repository`] - Async repository traits and the in-memory store
//! - [`service`] - Customer, catalog and invoice operations
//! - [`summary`] - Sales register summary
//! - [`config`] - Numbering scheme selection
//! - [`error`] - Store error types

pub mod config;
pub mod error;
pub mod repository;
pub mod service;
pub mod summary;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use repository::{CatalogRepository, CustomerRepository, InvoiceRepository, MemoryStore};
pub use service::{InvoiceService, NewCustomer, NewItem};
pub use summary::{DateRange, SalesSummary};
