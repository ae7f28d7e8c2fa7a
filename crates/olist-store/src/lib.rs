//! Olist Store Access
//!
//! The boundary between the backing document store and the in-memory
//! analytics pipeline.
//!
//! # Core Operations
//!
//! - **Connect**: open one [`SharedStore`] per process with a bounded timeout
//! - **Seed**: fill an empty collection from the bundled seed file, once
//! - **Read**: fetch every document of a collection for caching upstream
//!
//! # Architecture
//!
//! ```text
//! Seed file (CSV) → SeedFile → Seeder ──insert_many──→ DocumentStore
//!                                                          │
//!                                   find_all (without _id) ↓
//!                                                    Dataset Cache
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use olist_store::{connect, ConnectOptions, Seeder};
//!
//! let store = connect(&ConnectOptions::new("memory://", "olist")).await?;
//! let outcome = Seeder::new("orders", "data_processed/dataset_final_simple.csv")
//!     .ensure_seeded(store.as_ref())
//!     .await;
//! println!("{}", outcome.message());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod seeder;
pub mod source;

pub use client::{
    check_connection, connect, redact_uri, uri_timeout, ConnectOptions, DocumentStore, SharedStore,
    URI_TIMEOUT_OPTION,
};
pub use error::{SeedError, StoreError, StoreResult};
pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use seeder::{ensure_seeded, SeedOutcome, Seeder};
pub use source::{parse_seed, ColumnKind, SeedBatch, SeedFile};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
