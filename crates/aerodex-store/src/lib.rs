//! # aerodex-store
//!
//! SQLite-backed spatial record store for aerodex entries.
//!
//! The store persists classified [`aerodex_core::Entry`] records in one
//! `entries` table with WKT geometry columns, alongside minimal spatial
//! reference metadata (`spatial_ref_sys`, `geometry_columns`) in SRID 4326.
//! Persistence failures are fatal to the calling operation; the engine's
//! error message is surfaced verbatim.
//!
//! ## Example
//!
//! ```no_run
//! use aerodex_store::RecordStore;
//!
//! let mut store = RecordStore::new();
//! store.open("/data/flight1/.aerodex/index.db")?;
//! store.create_tables()?;
//! assert!(store.table_exists("entries")?);
//! # Ok::<(), aerodex_store::StoreError>(())
//! ```

mod error;
mod store;

pub use error::StoreError;
pub use store::RecordStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
