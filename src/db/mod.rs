//! SQLite-backed record store.

pub mod batch;
pub mod initialize;
pub mod pool;
pub mod queries;
pub mod stats;

pub use pool::{Store, StoreOptions};
