pub mod config;
pub mod sync;

pub use sync::SyncService;
