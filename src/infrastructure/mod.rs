//! Adapters for the domain ports: account stores and store-mode providers.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod store_mode;
