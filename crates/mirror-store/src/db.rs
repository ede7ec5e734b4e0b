//! # Database Handle
//!
//! Shared RocksDB instance with one column family per table.

use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, DB};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Column family holding user/KYC records, keyed by wallet address bytes.
pub(crate) const CF_USERS: &str = "users";
/// Column family holding property records, keyed by property id.
pub(crate) const CF_PROPERTIES: &str = "properties";
/// Index from token id (big-endian u64) to property id.
pub(crate) const CF_TOKEN_INDEX: &str = "token_index";
/// Column family holding ledger entries, keyed by transaction hash bytes.
pub(crate) const CF_LEDGER: &str = "ledger_entries";

const COLUMN_FAMILIES: &[&str] = &[CF_USERS, CF_PROPERTIES, CF_TOKEN_INDEX, CF_LEDGER];

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum MirrorStoreError {
    /// RocksDB failure.
    #[error("Database error: {0}")]
    Db(String),

    /// A row failed to (de)serialize.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl From<rocksdb::Error> for MirrorStoreError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Db(e.to_string())
    }
}

impl From<serde_json::Error> for MirrorStoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e.to_string())
    }
}

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct MirrorDbConfig {
    /// Path to the database directory.
    pub path: String,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for MirrorDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/mirror".to_string(),
            write_buffer_size: 64 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl MirrorDbConfig {
    /// Config for tests: small buffers, no fsync.
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// The shared database handle. Cheap to clone via `Arc`.
pub struct MirrorDb {
    pub(crate) db: DB,
    pub(crate) sync_writes: bool,
}

impl MirrorDb {
    /// Open (or create) the database with all column families.
    pub fn open(config: &MirrorDbConfig) -> Result<Arc<Self>, MirrorStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| MirrorStoreError::Db(format!("Failed to open RocksDB: {}", e)))?;
        info!(path = %config.path, "Mirror store opened");

        Ok(Arc::new(Self {
            db,
            sync_writes: config.sync_writes,
        }))
    }

    /// Flush all memtables and the WAL. Called on shutdown.
    pub fn close(&self) -> Result<(), MirrorStoreError> {
        self.db.flush()?;
        info!("Mirror store flushed");
        Ok(())
    }

    pub(crate) fn cf(&self, name: &str) -> Result<&ColumnFamily, MirrorStoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| MirrorStoreError::Db(format!("Missing column family: {}", name)))
    }

    pub(crate) fn write_opts(&self) -> rocksdb::WriteOptions {
        let mut opts = rocksdb::WriteOptions::default();
        opts.set_sync(self.sync_writes);
        opts
    }
}
