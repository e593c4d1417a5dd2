//! Ledger database layer using RocksDB

use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

/// Thin wrapper around RocksDB tuned for the ledger workload: small
/// JSON values, point lookups, and short forward prefix scans.
#[derive(Clone)]
pub struct LedgerDb {
    db: Arc<DB>,
}

impl LedgerDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rocksdb::Error> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(64 * 1024 * 1024);
        opts.set_max_write_buffer_number(4);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, rocksdb::Error> {
        self.db.get(key)
    }

    /// Apply a set of writes atomically. Either every item is durably
    /// applied or none are; this is the commit point for bet
    /// resolution and session creation.
    pub fn batch_write<K, V>(&self, items: &[(K, V)]) -> Result<(), rocksdb::Error>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut batch = WriteBatch::default();
        for (key, value) in items {
            batch.put(key, value);
        }
        self.db.write(batch)
    }

    /// Forward scan of keys sharing `prefix`, returning at most
    /// `limit` entries after skipping `offset`. Keys are returned in
    /// lexicographic order, so indexes that want newest-first encode
    /// an inverted timestamp into the key. An iterator failure aborts
    /// the scan; a short result must never masquerade as a complete
    /// one.
    pub fn scan_prefix(
        &self,
        prefix: &[u8],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, rocksdb::Error> {
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));

        let mut rows = Vec::new();
        let mut skipped = 0;
        for entry in iter {
            let (key, value) = entry?;
            if !key.starts_with(prefix) {
                break;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            if rows.len() == limit {
                break;
            }
            rows.push((key.to_vec(), value.to_vec()));
        }
        Ok(rows)
    }
}
