//! Table: fixed-capacity hash table with separate chaining.

use crate::error::{AllocError, Result};
use crate::hash::BuildFnv;
use crate::reentrancy::SectionGuard;
use crate::record::{self, Arena, Record, RecordKey};
use crate::value::Value;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use std::io;

/// Bucket count used when a table is created with capacity 0.
pub const DEFAULT_CAPACITY: usize = 1 << 10;

/// A separate-chaining hash table from text keys to [`Value`]s.
///
/// The bucket count is fixed when the table is created. Each bucket holds
/// the head of a chain of records; new keys are appended at the tail, so a
/// chain keeps insertion order. Keys are unique across the whole table.
pub struct Table<S = BuildFnv> {
    hasher: S,
    buckets: Vec<Option<RecordKey>>,
    records: Arena,
    guard: SectionGuard,
}

/// Where a key sits in its chain, or where it would be appended.
enum Probe {
    Found {
        prev: Option<RecordKey>,
        at: RecordKey,
    },
    Missing {
        tail: Option<RecordKey>,
    },
}

impl Table {
    /// Create an empty table with `capacity` buckets (0 picks
    /// [`DEFAULT_CAPACITY`]) hashing keys with FNV.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, BuildFnv)
    }
}

impl<S> Table<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|source| AllocError::Buckets { capacity, source })?;
        buckets.resize(capacity, None);

        log::trace!("Created table with {capacity} buckets");

        Ok(Self {
            hasher,
            buckets,
            records: Arena::with_key(),
            guard: SectionGuard::new(),
        })
    }

    /// Number of buckets; fixed for the table's lifetime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bucket index for `key`: the hash of its bytes modulo the capacity.
    pub fn bucket_of(&self, key: &str) -> usize {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        (h.finish() % self.buckets.len() as u64) as usize
    }

    fn probe(&self, bucket: usize, key: &str) -> Probe {
        let mut prev = None;
        let mut cursor = self.buckets[bucket];
        while let Some(at) = cursor {
            let rec = &self.records[at];
            if rec.key() == key {
                return Probe::Found { prev, at };
            }
            prev = Some(at);
            cursor = rec.next;
        }
        Probe::Missing { tail: prev }
    }

    /// Insert `key` or update its value in place.
    ///
    /// Returns the previous value when the key was already present; the
    /// size is unchanged in that case. A new key is appended to the tail of
    /// its bucket's chain. If the key copy cannot be allocated the table is
    /// left untouched and the error is returned.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let _g = self.guard.enter("insert");
        let bucket = self.bucket_of(key);
        match self.probe(bucket, key) {
            Probe::Found { at, .. } => Ok(Some(self.records[at].update(value.into()))),
            Probe::Missing { tail } => {
                let rec = Record::create(key, value.into(), None)?;
                let at = self.records.insert(rec);
                match tail {
                    Some(t) => self.records[t].next = Some(at),
                    None => self.buckets[bucket] = Some(at),
                }
                Ok(None)
            }
        }
    }

    /// Look up the value stored for `key`.
    pub fn search(&self, key: &str) -> Option<&Value> {
        let _g = self.guard.enter("search");
        match self.probe(self.bucket_of(key), key) {
            Probe::Found { at, .. } => Some(self.records[at].value()),
            Probe::Missing { .. } => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let _g = self.guard.enter("get_mut");
        match self.probe(self.bucket_of(key), key) {
            Probe::Found { at, .. } => Some(self.records[at].value_mut()),
            Probe::Missing { .. } => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _g = self.guard.enter("contains_key");
        matches!(
            self.probe(self.bucket_of(key), key),
            Probe::Found { .. }
        )
    }

    /// Remove `key`, relinking its predecessor to its successor.
    ///
    /// Returns `false` when the key is absent; nothing changes then.
    pub fn remove(&mut self, key: &str) -> bool {
        let _g = self.guard.enter("remove");
        let bucket = self.bucket_of(key);
        let Probe::Found { prev, at } = self.probe(bucket, key) else {
            return false;
        };

        let next = record::destroy(&mut self.records, at, false);
        match prev {
            Some(p) => self.records[p].next = next,
            None => self.buckets[bucket] = next,
        }
        true
    }

    /// Release every record, keeping the bucket array.
    pub fn clear(&mut self) {
        let _g = self.guard.enter("clear");
        for head in self.buckets.iter_mut() {
            if let Some(at) = head.take() {
                record::destroy(&mut self.records, at, true);
            }
        }
        debug_assert!(self.records.is_empty());
    }

    /// Number of records chained in `bucket`.
    ///
    /// # Panics
    ///
    /// Panics if `bucket >= capacity()`.
    pub fn chain_len(&self, bucket: usize) -> usize {
        let _g = self.guard.enter("chain_len");
        Chain {
            records: &self.records,
            cursor: self.buckets[bucket],
        }
        .count()
    }

    /// Entries in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            heads: self.buckets.iter(),
            chain: Chain {
                records: &self.records,
                cursor: None,
            },
        }
    }

    /// Write one `key<TAB>value<NEWLINE>` line per entry, in [`iter`](Self::iter) order.
    pub fn format<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let _g = self.guard.enter("format");
        for head in &self.buckets {
            let chain = Chain {
                records: &self.records,
                cursor: *head,
            };
            for rec in chain {
                rec.format(out)?;
            }
        }
        Ok(())
    }

    /// Release every record, then the buckets, then the table.
    pub fn destroy(mut self) {
        if log::log_enabled!(log::Level::Trace) {
            let bytes: usize = self.records.values().map(Record::heap_len).sum();
            log::trace!(
                "Destroying table: {} records, {bytes} key/value bytes, {} buckets",
                self.len(),
                self.capacity()
            );
        }
        self.clear();
    }
}

/// Walks one chain from a head link.
struct Chain<'a> {
    records: &'a Arena,
    cursor: Option<RecordKey>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Record;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let records: &'a Arena = self.records;
        let rec = &records[self.cursor?];
        self.cursor = rec.next;
        Some(rec)
    }
}

/// Iterator over the entries of a [`Table`].
pub struct Iter<'a> {
    heads: core::slice::Iter<'a, Option<RecordKey>>,
    chain: Chain<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(rec) = self.chain.next() {
                return Some((rec.key(), rec.value()));
            }
            self.chain.cursor = *self.heads.next()?;
        }
    }
}

impl<'a, S: BuildHasher> IntoIterator for &'a Table<S> {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: BuildHasher> fmt::Display for Table<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self {
            writeln!(f, "{key}\t{value}")?;
        }
        Ok(())
    }
}

impl<S: BuildHasher> fmt::Debug for Table<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
