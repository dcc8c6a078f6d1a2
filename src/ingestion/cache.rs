//! Fingerprint-keyed memoization of batch ingestion.
//!
//! [`super::ingest`] is deterministic for a given set of files and delimiter, so its outcome can be
//! reused when the same upload set is seen again. The cache wraps the pipeline; the pipeline
//! itself knows nothing about it.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sha2::{Digest, Sha256};

use super::pipeline::{IngestOutcome, IngestionOptions, ingest};
use super::source::SourceFile;

/// SHA-256 identity of an ordered upload set.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash file names, contents and the delimiter. File order matters, since it determines
    /// row order in the merged tables.
    pub fn of(files: &[SourceFile], delimiter: u8) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([delimiter]);
        hasher.update((files.len() as u64).to_le_bytes());
        for file in files {
            hasher.update((file.name.len() as u64).to_le_bytes());
            hasher.update(file.name.as_bytes());
            hasher.update((file.bytes.len() as u64).to_le_bytes());
            hasher.update(&file.bytes);
        }
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Number of upload sets kept by [`IngestionCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Default)]
struct Entries {
    outcomes: HashMap<Fingerprint, Arc<IngestOutcome>>,
    /// Insertion order, oldest first.
    order: VecDeque<Fingerprint>,
}

/// Memoizes [`ingest`] outcomes by [`Fingerprint`].
///
/// Holds at most `capacity` upload sets; inserting past that evicts the oldest entry.
pub struct IngestionCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for IngestionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl IngestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` outcomes (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached outcome for `files`, ingesting them on a miss.
    ///
    /// Observers in `options` only fire on a miss.
    pub fn get_or_ingest(&self, files: &[SourceFile], options: &IngestionOptions) -> Arc<IngestOutcome> {
        let key = Fingerprint::of(files, options.delimiter);
        if let Some(hit) = self.lock().outcomes.get(&key) {
            log::debug!("ingestion cache hit {key}");
            return Arc::clone(hit);
        }

        log::debug!("ingestion cache miss {key}");
        let outcome = Arc::new(ingest(files, options));

        let mut entries = self.lock();
        if let Some(raced) = entries.outcomes.get(&key) {
            return Arc::clone(raced);
        }
        while entries.outcomes.len() >= self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.outcomes.remove(&oldest);
            log::debug!("ingestion cache evicted {oldest}");
        }
        entries.outcomes.insert(key, Arc::clone(&outcome));
        entries.order.push_back(key);
        outcome
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.lock().outcomes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().outcomes.is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.outcomes.clear();
        entries.order.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for IngestionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.len())
            .finish()
    }
}
