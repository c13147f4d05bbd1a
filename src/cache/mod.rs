//! Kernel row cache
//!
//! The SMO solver touches whole kernel rows K(i, ·) for the two variables of
//! each working set. Rows are kept in an LRU cache keyed by the row index so
//! that variables selected repeatedly do not recompute n kernel values.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Fewest rows the cache will hold: one per working-set variable.
const MIN_ROWS: usize = 2;

/// LRU cache for kernel matrix rows
pub struct KernelCache {
    rows: LruCache<usize, Arc<[f64]>>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache holding up to `capacity` rows
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(MIN_ROWS)).unwrap_or(NonZeroUsize::MIN);
        Self {
            rows: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache sized from a memory budget in bytes
    ///
    /// `row_len` is the number of f64 values per row (the problem size).
    /// A problem never has more than `row_len` rows, so the capacity is
    /// capped there whatever the budget.
    pub fn with_memory_limit(memory_bytes: usize, row_len: usize) -> Self {
        let row_bytes = row_len.max(1) * std::mem::size_of::<f64>();
        Self::new((memory_bytes / row_bytes).min(row_len.max(MIN_ROWS)))
    }

    /// Get a cached row
    pub fn get(&mut self, i: usize) -> Option<Arc<[f64]>> {
        match self.rows.get(&i) {
            Some(row) => {
                self.hits += 1;
                Some(Arc::clone(row))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Put a row into the cache, evicting the least recently used one if full
    pub fn put(&mut self, i: usize, row: Vec<f64>) -> Arc<[f64]> {
        let row: Arc<[f64]> = row.into();
        self.rows.put(i, Arc::clone(&row));
        row
    }

    /// Return the cached row or compute and cache it
    pub fn get_or_insert_with<F>(&mut self, i: usize, compute: F) -> Arc<[f64]>
    where
        F: FnOnce() -> Vec<f64>,
    {
        match self.get(i) {
            Some(row) => row,
            None => self.put(i, compute()),
        }
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.rows.cap().get(),
            size: self.rows.len(),
        }
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.rows.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Capacity in rows
    pub capacity: usize,
    /// Rows currently cached
    pub size: usize,
}
