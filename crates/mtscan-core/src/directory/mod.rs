//! BIC directory: code → (bank name, ISO3 country).
//!
//! The table is loaded lazily from a [`BicSource`] and held as an immutable
//! [`DirectorySnapshot`]. Readers clone the current `Arc`; a reload builds a
//! fresh snapshot and swaps it in under the write lock, so every lookup that
//! starts after the swap observes the new table.

mod csv_source;

pub use csv_source::CsvBicSource;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::DirectoryError;

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Normalise a code for keying: whitespace removed, uppercased.
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// One row of the BIC table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BicEntry {
    /// Normalised BIC (8 or 11 characters).
    pub code: String,
    /// Bank name.
    pub name: String,
    /// ISO3 country code, when the table has one.
    pub country: Option<String>,
}

impl BicEntry {
    pub fn new(code: &str, name: &str, country: Option<&str>) -> Self {
        Self {
            code: normalize_code(code),
            name: name.trim().to_string(),
            country: country
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty()),
        }
    }
}

/// External tabular collaborator supplying the BIC table wholesale.
pub trait BicSource: Send + Sync {
    /// Read every entry of the table.
    fn load(&self) -> Result<Vec<BicEntry>>;

    /// Human-readable name used in logs.
    fn describe(&self) -> String {
        "BIC source".to_string()
    }
}

impl<T: BicSource + ?Sized> BicSource for Arc<T> {
    fn load(&self) -> Result<Vec<BicEntry>> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-memory table, for embedding callers and tests.
#[derive(Debug, Default)]
pub struct MemoryBicSource {
    entries: Mutex<Vec<BicEntry>>,
}

impl MemoryBicSource {
    pub fn new(entries: Vec<BicEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Add a row. Not visible through a directory until it is invalidated.
    pub fn insert(&self, entry: BicEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl BicSource for MemoryBicSource {
    fn load(&self) -> Result<Vec<BicEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn describe(&self) -> String {
        "in-memory table".to_string()
    }
}

/// Immutable view of the table at one version.
#[derive(Debug, Default)]
pub struct DirectorySnapshot {
    version: u64,
    entries: HashMap<String, BicEntry>,
    // BIC8 prefix -> code of the last row carrying it
    institutions: HashMap<String, String>,
}

impl DirectorySnapshot {
    /// Build a snapshot; later rows win over earlier rows with the same code.
    pub fn new(version: u64, entries: Vec<BicEntry>) -> Self {
        let mut institutions = HashMap::new();
        for entry in &entries {
            if let Some(bic8) = entry.code.get(..8) {
                institutions.insert(bic8.to_string(), entry.code.clone());
            }
        }

        let entries = entries
            .into_iter()
            .map(|entry| (entry.code.clone(), entry))
            .collect();

        Self {
            version,
            entries,
            institutions,
        }
    }

    /// Exact lookup on the normalised code.
    pub fn get(&self, code: &str) -> Option<&BicEntry> {
        self.entries.get(&normalize_code(code))
    }

    /// Any row of the institution a code belongs to, keyed by its first
    /// 8 characters. `BEACCMCX091` finds a table holding only `BEACCMCX100`.
    pub fn institution(&self, code: &str) -> Option<&BicEntry> {
        let code = normalize_code(code);
        code.get(..8)
            .and_then(|bic8| self.institutions.get(bic8))
            .and_then(|full| self.entries.get(full))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying a country.
    pub fn with_country(&self) -> usize {
        self.entries.values().filter(|e| e.country.is_some()).count()
    }
}

/// Process-wide, lazily loaded BIC directory.
pub struct BicDirectory {
    source: Box<dyn BicSource>,
    current: RwLock<Option<Arc<DirectorySnapshot>>>,
    version: AtomicU64,
}

impl BicDirectory {
    /// Create a directory; nothing is read until the first lookup.
    pub fn new(source: impl BicSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: RwLock::new(None),
            version: AtomicU64::new(0),
        }
    }

    /// Current snapshot, loading the table if none is cached.
    pub fn snapshot(&self) -> Result<Arc<DirectorySnapshot>> {
        if let Some(snapshot) = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(snapshot));
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have loaded while we waited for the write lock
        if let Some(snapshot) = current.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = self.load_snapshot()?;
        *current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Look up a code (case-insensitive, exact).
    pub fn lookup(&self, code: &str) -> Result<Option<BicEntry>> {
        Ok(self.snapshot()?.get(code).cloned())
    }

    /// Drop the cached table; the next lookup reloads it from the source.
    pub fn invalidate_and_reload(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.take().is_some() {
            debug!("BIC directory invalidated");
        }
    }

    /// Load the table now and swap it in.
    pub fn reload(&self) -> Result<Arc<DirectorySnapshot>> {
        let snapshot = self.load_snapshot()?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Version of the cached snapshot, `None` when nothing is loaded.
    pub fn loaded_version(&self) -> Option<u64> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.version())
    }

    fn load_snapshot(&self) -> Result<Arc<DirectorySnapshot>> {
        let entries = self.source.load()?;
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = DirectorySnapshot::new(version, entries);

        info!(
            "Loaded {} BIC entries from {} (version {})",
            snapshot.len(),
            self.source.describe(),
            version
        );

        Ok(Arc::new(snapshot))
    }
}

impl std::fmt::Debug for BicDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BicDirectory")
            .field("source", &self.source.describe())
            .field("loaded_version", &self.loaded_version())
            .finish()
    }
}
