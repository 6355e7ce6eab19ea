use crate::pack::types::{CandidateFile, Loader};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// The key carries the raw, pre-normalization version string so targets that
// only converge after filtering never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub mod_id: String,
    pub minecraft_version: String,
    pub loader: Loader,
}

impl CacheKey {
    pub fn new(mod_id: impl Into<String>, minecraft_version: impl Into<String>, loader: Loader) -> Self {
        Self {
            mod_id: mod_id.into(),
            minecraft_version: minecraft_version.into(),
            loader,
        }
    }
}

pub trait FileListCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Vec<CandidateFile>>;
    fn put(&self, key: CacheKey, files: Vec<CandidateFile>);
}

pub struct MemoryFileCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Vec<CandidateFile>)>>,
}

impl MemoryFileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, (Instant, Vec<CandidateFile>)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MemoryFileCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(15 * 60))
    }
}

impl FileListCache for MemoryFileCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<CandidateFile>> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some((stored_at, files)) if stored_at.elapsed() < self.ttl => Some(files.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, files: Vec<CandidateFile>) {
        let mut entries = self.lock_entries();
        // Keep the map bounded.
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), files));
    }
}
