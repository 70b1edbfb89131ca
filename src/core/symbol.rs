//! Symbol names and the global name interner.
//!
//! Every distinct name is stored once; symbols with the same name share one
//! allocation, so equality is usually a pointer comparison. The interner is
//! sharded by name hash to keep lock contention low when many threads build
//! expressions at once.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, Mutex};

use rustc_hash::{FxHashSet, FxHasher};

const NUM_SHARDS: usize = 16;

struct Interner {
    shards: [Mutex<FxHashSet<Arc<str>>>; NUM_SHARDS],
}

impl Interner {
    fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(FxHashSet::default())),
        }
    }

    fn shard_for(&self, name: &str) -> &Mutex<FxHashSet<Arc<str>>> {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        // Shard count is a power of two
        let idx = (hasher.finish() as usize) & (NUM_SHARDS - 1);
        &self.shards[idx]
    }

    fn intern(&self, name: &str) -> Arc<str> {
        let mut shard = self
            .shard_for(name)
            .lock()
            .expect("symbol interner shard poisoned");
        if let Some(existing) = shard.get(name) {
            return Arc::clone(existing);
        }
        let fresh: Arc<str> = Arc::from(name);
        shard.insert(Arc::clone(&fresh));
        fresh
    }

    fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().expect("symbol interner shard poisoned").len())
            .sum()
    }
}

static INTERNER: LazyLock<Interner> = LazyLock::new(Interner::new);

/// Number of distinct names interned so far.
#[must_use]
pub fn interned_name_count() -> usize {
    INTERNER.len()
}

/// Payload of a symbol node: an interned name.
///
/// Identity is the name alone. Ordering is lexicographic by name.
#[derive(Clone, Debug)]
pub struct Symbol {
    name: Arc<str>,
}

impl Symbol {
    /// Interns `name` and returns its symbol.
    ///
    /// # Panics
    /// Panics if an interner shard lock was poisoned by a panicking thread.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: INTERNER.intern(name),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.name, &other.name) || self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.name, &other.name) {
            return Ordering::Equal;
        }
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_shares_storage() {
        let a = Symbol::new("interned_alpha");
        let b = Symbol::new("interned_alpha");
        assert!(Arc::ptr_eq(&a.name, &b.name));
        assert_eq!(a, b);
        assert!(interned_name_count() >= 1);
    }

    #[test]
    fn ordering_is_by_name() {
        assert!(Symbol::new("a") < Symbol::new("b"));
        assert!(Symbol::new("x10") < Symbol::new("x2"));
    }
}
