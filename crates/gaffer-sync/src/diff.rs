//! Generic diff-sync planning: compare an incoming entity set against the
//! stored set and decide what to insert and what to rewrite. Never deletes;
//! entities absent from a later poll are left untouched.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// How an entity kind treats rows whose key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Rewrite on full value inequality.
    Upsert,
    /// Existing keys are final; skip them. Used for stat events.
    AppendOnly,
}

/// The outcome of one planning pass.
#[derive(Debug)]
pub struct SyncPlan<T> {
    pub inserts: Vec<T>,
    pub updates: Vec<T>,
}

impl<T> Default for SyncPlan<T> {
    fn default() -> Self {
        Self {
            inserts: Vec::new(),
            updates: Vec::new(),
        }
    }
}

impl<T> SyncPlan<T> {
    /// True when a second pass over unchanged data would touch nothing.
    pub fn is_noop(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

/// Plan a sync of `incoming` against `existing`, keyed by `key_of`.
///
/// Duplicate keys within `incoming` collapse to the first occurrence, which
/// matches the append-only event identity: later rows sharing a hash are
/// skipped, never merged.
pub fn plan<T, K, F>(incoming: Vec<T>, existing: &[T], key_of: F, mode: SyncMode) -> SyncPlan<T>
where
    T: PartialEq,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let existing_by_key: HashMap<K, &T> = existing.iter().map(|e| (key_of(e), e)).collect();

    let mut seen: HashSet<K> = HashSet::new();
    let mut out = SyncPlan::default();

    for item in incoming {
        let key = key_of(&item);
        if !seen.insert(key.clone()) {
            continue;
        }
        match existing_by_key.get(&key) {
            None => out.inserts.push(item),
            Some(current) => {
                if mode == SyncMode::Upsert && **current != item {
                    out.updates.push(item);
                }
            }
        }
    }

    out
}
