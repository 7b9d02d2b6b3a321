//! Counting with first-seen ordering.
//!
//! Used by the month finders: when two keys share the highest count, the key
//! that appeared first in the input wins.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub struct Tally<K> {
    /// Keys in order of first appearance, with their counts
    entries: Vec<(K, usize)>,
    /// Position of each key in `entries`
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&pos| self.entries[pos].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key with the highest count. Ties go to the earliest first-seen key.
    pub fn most_frequent(&self) -> Option<&K> {
        self.entries
            .iter()
            .fold(None, |best: Option<&(K, usize)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
