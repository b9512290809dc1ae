//! Insertion-ordered collection with set semantics
//!
//! `UniqueList` keeps the order in which entries were first accepted and
//! silently refuses missing (`None`) and duplicate entries. The criteria
//! builder stores select columns, tables, group-by and order-by entries in it
//! so rendering order stays stable without ever emitting a clause twice.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize + Hash + Eq",
    deserialize = "T: Deserialize<'de> + Hash + Eq"
))]
pub struct UniqueList<T: Hash + Eq> {
    items: IndexSet<T>,
}

impl<T: Hash + Eq> UniqueList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }

    /// Add an entry
    ///
    /// Returns `false` and leaves the list untouched when the entry is `None`
    /// or already present.
    ///
    /// # Example
    /// ```
    /// use querycraft::UniqueList;
    ///
    /// let mut columns: UniqueList<String> = UniqueList::new();
    /// assert!(columns.add("users.id".to_string()));
    /// assert!(!columns.add("users.id".to_string()));
    /// assert!(!columns.add(None::<String>));
    /// assert_eq!(columns.len(), 1);
    /// ```
    pub fn add<I: Into<Option<T>>>(&mut self, item: I) -> bool {
        match item.into() {
            Some(item) => self.items.insert(item),
            None => false,
        }
    }

    /// Replace the entry at `index`
    ///
    /// Fails when the index is out of bounds or when the new value already
    /// lives at another position.
    pub fn replace(&mut self, index: usize, item: T) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if let Some(existing) = self.items.get_index_of(&item) {
            return existing == index;
        }
        self.items.insert(item);
        self.items.swap_remove_index(index);
        // swap_remove moved the new entry from the tail into `index`
        true
    }

    /// Remove an entry, keeping the order of the others
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.shift_remove(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get_index(index)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.get_index_of(item)
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Hash + Eq + AsRef<str>> UniqueList<T> {
    /// Join the entries with a separator
    pub fn join(&self, separator: &str) -> String {
        self.items
            .iter()
            .map(|item| item.as_ref())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl<T: Hash + Eq> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> FromIterator<T> for UniqueList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T: Hash + Eq> Extend<T> for UniqueList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Hash + Eq> IntoIterator for UniqueList<T> {
    type Item = T;
    type IntoIter = indexmap::set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
