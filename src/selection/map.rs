//! Keyed selection sets.
//!
//! Items are tracked by a string key derived from the item rather than by
//! reference, so a selection survives the graph being rebuilt for another
//! phase: detach to a [`SelectionStorage`] of keys, then re-adapt against
//! the new phase's items.

use std::collections::{HashMap, HashSet};

/// Current selection for one kind of item, keyed by a caller-supplied
/// key function.
pub struct SelectionMap<T> {
    selection: HashMap<String, T>,
    string_key: Box<dyn Fn(&T) -> String>,
}

impl<T: Clone> SelectionMap<T> {
    pub fn new<F>(string_key: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        SelectionMap {
            selection: HashMap::new(),
            string_key: Box::new(string_key),
        }
    }

    pub fn key_of(&self, item: &T) -> String {
        (self.string_key)(item)
    }

    /// Adds or removes the given items. With `select` false the items are
    /// removed; keys not present are ignored.
    pub fn select<I>(&mut self, items: I, select: bool)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            let key = (self.string_key)(&item);
            if select {
                self.selection.insert(key, item);
            } else {
                self.selection.remove(&key);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.selection.contains_key(&(self.string_key)(item))
    }

    pub fn is_key_selected(&self, key: &str) -> bool {
        self.selection.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.selection.values()
    }

    pub fn selected_keys(&self) -> HashSet<String> {
        self.selection.keys().cloned().collect()
    }
}

/// Phase-independent snapshot of a view's selection, kept while the view's
/// graph is being swapped out.
#[derive(Debug, Default, Clone)]
pub struct SelectionStorage {
    pub nodes: HashSet<String>,
    pub blocks: HashSet<String>,
}

impl SelectionStorage {
    pub fn new(nodes: HashSet<String>, blocks: HashSet<String>) -> Self {
        SelectionStorage { nodes, blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.blocks.is_empty()
    }
}
