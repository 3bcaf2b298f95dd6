//! Insertion-ordered, de-duplicated item collection.

use std::hash::Hash;

use hashlink::LinkedHashSet;

/// An ordered set of loaded items.
///
/// Items are unique by their `Eq`/`Hash` implementation. The first occurrence
/// of an item fixes its position: re-inserting an equal item never moves it,
/// and new items are appended in the order they arrive.
///
/// # Example
///
/// ```
/// use flowtable_lib::items::ItemSet;
///
/// let mut items = ItemSet::new();
/// assert_eq!(items.union(["a", "b", "c"]), 3);
/// assert_eq!(items.union(["c", "d", "e"]), 2);
/// assert_eq!(items.to_vec(), vec!["a", "b", "c", "d", "e"]);
/// ```
#[derive(Debug)]
pub struct ItemSet<T> {
    set: LinkedHashSet<T>,
}

impl<T: Eq + Hash> ItemSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            set: LinkedHashSet::new(),
        }
    }

    /// Adds every item not already present, preserving arrival order.
    ///
    /// Returns the number of newly inserted items.
    pub fn union(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let mut added = 0;
        for item in items {
            // LinkedHashSet::insert would move an existing entry to the back.
            if !self.contains(&item) {
                self.set.insert(item);
                added += 1;
            }
        }
        added
    }

    /// Replaces the whole contents with `items`.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.set.clear();
        self.union(items);
    }

    /// Returns `true` if an equal item is present.
    pub fn contains(&self, item: &T) -> bool {
        self.set.contains(item)
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.set.iter()
    }

    /// Returns the most recently appended item.
    pub fn last(&self) -> Option<&T> {
        self.set.back()
    }
}

impl<T: Eq + Hash + Clone> ItemSet<T> {
    /// Copies the items into a `Vec`, in order.
    pub fn to_vec(&self) -> Vec<T> {
        self.set.iter().cloned().collect()
    }
}

impl<T: Eq + Hash + Clone> Clone for ItemSet<T> {
    fn clone(&self) -> Self {
        Self {
            set: self.set.clone(),
        }
    }
}

impl<T: Eq + Hash> Default for ItemSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> FromIterator<T> for ItemSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.union(iter);
        set
    }
}
