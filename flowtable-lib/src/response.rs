//! Response type returned by data sources.

use serde::Deserialize;
use serde::Serialize;

/// A batch of items returned by a data source, with a total.
///
/// `items` is optional to model a source that returned no collection at all.
/// Offset and cursor loaders treat that as an empty result; page loaders
/// reject it.
///
/// The meaning of `total` depends on the pagination mode:
/// - Offset: total number of items available
/// - Cursor: ignored
/// - Page: total number of pages
///
/// # Example
///
/// ```
/// use flowtable_lib::LoadResponse;
///
/// let response = LoadResponse::new(vec!["a", "b"], 2);
/// assert_eq!(response.len(), 2);
/// assert!(!response.is_absent());
///
/// let none: LoadResponse<&str> = LoadResponse::none();
/// assert!(none.is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResponse<T> {
    /// The returned items, `None` if the source returned no collection.
    #[serde(default)]
    items: Option<Vec<T>>,
    /// Total item or page count, depending on mode.
    #[serde(default)]
    total: usize,
}

impl<T> LoadResponse<T> {
    /// Creates a response with items and a total.
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self {
            items: Some(items),
            total,
        }
    }

    /// Creates a response with items and no meaningful total.
    pub fn items(items: Vec<T>) -> Self {
        Self::new(items, 0)
    }

    /// Creates a response with no item collection.
    pub fn none() -> Self {
        Self {
            items: None,
            total: 0,
        }
    }

    /// Sets the total.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// Returns the items, if the response carried a collection.
    pub fn as_items(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    /// Consumes the response and returns the item collection.
    pub fn into_items(self) -> Option<Vec<T>> {
        self.items
    }

    /// Consumes the response and returns the item collection and total.
    pub fn into_parts(self) -> (Option<Vec<T>>, usize) {
        (self.items, self.total)
    }

    /// Returns the total.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` if the response carried no item collection.
    pub fn is_absent(&self) -> bool {
        self.items.is_none()
    }

    /// Returns the number of items, `0` for an absent collection.
    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for LoadResponse<T> {
    fn default() -> Self {
        Self::none()
    }
}
