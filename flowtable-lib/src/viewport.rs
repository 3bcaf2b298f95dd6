//! Row-count estimation for seeding the page size.

use serde::Deserialize;
use serde::Serialize;

/// Default rendered height of a table row, in pixels.
pub const DEFAULT_ROW_HEIGHT: u32 = 54;

/// Default height taken by the header, footer and "show more" control.
pub const DEFAULT_CHROME_HEIGHT: u32 = 88;

/// Measurements of the container a table renders into.
///
/// The render surface measures the container once before the first load and
/// turns it into a page size with [`Viewport::row_count`].
///
/// # Example
///
/// ```
/// use flowtable_lib::viewport::Viewport;
///
/// let viewport = Viewport::new(700);
/// assert_eq!(viewport.row_count(), 11);
///
/// let tiny = Viewport::new(60);
/// assert_eq!(tiny.row_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Height of the scrollable table container.
    pub container_height: u32,
    /// Height not available to rows.
    #[serde(default = "default_chrome_height")]
    pub chrome_height: u32,
    /// Height of a single row.
    #[serde(default = "default_row_height")]
    pub row_height: u32,
}

fn default_chrome_height() -> u32 {
    DEFAULT_CHROME_HEIGHT
}

fn default_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}

impl Viewport {
    /// Creates a viewport with default chrome and row heights.
    pub fn new(container_height: u32) -> Self {
        Self {
            container_height,
            chrome_height: DEFAULT_CHROME_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }

    /// Sets the chrome height.
    pub fn with_chrome_height(mut self, height: u32) -> Self {
        self.chrome_height = height;
        self
    }

    /// Adds a caller-specific offset (e.g. a toolbar above the table) to the
    /// chrome height.
    pub fn with_height_offset(mut self, offset: u32) -> Self {
        self.chrome_height = self.chrome_height.saturating_add(offset);
        self
    }

    /// Sets the row height.
    pub fn with_row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Returns how many rows fit, never less than one.
    pub fn row_count(&self) -> usize {
        available_row_count(self.container_height, self.chrome_height, self.row_height)
    }
}

/// Computes how many rows of `row_height` fit in `container_height` once
/// `chrome_height` is subtracted.
///
/// Always returns at least `1`, including for a zero row height or a
/// container smaller than its chrome.
pub fn available_row_count(container_height: u32, chrome_height: u32, row_height: u32) -> usize {
    if row_height == 0 {
        return 1;
    }
    let usable = container_height.saturating_sub(chrome_height);
    let rows = (usable / row_height) as usize;
    rows.max(1)
}
