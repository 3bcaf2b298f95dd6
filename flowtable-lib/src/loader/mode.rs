//! Pagination mode

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigurationError;

/// Strategy a loader uses to retrieve items. Fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Page-index requests whose results accumulate ("show more").
    #[default]
    Offset,
    /// Continuation-token requests whose results accumulate.
    Cursor,
    /// Page-index requests where each page replaces the visible items.
    Page,
}

impl PaginationMode {
    /// Returns `true` if results accumulate across `show_more` calls.
    pub fn accumulates(self) -> bool {
        match self {
            Self::Offset | Self::Cursor => true,
            Self::Page => false,
        }
    }

    /// Returns the mode's lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Cursor => "cursor",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaginationMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" => Ok(Self::Offset),
            "cursor" => Ok(Self::Cursor),
            "page" | "paged" => Ok(Self::Page),
            _ => Err(ConfigurationError::UnknownMode(s.to_string())),
        }
    }
}
