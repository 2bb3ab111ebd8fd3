//! Backend key tables.
//!
//! The backend has renamed its keys between revisions, so every key the
//! mapper reads or writes comes from a [`WireSchema`] instead of being
//! spelled at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Internal field name to backend key, for one backend revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSchema {
    pub column_id: &'static str,
    /// Consulted when `column_id` is absent or null.
    pub fallback_id: &'static str,
    pub base_category: &'static str,
    pub series: &'static str,
    pub priority: &'static str,
    pub field: &'static str,
    pub title: &'static str,
    pub col_type: &'static str,
    pub editable: &'static str,
    pub required: &'static str,
    pub values: &'static str,
    /// Query parameter carrying the base category filter.
    pub base_category_param: &'static str,
    /// Query parameter carrying the series filter.
    pub series_param: &'static str,
}

impl WireSchema {
    /// camelCase keys with `colType` sent as `type`.
    pub const CURRENT: WireSchema = WireSchema {
        column_id: "columnId",
        fallback_id: "id",
        base_category: "baseCategory",
        series: "series",
        priority: "priority",
        field: "field",
        title: "title",
        col_type: "type",
        editable: "editable",
        required: "required",
        values: "values",
        base_category_param: "baseCategory",
        series_param: "series",
    };

    /// PascalCase keys of the first backend revision.
    pub const LEGACY: WireSchema = WireSchema {
        column_id: "ColumnId",
        fallback_id: "id",
        base_category: "BaseCategory",
        series: "SeriesId",
        priority: "Priority",
        field: "Field",
        title: "Title",
        col_type: "ColType",
        editable: "Editable",
        required: "Required",
        values: "Values",
        base_category_param: "baseId",
        series_param: "seriesId",
    };

    pub fn for_revision(revision: WireRevision) -> &'static WireSchema {
        match revision {
            WireRevision::Current => &Self::CURRENT,
            WireRevision::Legacy => &Self::LEGACY,
        }
    }
}

impl Default for WireSchema {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Selects a [`WireSchema`] by name, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRevision {
    #[default]
    Current,
    Legacy,
}

impl WireRevision {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireRevision::Current => "current",
            WireRevision::Legacy => "legacy",
        }
    }

    pub fn schema(self) -> &'static WireSchema {
        WireSchema::for_revision(self)
    }
}

impl fmt::Display for WireRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WireRevision {
    type Err = WireRevisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(WireRevision::Current),
            "legacy" => Ok(WireRevision::Legacy),
            _ => Err(WireRevisionParseError(s.to_string())),
        }
    }
}

/// Error when parsing an unknown wire revision name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRevisionParseError(pub String);

impl fmt::Display for WireRevisionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid wire revision: {}", self.0)
    }
}

impl std::error::Error for WireRevisionParseError {}
