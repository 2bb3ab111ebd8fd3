//! Internal record types for schema columns

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Backend-assigned record identifier.
pub type ColumnId = i64;

// ============================================================================
// FLAG
// ============================================================================

/// A 0/1 switch. The backend stores `editable` and `required` as integers,
/// so this serializes as `0` or `1` rather than as a JSON boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flag(bool);

impl Flag {
    pub const SET: Flag = Flag(true);
    pub const UNSET: Flag = Flag(false);

    pub fn set() -> Self {
        Self::SET
    }

    pub fn is_set(self) -> bool {
        self.0
    }

    pub fn as_int(self) -> u8 {
        u8::from(self.0)
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag(value)
    }
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_int())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = Flag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0, 1 or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Flag, E> {
                Ok(Flag(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Flag, E> {
                Ok(Flag(v != 0))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Flag, E> {
                Ok(Flag(v != 0))
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

// ============================================================================
// COLUMN TYPE
// ============================================================================

/// Known column data types. Advisory only: records carry `col_type` as a
/// plain string and the mapper never rejects an unknown one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    Datetime,
    Text,
    Select,
    Multiselect,
}

impl ColumnType {
    /// All types in the order the admin form lists them.
    pub const ALL: [ColumnType; 8] = [
        ColumnType::String,
        ColumnType::Number,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Datetime,
        ColumnType::Text,
        ColumnType::Select,
        ColumnType::Multiselect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
            ColumnType::Text => "text",
            ColumnType::Select => "select",
            ColumnType::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ColumnTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColumnTypeParseError(s.to_string()))
    }
}

/// Error when parsing an unknown column type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTypeParseError(pub String);

impl fmt::Display for ColumnTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid column type: {}", self.0)
    }
}

impl std::error::Error for ColumnTypeParseError {}

// ============================================================================
// RECORDS
// ============================================================================

/// A schema column as held by the client after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub column_id: ColumnId,
    pub base_category: i64,
    pub series: Option<i64>,
    pub priority: Option<i64>,
    pub field: String,
    pub title: String,
    pub col_type: String,
    pub editable: Flag,
    pub required: Flag,
    /// Allowed values for select types; empty when the backend sent none.
    pub values: String,
}

impl SchemaColumn {
    /// The full-record payload that reproduces this column on update.
    pub fn to_create(&self) -> CreateSchemaColumn {
        CreateSchemaColumn::from(self)
    }
}

/// A schema column without its identifier. Used as the body of both create
/// and update, since update replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchemaColumn {
    pub base_category: i64,
    #[serde(default)]
    pub series: Option<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
    pub field: String,
    pub title: String,
    pub col_type: String,
    #[serde(default = "Flag::set")]
    pub editable: Flag,
    #[serde(default)]
    pub required: Flag,
    #[serde(default)]
    pub values: Option<String>,
}

impl CreateSchemaColumn {
    pub fn new(
        base_category: i64,
        field: impl Into<String>,
        title: impl Into<String>,
        col_type: impl Into<String>,
    ) -> Self {
        Self {
            base_category,
            series: None,
            priority: None,
            field: field.into(),
            title: title.into(),
            col_type: col_type.into(),
            editable: Flag::SET,
            required: Flag::UNSET,
            values: None,
        }
    }

    pub fn with_series(mut self, series: i64) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = Flag::from(editable);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Flag::from(required);
        self
    }

    /// Attach a backend-assigned id, producing a full record.
    pub fn into_column(self, column_id: ColumnId) -> SchemaColumn {
        SchemaColumn {
            column_id,
            base_category: self.base_category,
            series: self.series,
            priority: self.priority,
            field: self.field,
            title: self.title,
            col_type: self.col_type,
            editable: self.editable,
            required: self.required,
            values: self.values.unwrap_or_default(),
        }
    }
}

impl From<&SchemaColumn> for CreateSchemaColumn {
    fn from(column: &SchemaColumn) -> Self {
        Self {
            base_category: column.base_category,
            series: column.series,
            priority: column.priority,
            field: column.field.clone(),
            title: column.title.clone(),
            col_type: column.col_type.clone(),
            editable: column.editable,
            required: column.required,
            values: Some(column.values.clone()),
        }
    }
}
