//! Translation between [`SchemaColumn`] and the backend wire shape.
//!
//! Reading is total: every JSON shape the backend might send produces a
//! record. Each time a default stands in for something the backend sent
//! (or failed to send) a [`MappingAnomaly`] is recorded so callers can log
//! it. Nothing here returns an error.

use crate::model::{ColumnId, CreateSchemaColumn, Flag, SchemaColumn};
use crate::wire::WireSchema;
use serde_json::{Map, Value};
use std::fmt;

/// Type used when the backend omits or garbles `col_type`.
pub const DEFAULT_COL_TYPE: &str = "string";

// ============================================================================
// OUTBOUND
// ============================================================================

/// Build the backend body for a create request.
pub fn to_backend(schema: &WireSchema, data: &CreateSchemaColumn) -> Value {
    let mut body = Map::new();
    body.insert(schema.base_category.to_string(), Value::from(data.base_category));
    body.insert(schema.series.to_string(), optional_number(data.series));
    body.insert(schema.priority.to_string(), optional_number(data.priority));
    body.insert(schema.field.to_string(), Value::from(data.field.as_str()));
    body.insert(schema.title.to_string(), Value::from(data.title.as_str()));
    body.insert(schema.col_type.to_string(), Value::from(data.col_type.as_str()));
    body.insert(schema.editable.to_string(), Value::from(data.editable.as_int()));
    body.insert(schema.required.to_string(), Value::from(data.required.as_int()));
    body.insert(
        schema.values.to_string(),
        data.values.as_deref().map_or(Value::Null, Value::from),
    );
    Value::Object(body)
}

/// Build the backend body for an update. The backend expects the id in the
/// body as well as in the path.
pub fn to_backend_update(schema: &WireSchema, id: ColumnId, data: &CreateSchemaColumn) -> Value {
    let mut body = to_backend(schema, data);
    if let Value::Object(map) = &mut body {
        map.insert(schema.column_id.to_string(), Value::from(id));
    }
    body
}

fn optional_number(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::from)
}

// ============================================================================
// INBOUND
// ============================================================================

/// Something the mapper had to paper over while reading a backend record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingAnomaly {
    /// Backend key the anomaly was found under. Empty for whole-record issues.
    pub key: &'static str,
    pub kind: AnomalyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyKind {
    /// The record itself was not a JSON object.
    NotAnObject { found: &'static str },
    /// A key the record cannot do without was absent or null.
    Missing,
    /// The key held a JSON type the field cannot use.
    WrongType { found: &'static str },
    /// A non-negative field held a negative number.
    Negative { value: i64 },
    /// The text was empty and was filled from another field.
    Derived { from: &'static str },
}

impl fmt::Display for MappingAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AnomalyKind::NotAnObject { found } => {
                write!(f, "record is a JSON {} instead of an object", found)
            }
            AnomalyKind::Missing => write!(f, "{} is missing", self.key),
            AnomalyKind::WrongType { found } => {
                write!(f, "{} has unexpected type {}", self.key, found)
            }
            AnomalyKind::Negative { value } => write!(f, "{} is negative ({})", self.key, value),
            AnomalyKind::Derived { from } => write!(f, "{} is empty, filled from {}", self.key, from),
        }
    }
}

/// A record read from the backend together with the defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub record: SchemaColumn,
    pub anomalies: Vec<MappingAnomaly>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Read a backend record, discarding the anomaly report.
pub fn from_backend(schema: &WireSchema, payload: &Value) -> SchemaColumn {
    from_backend_traced(schema, payload).record
}

/// Read a backend record and report every default that was applied.
pub fn from_backend_traced(schema: &WireSchema, payload: &Value) -> Normalized {
    let empty = Map::new();
    let mut reader = match payload {
        Value::Object(map) => Reader::new(map),
        other => {
            let mut reader = Reader::new(&empty);
            reader.note("", AnomalyKind::NotAnObject { found: kind_of(other) });
            reader
        }
    };

    let column_id = reader.column_id(schema);
    let base_category = reader.non_negative_int(schema.base_category);
    let series = reader.optional_int(schema.series);
    let priority = reader.optional_int(schema.priority);
    let raw_field = reader.text(schema.field);
    let raw_title = reader.text(schema.title);
    let col_type = reader
        .text(schema.col_type)
        .unwrap_or_else(|| DEFAULT_COL_TYPE.to_string());
    let editable = reader.flag(schema.editable);
    let required = reader.flag(schema.required);
    let values = reader.values_text(schema.values);

    let (field, title) = match (raw_field, raw_title) {
        (Some(field), Some(title)) => (field, title),
        (Some(field), None) => {
            reader.note(schema.title, AnomalyKind::Derived { from: schema.field });
            (field.clone(), field)
        }
        (None, Some(title)) => {
            reader.note(schema.field, AnomalyKind::Derived { from: schema.title });
            (title.clone(), title)
        }
        (None, None) => {
            let placeholder = format!("column_{}", column_id);
            reader.note(schema.field, AnomalyKind::Derived { from: schema.column_id });
            reader.note(schema.title, AnomalyKind::Derived { from: schema.column_id });
            (placeholder.clone(), placeholder)
        }
    };

    Normalized {
        record: SchemaColumn {
            column_id,
            base_category,
            series,
            priority,
            field,
            title,
            col_type,
            editable,
            required,
            values,
        },
        anomalies: reader.anomalies,
    }
}

struct Reader<'a> {
    map: &'a Map<String, Value>,
    anomalies: Vec<MappingAnomaly>,
}

impl<'a> Reader<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            anomalies: Vec::new(),
        }
    }

    fn note(&mut self, key: &'static str, kind: AnomalyKind) {
        self.anomalies.push(MappingAnomaly { key, kind });
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Primary id key first, then the fallback key; first usable value wins.
    fn column_id(&mut self, schema: &WireSchema) -> ColumnId {
        for key in [schema.column_id, schema.fallback_id] {
            if let Some(value) = self.get(key) {
                match int_value(value) {
                    Some(id) => return id,
                    None => self.note(key, AnomalyKind::WrongType { found: kind_of(value) }),
                }
            }
        }
        self.note(schema.column_id, AnomalyKind::Missing);
        0
    }

    fn non_negative_int(&mut self, key: &'static str) -> i64 {
        match self.get(key) {
            None => {
                self.note(key, AnomalyKind::Missing);
                0
            }
            Some(value) => match int_value(value) {
                Some(n) if n >= 0 => n,
                Some(n) => {
                    self.note(key, AnomalyKind::Negative { value: n });
                    0
                }
                None => {
                    self.note(key, AnomalyKind::WrongType { found: kind_of(value) });
                    0
                }
            },
        }
    }

    /// Null and absence are legitimate here and map to `None` silently.
    fn optional_int(&mut self, key: &'static str) -> Option<i64> {
        let value = self.get(key)?;
        let parsed = int_value(value);
        if parsed.is_none() {
            self.note(key, AnomalyKind::WrongType { found: kind_of(value) });
        }
        parsed
    }

    /// Trimmed non-empty string, or `None`.
    fn text(&mut self, key: &'static str) -> Option<String> {
        match self.get(key) {
            None => {
                self.note(key, AnomalyKind::Missing);
                None
            }
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(other) => {
                self.note(key, AnomalyKind::WrongType { found: kind_of(other) });
                None
            }
        }
    }

    fn flag(&mut self, key: &'static str) -> Flag {
        match self.get(key) {
            None => {
                self.note(key, AnomalyKind::Missing);
                Flag::UNSET
            }
            Some(value) => flag_value(value).unwrap_or_else(|| {
                self.note(key, AnomalyKind::WrongType { found: kind_of(value) });
                Flag::UNSET
            }),
        }
    }

    fn values_text(&mut self, key: &'static str) -> String {
        self.get(key).map(values_value).unwrap_or_default()
    }
}

// ============================================================================
// PER-SHAPE NORMALIZATION
// ============================================================================

/// Booleans as-is, numbers by truthiness. Every other shape is unusable.
pub fn flag_value(value: &Value) -> Option<Flag> {
    match value {
        Value::Bool(b) => Some(Flag::from(*b)),
        Value::Number(n) => Some(Flag::from(n.as_f64().is_some_and(|f| f != 0.0))),
        _ => None,
    }
}

/// Integers, integral floats, and strings holding an integer.
pub fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Strings verbatim; any other JSON shape as compact JSON text.
pub fn values_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
