//! SCHEMACOL Core - Record Types and Field Mapping
//!
//! Pure data structures plus the translation between the internal record
//! shape and the backend wire shape. No I/O happens in this crate.

pub mod error;
pub mod form;
pub mod mapper;
pub mod model;
pub mod wire;

pub use error::ValidationError;
pub use form::{parse_int_input, parse_optional_int_input, ColumnForm, FIELD_MAX_LEN, TITLE_MAX_LEN};
pub use mapper::{
    from_backend, from_backend_traced, to_backend, to_backend_update, AnomalyKind, MappingAnomaly,
    Normalized,
};
pub use model::{ColumnId, ColumnType, ColumnTypeParseError, CreateSchemaColumn, Flag, SchemaColumn};
pub use wire::{WireRevision, WireRevisionParseError, WireSchema};
