//! Headless model of the create/edit column form.
//!
//! Holds the draft the user is editing and turns it into a request payload.
//! Numeric inputs arrive as raw text, the way form widgets hand them over.

use crate::error::ValidationError;
use crate::model::{ColumnType, CreateSchemaColumn, Flag, SchemaColumn};

pub const FIELD_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 100;

/// Draft of a schema column as edited in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnForm {
    pub base_category: i64,
    pub series: Option<i64>,
    pub priority: Option<i64>,
    pub field: String,
    pub title: String,
    pub col_type: String,
    pub editable: bool,
    pub required: bool,
    pub values: String,
}

impl Default for ColumnForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnForm {
    /// Empty draft for a new column.
    pub fn new() -> Self {
        Self {
            base_category: 0,
            series: None,
            priority: None,
            field: String::new(),
            title: String::new(),
            col_type: ColumnType::String.as_str().to_string(),
            editable: true,
            required: false,
            values: String::new(),
        }
    }

    /// Draft pre-filled from an existing column.
    pub fn from_column(column: &SchemaColumn) -> Self {
        Self {
            base_category: column.base_category,
            series: column.series,
            priority: column.priority,
            field: column.field.clone(),
            title: column.title.clone(),
            col_type: if column.col_type.is_empty() {
                ColumnType::String.as_str().to_string()
            } else {
                column.col_type.clone()
            },
            editable: column.editable.is_set(),
            required: column.required.is_set(),
            values: column.values.clone(),
        }
    }

    pub fn set_base_category_input(&mut self, input: &str) {
        self.base_category = parse_int_input(input);
    }

    pub fn set_series_input(&mut self, input: &str) {
        self.series = parse_optional_int_input(input);
    }

    pub fn set_priority_input(&mut self, input: &str) {
        self.priority = parse_optional_int_input(input);
    }

    /// Check the draft and produce the payload for create or update.
    pub fn validate(&self) -> Result<CreateSchemaColumn, ValidationError> {
        let field = self.field.trim();
        let title = self.title.trim();

        if field.is_empty() {
            return Err(ValidationError::RequiredFieldMissing { field: "field" });
        }
        if title.is_empty() {
            return Err(ValidationError::RequiredFieldMissing { field: "title" });
        }
        let field_len = field.chars().count();
        if field_len > FIELD_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "field",
                len: field_len,
                max: FIELD_MAX_LEN,
            });
        }
        let title_len = title.chars().count();
        if title_len > TITLE_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                len: title_len,
                max: TITLE_MAX_LEN,
            });
        }
        if self.base_category < 0 {
            return Err(ValidationError::InvalidValue {
                field: "base_category",
                reason: "must be >= 0".to_string(),
            });
        }
        if self.col_type.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing { field: "col_type" });
        }

        Ok(CreateSchemaColumn {
            base_category: self.base_category,
            series: self.series,
            priority: self.priority,
            field: field.to_string(),
            title: title.to_string(),
            col_type: self.col_type.trim().to_string(),
            editable: Flag::from(self.editable),
            required: Flag::from(self.required),
            values: Some(self.values.clone()),
        })
    }
}

/// Required numeric input: empty or unparsable text reads as 0.
pub fn parse_int_input(input: &str) -> i64 {
    parse_optional_int_input(input).unwrap_or(0)
}

/// Optional numeric input: empty or unparsable text reads as absent.
///
/// Leading digits are honoured (`"12abc"` reads as 12), matching how
/// browser number inputs are parsed.
pub fn parse_optional_int_input(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let end = trimmed[sign_len..]
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed.len(), |(i, _)| sign_len + i);
    trimmed[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ColumnForm {
        ColumnForm {
            field: "sku".to_string(),
            title: "SKU".to_string(),
            base_category: 10,
            ..ColumnForm::new()
        }
    }

    #[test]
    fn test_new_form_defaults() {
        let form = ColumnForm::new();
        assert_eq!(form.col_type, "string");
        assert!(form.editable);
        assert_eq!(form.series, None);
        assert_eq!(form.values, "");
    }

    #[test]
    fn test_validate_produces_payload() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.field, "sku");
        assert_eq!(payload.editable, Flag::SET);
        assert_eq!(payload.values.as_deref(), Some(""));
    }

    #[test]
    fn test_validate_rejects_empty_field() {
        let form = ColumnForm {
            field: "   ".to_string(),
            ..filled()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::RequiredFieldMissing { field: "field" })
        );
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let form = ColumnForm {
            title: "t".repeat(TITLE_MAX_LEN + 1),
            ..filled()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::TooLong { field: "title", .. })
        ));
    }

    #[test]
    fn test_from_column_roundtrip() {
        let column = CreateSchemaColumn::new(2, "qty", "Quantity", "number")
            .with_series(8)
            .with_required(true)
            .into_column(5);
        let payload = ColumnForm::from_column(&column).validate().unwrap();
        assert_eq!(payload.into_column(5), column);
    }

    #[test]
    fn test_numeric_inputs() {
        assert_eq!(parse_int_input(""), 0);
        assert_eq!(parse_int_input("abc"), 0);
        assert_eq!(parse_int_input("42"), 42);
        assert_eq!(parse_int_input("12abc"), 12);
        assert_eq!(parse_optional_int_input(""), None);
        assert_eq!(parse_optional_int_input(" -7 "), Some(-7));
        assert_eq!(parse_optional_int_input("x1"), None);
        assert_eq!(parse_optional_int_input("+5"), Some(5));
        assert_eq!(parse_optional_int_input("-"), None);
    }

    #[test]
    fn test_numeric_input_extremes() {
        assert_eq!(parse_optional_int_input(&i64::MIN.to_string()), Some(i64::MIN));
        assert_eq!(parse_optional_int_input(&i64::MAX.to_string()), Some(i64::MAX));
        assert_eq!(parse_optional_int_input("9223372036854775808"), None);
    }

    #[test]
    fn test_text_inputs_fill_numeric_fields() {
        let mut form = filled();
        form.set_base_category_input("7x");
        form.set_priority_input(" 3 ");
        assert_eq!(form.base_category, 7);
        assert_eq!(form.priority, Some(3));

        form.set_base_category_input("");
        form.set_priority_input("none");
        assert_eq!(form.base_category, 0);
        assert_eq!(form.priority, None);
    }

    #[test]
    fn test_series_input_clears() {
        let mut form = filled();
        form.set_series_input("3");
        assert_eq!(form.series, Some(3));
        form.set_series_input("");
        assert_eq!(form.series, None);
    }
}
