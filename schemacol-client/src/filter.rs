//! List filters for the columns collection.

use schemacol_core::{parse_optional_int_input, WireSchema};

/// Optional narrowing of a list request. Absent filters are left out of
/// the query string entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnFilter {
    pub base_category: Option<i64>,
    pub series: Option<i64>,
}

impl ColumnFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn base_category(mut self, base_category: i64) -> Self {
        self.base_category = Some(base_category);
        self
    }

    pub fn series(mut self, series: i64) -> Self {
        self.series = Some(series);
        self
    }

    /// Build from the raw text of the two filter inputs.
    pub fn from_inputs(base_category: &str, series: &str) -> Self {
        Self {
            base_category: parse_optional_int_input(base_category),
            series: parse_optional_int_input(series),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base_category.is_none() && self.series.is_none()
    }

    /// Query parameters for the present filters, named per `schema`.
    pub fn query_pairs(&self, schema: &WireSchema) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(base_category) = self.base_category {
            pairs.push((schema.base_category_param, base_category.to_string()));
        }
        if let Some(series) = self.series {
            pairs.push((schema.series_param, series.to_string()));
        }
        pairs
    }
}
