//! SoQL filter building
//!
//! Provides type-safe construction of `$where` predicates. String literals are
//! always escaped before interpolation.

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    // Comparison operators
    Eq(String, FilterValue),
    Ge(String, FilterValue),
    Le(String, FilterValue),

    /// Case-insensitive substring match
    Contains(String, String),

    // Logical operators
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Integer(i64),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn ge(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Ge(field.into(), value.into())
    }

    pub fn le(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Le(field.into(), value.into())
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains(field.into(), value.into())
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// Same substring match against each field, combined with OR
    pub fn contains_any(fields: &[&str], value: &str) -> Self {
        Self::Or(
            fields
                .iter()
                .map(|field| Filter::contains(*field, value))
                .collect(),
        )
    }

    /// Convert filter to a SoQL `$where` expression
    pub fn to_soql_string(&self) -> String {
        match self {
            Filter::Eq(field, value) => format!("{} = {}", field, value.to_soql_string()),
            Filter::Ge(field, value) => format!("{} >= {}", field, value.to_soql_string()),
            Filter::Le(field, value) => format!("{} <= {}", field, value.to_soql_string()),

            Filter::Contains(field, value) => {
                format!("upper({}) like upper('%{}%')", field, escape_literal(value))
            }

            Filter::And(filters) => join_group(filters, " AND "),
            Filter::Or(filters) => join_group(filters, " OR "),
        }
    }
}

fn join_group(filters: &[Filter], separator: &str) -> String {
    match filters {
        [single] => single.to_soql_string(),
        _ => {
            let parts: Vec<String> = filters.iter().map(|f| f.to_soql_string()).collect();
            format!("({})", parts.join(separator))
        }
    }
}

/// Double single quotes so the value cannot terminate a SoQL string literal
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Decimal rendering for amount comparisons. Whole numbers keep one fractional
/// digit (`100000` -> `100000.0`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl FilterValue {
    pub fn to_soql_string(&self) -> String {
        match self {
            FilterValue::Text(s) => format!("'{}'", escape_literal(s)),
            FilterValue::Number(n) => format_decimal(*n),
            FilterValue::Integer(i) => i.to_string(),
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Integer(value as i64)
    }
}
