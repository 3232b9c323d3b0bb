//! QueryBuilder for fluent query construction
//!
//! Turns a [`FilterSpec`] into the ordered SoQL parameters sent to the portal.

use std::num::NonZeroU32;

use log::{debug, warn};

use super::filter_spec::{DatasetFilters, FilterSpec, PayrollFilters, SpendingFilters};
use super::filters::Filter;
use super::params::RemoteParams;
use crate::api::constants::params;

/// Field names behind each filter for the datasets with structured filters
mod fields {
    pub mod spending {
        pub const YEAR: &str = "budget_fiscal_year";
        pub const DEPARTMENT: &str = "department";
        pub const VENDOR: &str = "vendor";
        pub const FUND: &str = "fund";
        pub const AMOUNT: &str = "amount";
        pub const SEARCH: &[&str] = &[VENDOR, DEPARTMENT];
    }

    pub mod payroll {
        pub const YEAR: &str = "year";
        pub const DEPARTMENT: &str = "department_division";
        pub const FIRST_NAME: &str = "name_first";
        pub const LAST_NAME: &str = "name_last";
        pub const AMOUNT: &str = "pay_total_actual";
        pub const NAME: &[&str] = &[FIRST_NAME, LAST_NAME];
        pub const SEARCH: &[&str] = &[FIRST_NAME, LAST_NAME, DEPARTMENT];
    }
}

/// A SoQL request before encoding
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub limit: NonZeroU32,
    pub offset: Option<u32>,
    /// Top-level clauses, joined with AND in this order
    pub clauses: Vec<Filter>,
    pub order: Option<String>,
    /// Full-text search (`$q`)
    pub text: Option<String>,
}

impl Query {
    pub fn to_remote_params(&self) -> RemoteParams {
        let mut out = RemoteParams::new();
        out.insert(params::LIMIT, self.limit.to_string());
        if let Some(offset) = self.offset {
            out.insert(params::OFFSET, offset.to_string());
        }
        if !self.clauses.is_empty() {
            let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_soql_string()).collect();
            out.insert(params::WHERE, clauses.join(" AND "));
        }
        if let Some(order) = &self.order {
            out.insert(params::ORDER, order.clone());
        }
        if let Some(text) = &self.text {
            out.insert(params::FULL_TEXT, text.clone());
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new(limit: NonZeroU32) -> Self {
        Self {
            query: Query {
                limit,
                offset: None,
                clauses: Vec::new(),
                order: None,
                text: None,
            },
        }
    }

    pub fn offset(mut self, offset: Option<u32>) -> Self {
        self.query.offset = offset;
        self
    }

    /// Add a clause; clauses are ANDed in the order they are added
    pub fn filter(mut self, filter: Filter) -> Self {
        self.query.clauses.push(filter);
        self
    }

    pub fn filter_opt(self, filter: Option<Filter>) -> Self {
        match filter {
            Some(filter) => self.filter(filter),
            None => self,
        }
    }

    pub fn order_by(mut self, order: Option<String>) -> Self {
        self.query.order = order;
        self
    }

    pub fn full_text(mut self, text: Option<String>) -> Self {
        self.query.text = text;
        self
    }

    pub fn build(self) -> Query {
        self.query
    }

    /// Map a command's filters onto SoQL
    pub fn from_filter_spec(spec: &FilterSpec) -> Self {
        let builder = Self::new(spec.limit).offset(spec.offset);
        let search = spec.search.as_deref();

        match &spec.filters {
            DatasetFilters::Spending(filters) => builder
                .spending_clauses(filters, search)
                .order_by(spec.sort.clone()),
            DatasetFilters::Payroll(filters) => builder
                .payroll_clauses(filters, search)
                .order_by(spec.sort.clone()),
            DatasetFilters::Settlements | DatasetFilters::Revenue => {
                if spec.sort.is_some() {
                    warn!("--sort is not supported for {}; ignoring", spec.command());
                }
                builder.full_text(spec.search.clone())
            }
        }
    }

    fn spending_clauses(self, filters: &SpendingFilters, search: Option<&str>) -> Self {
        use fields::spending::*;

        self.filter_opt(filters.year.as_deref().map(|year| Filter::eq(YEAR, year)))
            .filter_opt(filters.department.as_deref().map(|dept| Filter::contains(DEPARTMENT, dept)))
            .filter_opt(filters.vendor.as_deref().map(|vendor| Filter::contains(VENDOR, vendor)))
            .filter_opt(filters.fund.as_deref().map(|fund| Filter::contains(FUND, fund)))
            .filter_opt(filters.min_amount.map(|min| Filter::ge(AMOUNT, min)))
            .filter_opt(filters.max_amount.map(|max| Filter::le(AMOUNT, max)))
            .filter_opt(search.map(|text| Filter::contains_any(SEARCH, text)))
    }

    fn payroll_clauses(self, filters: &PayrollFilters, search: Option<&str>) -> Self {
        use fields::payroll::*;

        self.filter_opt(filters.year.map(|year| Filter::eq(YEAR, year)))
            .filter_opt(filters.department.as_deref().map(|dept| Filter::contains(DEPARTMENT, dept)))
            .filter_opt(filters.min_amount.map(|min| Filter::ge(AMOUNT, min)))
            .filter_opt(filters.max_amount.map(|max| Filter::le(AMOUNT, max)))
            .filter_opt(filters.name.as_deref().map(|name| Filter::contains_any(NAME, name)))
            .filter_opt(search.map(|text| Filter::contains_any(SEARCH, text)))
    }
}

/// Build the remote parameters for one invocation
pub fn build_params(spec: &FilterSpec) -> RemoteParams {
    let params = QueryBuilder::from_filter_spec(spec).build().to_remote_params();
    debug!("Built {} parameters for {}: {:?}", params.len(), spec.command(), params);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_basic_query_builder() {
        let query = QueryBuilder::new(limit(10))
            .offset(Some(20))
            .filter(Filter::eq("year", 2024))
            .order_by(Some("year:desc".to_string()))
            .build();

        assert_eq!(query.limit.get(), 10);
        assert_eq!(query.offset, Some(20));
        assert_eq!(query.clauses.len(), 1);

        let params = query.to_remote_params();
        assert_eq!(params.keys(), vec!["$limit", "$offset", "$where", "$order"]);
        assert_eq!(params.get("$where"), Some("year = 2024"));
    }

    #[test]
    fn test_no_where_without_clauses() {
        let params = QueryBuilder::new(limit(1)).build().to_remote_params();
        assert_eq!(params.keys(), vec!["$limit"]);
    }

    #[test]
    fn test_clauses_join_with_and() {
        let params = QueryBuilder::new(limit(1))
            .filter(Filter::ge("amount", 1.0))
            .filter(Filter::le("amount", 2.0))
            .build()
            .to_remote_params();
        assert_eq!(params.get("$where"), Some("amount >= 1.0 AND amount <= 2.0"));
    }

    #[test]
    fn test_spending_filter_order() {
        let spec = FilterSpec::spending(SpendingFilters {
            year: Some("2024".to_string()),
            department: Some("Police".to_string()),
            vendor: Some("Acme".to_string()),
            fund: Some("opioid".to_string()),
            min_amount: Some(10.0),
            max_amount: Some(20.0),
        })
        .with_search("road");

        let params = build_params(&spec);
        assert_eq!(
            params.get("$where"),
            Some(
                "budget_fiscal_year = '2024' \
                 AND upper(department) like upper('%Police%') \
                 AND upper(vendor) like upper('%Acme%') \
                 AND upper(fund) like upper('%opioid%') \
                 AND amount >= 10.0 \
                 AND amount <= 20.0 \
                 AND (upper(vendor) like upper('%road%') OR upper(department) like upper('%road%'))"
            )
        );
    }

    #[test]
    fn test_payroll_name_and_search() {
        let spec = FilterSpec::payroll(PayrollFilters {
            name: Some("Lee".to_string()),
            ..Default::default()
        })
        .with_search("trooper");

        let params = build_params(&spec);
        assert_eq!(
            params.get("$where"),
            Some(
                "(upper(name_first) like upper('%Lee%') OR upper(name_last) like upper('%Lee%')) \
                 AND (upper(name_first) like upper('%trooper%') OR upper(name_last) like upper('%trooper%') \
                 OR upper(department_division) like upper('%trooper%'))"
            )
        );
    }

    #[test]
    fn test_reduced_builder_uses_full_text() {
        let spec = FilterSpec::new(DatasetFilters::Settlements)
            .with_offset(100)
            .with_search("injury")
            .with_sort("amount:desc");

        let params = build_params(&spec);
        assert_eq!(params.keys(), vec!["$limit", "$offset", "$q"]);
        assert_eq!(params.get("$q"), Some("injury"));
    }
}
