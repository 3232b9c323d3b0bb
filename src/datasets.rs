//! CTHRU dataset catalog
//!
//! The fixed set of Socrata datasets published on the CTHRU portal, keyed by the
//! short names used on the command line.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub key: &'static str,
    /// Socrata four-by-four identifier
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Columns shown by the table renderer, in display order
    pub default_columns: &'static [&'static str],
}

pub static DATASETS: &[Dataset] = &[
    Dataset {
        key: "spending",
        id: "pegc-naaa",
        name: "Comptroller Spending",
        description: "Vendor payments and department expenditures",
        default_columns: &[
            "vendor",
            "department",
            "amount",
            "date",
            "budget_fiscal_year",
            "object_class",
        ],
    },
    Dataset {
        key: "payroll",
        id: "9ttk-7vz6",
        name: "Commonwealth Payroll",
        description: "State employee salaries and compensation",
        default_columns: &[
            "name_first",
            "name_last",
            "department_division",
            "position_title",
            "pay_total_actual",
            "year",
        ],
    },
    Dataset {
        key: "settlements",
        id: "gpqz-7ppn",
        name: "Settlements & Judgments",
        description: "Legal settlement payments",
        default_columns: &[],
    },
    Dataset {
        key: "revenue",
        id: "kcy7-ivxi",
        name: "Revenue Collections",
        description: "Tax and non-tax revenue",
        default_columns: &[],
    },
    Dataset {
        key: "retirement",
        id: "pni4-392n",
        name: "Retirement Benefits",
        description: "Pension and retirement data",
        default_columns: &[],
    },
    Dataset {
        key: "quasi_payroll",
        id: "tc5d-8ckm",
        name: "Quasi-Government Payroll",
        description: "MBTA, Massport, etc. payroll",
        default_columns: &[],
    },
    Dataset {
        key: "quasi_financials",
        id: "j7hg-9qyq",
        name: "Quasi-Government Financials",
        description: "Quasi-government spending",
        default_columns: &[],
    },
    Dataset {
        key: "new_hires",
        id: "pnz5-htzq",
        name: "New Hires",
        description: "New state employee data",
        default_columns: &[],
    },
    Dataset {
        key: "stabilization",
        id: "5v4s-nq74",
        name: "Stabilization Fund",
        description: "Rainy day fund activity",
        default_columns: &[],
    },
];

/// Look up a dataset by its short key
pub fn find(key: &str) -> Option<&'static Dataset> {
    DATASETS.iter().find(|dataset| dataset.key == key)
}

/// Like [`find`], but an unknown key is an error listing the valid keys
pub fn lookup(key: &str) -> Result<&'static Dataset> {
    find(key).ok_or_else(|| Error::UnknownDataset {
        key: key.to_string(),
        available: keys(),
    })
}

pub fn keys() -> Vec<&'static str> {
    DATASETS.iter().map(|dataset| dataset.key).collect()
}

/// Dataset backing a query command. These keys are always registered.
pub(crate) fn builtin(key: &str) -> &'static Dataset {
    match find(key) {
        Some(dataset) => dataset,
        None => unreachable!("dataset '{}' missing from catalog", key),
    }
}
