//! Match table schema: column names and the canonical type of each source column.

use polars::prelude::DataType;

pub const DATE: &str = "date";
pub const TEAM_1: &str = "team_1";
pub const TEAM_2: &str = "team_2";
pub const TEAM_1_RUNS: &str = "team_1_runs";
pub const TEAM_2_RUNS: &str = "team_2_runs";
pub const RESULT: &str = "result";
pub const POM: &str = "pom";
pub const MATCH_CATEGORY: &str = "match_category";
pub const HOST_COUNTRY: &str = "host_country";

/// Derived from `date` after concatenation.
pub const YEAR: &str = "Year";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Runs,
}

impl ColumnKind {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Runs => DataType::Float64,
        }
    }
}

/// Columns every source file must provide, in combined-table order.
pub const SOURCE_COLUMNS: [(&str, ColumnKind); 9] = [
    (DATE, ColumnKind::Text),
    (TEAM_1, ColumnKind::Text),
    (TEAM_2, ColumnKind::Text),
    (TEAM_1_RUNS, ColumnKind::Runs),
    (TEAM_2_RUNS, ColumnKind::Runs),
    (RESULT, ColumnKind::Text),
    (POM, ColumnKind::Text),
    (MATCH_CATEGORY, ColumnKind::Text),
    (HOST_COUNTRY, ColumnKind::Text),
];
