//! Test-only match rows and table builder.

use super::loader::MatchTable;
use super::schema;
use polars::prelude::*;

#[derive(Debug, Clone)]
pub struct MatchRow {
    pub date: String,
    pub team_1: String,
    pub team_2: String,
    pub team_1_runs: Option<f64>,
    pub team_2_runs: Option<f64>,
    pub result: Option<String>,
    pub pom: Option<String>,
    pub match_category: Option<String>,
    pub host_country: Option<String>,
}

impl MatchRow {
    pub fn new(year: i32, team_1: &str, team_2: &str) -> Self {
        Self {
            date: format!("12 March {}", year),
            ..Self::undated(team_1, team_2)
        }
    }

    pub fn undated(team_1: &str, team_2: &str) -> Self {
        Self {
            date: "TBD".to_string(),
            team_1: team_1.to_string(),
            team_2: team_2.to_string(),
            team_1_runs: None,
            team_2_runs: None,
            result: None,
            pom: None,
            match_category: None,
            host_country: None,
        }
    }

    pub fn runs(mut self, team_1: Option<f64>, team_2: Option<f64>) -> Self {
        self.team_1_runs = team_1;
        self.team_2_runs = team_2;
        self
    }

    pub fn result(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self
    }

    pub fn pom(mut self, pom: &str) -> Self {
        self.pom = Some(pom.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.match_category = Some(category.to_string());
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host_country = Some(host.to_string());
        self
    }
}

/// Canonical frame for `rows`, before `Year` derivation.
pub fn frame(rows: &[MatchRow]) -> DataFrame {
    let text = |f: fn(&MatchRow) -> Option<String>| -> Vec<Option<String>> {
        rows.iter().map(f).collect()
    };
    let runs = |f: fn(&MatchRow) -> Option<f64>| -> Vec<Option<f64>> { rows.iter().map(f).collect() };

    DataFrame::new(vec![
        Column::new(schema::DATE.into(), text(|r| Some(r.date.clone()))),
        Column::new(schema::TEAM_1.into(), text(|r| Some(r.team_1.clone()))),
        Column::new(schema::TEAM_2.into(), text(|r| Some(r.team_2.clone()))),
        Column::new(schema::TEAM_1_RUNS.into(), runs(|r| r.team_1_runs)),
        Column::new(schema::TEAM_2_RUNS.into(), runs(|r| r.team_2_runs)),
        Column::new(schema::RESULT.into(), text(|r| r.result.clone())),
        Column::new(schema::POM.into(), text(|r| r.pom.clone())),
        Column::new(schema::MATCH_CATEGORY.into(), text(|r| r.match_category.clone())),
        Column::new(schema::HOST_COUNTRY.into(), text(|r| r.host_country.clone())),
    ])
    .unwrap()
}

pub fn table(rows: &[MatchRow]) -> MatchTable {
    MatchTable::from_combined(frame(rows)).unwrap()
}
