//! Data Processor Module
//! Applies the year/team filter selection and pulls typed column values out of a frame.

use super::schema;
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("No match data loaded")]
    NoData,
    #[error("Column `{0}` is missing")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// User-chosen years and teams. An empty set means "no filtering" on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub teams: BTreeSet<String>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.teams.is_empty()
    }

    /// Human readable form used in report captions.
    pub fn describe(&self) -> String {
        let years = if self.years.is_empty() {
            "All years".to_string()
        } else {
            self.years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let teams = if self.teams.is_empty() {
            "All teams".to_string()
        } else {
            self.teams.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        format!("{} | {}", years, teams)
    }

    fn keeps(&self, year: Option<i32>, team_1: Option<&str>, team_2: Option<&str>) -> bool {
        let year_ok = self.years.is_empty() || year.is_some_and(|y| self.years.contains(&y));
        let team_ok = self.teams.is_empty()
            || team_1.is_some_and(|t| self.teams.contains(t))
            || team_2.is_some_and(|t| self.teams.contains(t));
        year_ok && team_ok
    }
}

/// Handles filtering and column extraction for the dashboard transform.
pub struct DataProcessor;

impl DataProcessor {
    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, TransformError> {
        df.column(name)
            .map_err(|_| TransformError::MissingColumn(name.to_string()))
    }

    /// Rows matching `selection`, as a new frame. The input is left untouched.
    pub fn filter_matches(
        df: &DataFrame,
        selection: &FilterSelection,
    ) -> Result<DataFrame, TransformError> {
        if selection.is_empty() {
            return Ok(df.clone());
        }

        let years = Self::column(df, schema::YEAR)?.i32()?;
        let team_1 = Self::column(df, schema::TEAM_1)?.str()?;
        let team_2 = Self::column(df, schema::TEAM_2)?.str()?;

        let mask: Vec<bool> = years
            .into_iter()
            .zip(team_1.into_iter())
            .zip(team_2.into_iter())
            .map(|((year, t1), t2)| selection.keeps(year, t1, t2))
            .collect();

        Ok(df.filter(&BooleanChunked::from_slice("selected".into(), &mask))?)
    }

    pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, TransformError> {
        Ok(Self::column(df, name)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    pub fn run_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, TransformError> {
        Ok(Self::column(df, name)?
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    pub fn year_values(df: &DataFrame) -> Result<Vec<Option<i32>>, TransformError> {
        Ok(Self::column(df, schema::YEAR)?.i32()?.into_iter().collect())
    }
}
