//! Match Data Loader Module
//! Fetches the per-tournament CSVs, concatenates them with Polars and derives `Year`.

use super::schema::{self, SOURCE_COLUMNS};
use super::source::{display_name, fetch_source};
use crate::config::SourceConfig;
use once_cell::sync::Lazy;
use polars::prelude::*;
use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})").expect("year pattern is valid"));

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No data sources configured")]
    NoSources,
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        source: reqwest::Error,
    },
    #[error("Fetching {location} returned HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },
    #[error("Failed to parse {location}: {source}")]
    Csv {
        location: String,
        source: PolarsError,
    },
    #[error("{location} has no `{column}` column")]
    MissingColumn { location: String, column: String },
    #[error("Failed to combine sources: {0}")]
    Combine(#[from] PolarsError),
}

/// First run of four digits in a free-text date.
pub fn extract_year(date: &str) -> Option<i32> {
    YEAR_PATTERN
        .captures(date)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse one CSV source and reduce it to the canonical column set.
pub fn parse_source(location: &str, bytes: Vec<u8>) -> Result<DataFrame, LoadError> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|source| LoadError::Csv {
            location: location.to_string(),
            source,
        })?;

    let mut columns = Vec::with_capacity(SOURCE_COLUMNS.len());
    for (name, kind) in SOURCE_COLUMNS {
        let column = raw.column(name).map_err(|_| LoadError::MissingColumn {
            location: location.to_string(),
            column: name.to_string(),
        })?;
        let cast = column
            .cast(&kind.dtype())
            .map_err(|source| LoadError::Csv {
                location: location.to_string(),
                source,
            })?;
        columns.push(cast);
    }

    Ok(DataFrame::new(columns)?)
}

/// The combined match table. Immutable once built; clones share the frame.
#[derive(Clone)]
pub struct MatchTable {
    df: Arc<DataFrame>,
}

impl MatchTable {
    /// Build from concatenated canonical sources: drops rows without both teams,
    /// nulls out unusable run values and appends the derived `Year` column.
    pub fn from_combined(df: DataFrame) -> Result<Self, LoadError> {
        let team_1 = df.column(schema::TEAM_1)?.str()?;
        let team_2 = df.column(schema::TEAM_2)?.str()?;
        let has_teams: Vec<bool> = team_1
            .into_iter()
            .zip(team_2.into_iter())
            .map(|(a, b)| {
                a.is_some_and(|s| !s.trim().is_empty()) && b.is_some_and(|s| !s.trim().is_empty())
            })
            .collect();

        let dropped = has_teams.iter().filter(|keep| !**keep).count();
        let df = if dropped > 0 {
            tracing::warn!(rows = dropped, "dropping matches without both teams");
            df.filter(&BooleanChunked::from_slice("has_teams".into(), &has_teams))?
        } else {
            df
        };

        let mut columns = Vec::with_capacity(df.width() + 1);
        for column in df.get_columns() {
            let name = column.name().as_str();
            if name == schema::TEAM_1_RUNS || name == schema::TEAM_2_RUNS {
                columns.push(Self::clean_runs(column)?);
            } else {
                columns.push(column.clone());
            }
        }

        let years: Vec<Option<i32>> = df
            .column(schema::DATE)?
            .str()?
            .into_iter()
            .map(|date| date.and_then(extract_year))
            .collect();
        let missing = years.iter().filter(|y| y.is_none()).count();
        if missing > 0 {
            tracing::warn!(rows = missing, "no year found in match date");
        }
        columns.push(Column::new(schema::YEAR.into(), years));

        Ok(Self {
            df: Arc::new(DataFrame::new(columns)?),
        })
    }

    /// NaN, infinite and negative run totals become absent.
    fn clean_runs(column: &Column) -> Result<Column, LoadError> {
        let values: Vec<Option<f64>> = column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite() && *x >= 0.0))
            .collect();

        let before = column.f64()?.into_iter().flatten().filter(|x| !x.is_nan()).count();
        let after = values.iter().flatten().count();
        if after < before {
            tracing::warn!(
                column = column.name().as_str(),
                rows = before - after,
                "discarding negative or non-finite run totals"
            );
        }

        Ok(Column::new(column.name().clone(), values))
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct known years, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.df
            .column(schema::YEAR)
            .ok()
            .and_then(|col| col.i32().ok())
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .collect::<BTreeSet<i32>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct team names across both sides, sorted.
    pub fn available_teams(&self) -> Vec<String> {
        let mut teams = BTreeSet::new();
        for name in [schema::TEAM_1, schema::TEAM_2] {
            if let Some(ca) = self.df.column(name).ok().and_then(|col| col.str().ok()) {
                teams.extend(ca.into_iter().flatten().map(str::to_string));
            }
        }
        teams.into_iter().collect()
    }
}

/// Loads every configured source, in order, into one `MatchTable`.
pub struct MatchLoader {
    locations: Vec<String>,
    timeout: Duration,
}

impl MatchLoader {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            locations: config.locations.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn source_count(&self) -> usize {
        self.locations.len()
    }

    /// Fetch and parse all sources in parallel, then concatenate in source order.
    /// Any failing source fails the whole load.
    pub fn load(&self) -> Result<MatchTable, LoadError> {
        self.load_sources()
            .inspect_err(|e| tracing::error!(error = %e, "failed to load match data"))
    }

    fn load_sources(&self) -> Result<MatchTable, LoadError> {
        if self.locations.is_empty() {
            return Err(LoadError::NoSources);
        }

        let frames = self
            .locations
            .par_iter()
            .map(|location| {
                let bytes = fetch_source(location, self.timeout)?;
                let frame = parse_source(location, bytes)?;
                tracing::info!(
                    source = display_name(location),
                    rows = frame.height(),
                    "loaded source"
                );
                Ok(frame)
            })
            .collect::<Result<Vec<DataFrame>, LoadError>>()?;

        let mut frames = frames.into_iter();
        let mut combined = frames.next().ok_or(LoadError::NoSources)?;
        for frame in frames {
            combined.vstack_mut(&frame)?;
        }

        let table = MatchTable::from_combined(combined)?;
        tracing::info!(
            sources = self.locations.len(),
            rows = table.row_count(),
            "match data ready"
        );
        Ok(table)
    }
}
