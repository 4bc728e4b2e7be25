//! Stats module - aggregation behind the dashboard

mod calculator;
mod dashboard;

pub use calculator::{BoxSummary, StatsCalculator};
pub use dashboard::{
    DashboardCalculator, DashboardView, HostShare, KnockoutGroup, LabelCount, Summary, YearRuns,
};
