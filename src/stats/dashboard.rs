//! Dashboard refresh: filter the match table and derive the summary cards and chart data.

use super::calculator::{BoxSummary, StatsCalculator};
use crate::data::schema;
use crate::data::{DataProcessor, FilterSelection, MatchTable, TransformError};
use std::collections::BTreeMap;
use std::time::Instant;

/// Categories shown in the knockout chart.
pub const KNOCKOUT_CATEGORIES: [&str; 2] = ["Final", "Semi-Final"];

/// Entries in the player-of-the-match chart.
pub const TOP_PLAYER_LIMIT: usize = 10;

pub const NOT_AVAILABLE: &str = "N/A";

/// Summary cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_matches: usize,
    pub total_runs: f64,
    pub run_rate: f64,
    pub top_team: String,
    pub top_player: String,
}

impl Summary {
    /// Card titles and display values, in on-screen order.
    pub fn cards(&self) -> [(&'static str, String); 5] {
        [
            ("Total Matches", self.total_matches.to_string()),
            ("Total Runs", format!("{:.0}", self.total_runs)),
            ("Avg Run Rate", self.run_rate.to_string()),
            ("Top Team", self.top_team.clone()),
            ("Top Player", self.top_player.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearRuns {
    pub year: i32,
    pub runs: f64,
}

/// One bar: a label and how often it occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnockoutGroup {
    pub category: String,
    pub runs: Vec<f64>,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostShare {
    pub country: String,
    pub matches: usize,
    /// Fraction of all counted matches, 0..=1.
    pub share: f64,
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// `None` when the refresh failed and the view is a placeholder.
    pub summary: Option<Summary>,
    pub runs_by_year: Vec<YearRuns>,
    pub team_wins: Vec<LabelCount>,
    pub knockout_margins: Vec<KnockoutGroup>,
    pub top_players: Vec<LabelCount>,
    pub host_distribution: Vec<HostShare>,
}

impl DashboardView {
    /// No summary and five empty charts.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }
}

fn label_counts(counts: Vec<(String, usize)>) -> Vec<LabelCount> {
    counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

pub struct DashboardCalculator;

impl DashboardCalculator {
    /// Recompute every dashboard output for `selection`.
    pub fn refresh(
        table: Option<&MatchTable>,
        selection: &FilterSelection,
    ) -> Result<DashboardView, TransformError> {
        let table = table.ok_or(TransformError::NoData)?;
        let started = Instant::now();

        let df = DataProcessor::filter_matches(table.dataframe(), selection)?;
        let years = DataProcessor::year_values(&df)?;
        let team_1_runs = DataProcessor::run_values(&df, schema::TEAM_1_RUNS)?;
        let team_2_runs = DataProcessor::run_values(&df, schema::TEAM_2_RUNS)?;
        let results = DataProcessor::text_values(&df, schema::RESULT)?;
        let poms = DataProcessor::text_values(&df, schema::POM)?;
        let categories = DataProcessor::text_values(&df, schema::MATCH_CATEGORY)?;
        let hosts = DataProcessor::text_values(&df, schema::HOST_COUNTRY)?;

        let total_matches = df.height();
        let total_runs =
            StatsCalculator::sum_present(&team_1_runs) + StatsCalculator::sum_present(&team_2_runs);

        let team_wins = StatsCalculator::value_counts(results.iter().map(Option::as_deref));
        let pom_counts = StatsCalculator::value_counts(poms.iter().map(Option::as_deref));

        let summary = Summary {
            total_matches,
            total_runs,
            run_rate: StatsCalculator::run_rate(total_runs, total_matches),
            top_team: team_wins
                .first()
                .map(|(label, _)| label.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            top_player: pom_counts
                .first()
                .map(|(label, _)| label.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        };

        let view = DashboardView {
            summary: Some(summary),
            runs_by_year: Self::runs_by_year(&years, &team_1_runs, &team_2_runs),
            team_wins: label_counts(team_wins),
            knockout_margins: Self::knockout_margins(&categories, &team_1_runs),
            top_players: label_counts(pom_counts.into_iter().take(TOP_PLAYER_LIMIT).collect()),
            host_distribution: Self::host_distribution(&hosts),
        };

        tracing::debug!(
            matches = total_matches,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard refreshed"
        );
        Ok(view)
    }

    /// `refresh`, degrading any failure to the empty view.
    pub fn refresh_or_empty(table: Option<&MatchTable>, selection: &FilterSelection) -> DashboardView {
        match Self::refresh(table, selection) {
            Ok(view) => view,
            Err(TransformError::NoData) => {
                tracing::warn!("refresh requested before match data loaded");
                DashboardView::empty()
            }
            Err(e) => {
                tracing::error!(error = %e, "dashboard refresh failed");
                DashboardView::empty()
            }
        }
    }

    /// Combined runs per known year, ascending.
    fn runs_by_year(
        years: &[Option<i32>],
        team_1_runs: &[Option<f64>],
        team_2_runs: &[Option<f64>],
    ) -> Vec<YearRuns> {
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for ((year, r1), r2) in years.iter().zip(team_1_runs).zip(team_2_runs) {
            if let Some(year) = year {
                *totals.entry(*year).or_default() += r1.unwrap_or(0.0) + r2.unwrap_or(0.0);
            }
        }
        totals
            .into_iter()
            .map(|(year, runs)| YearRuns { year, runs })
            .collect()
    }

    /// `team_1_runs` of finals and semi-finals, grouped by category in order of appearance.
    fn knockout_margins(categories: &[Option<String>], team_1_runs: &[Option<f64>]) -> Vec<KnockoutGroup> {
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        for (category, runs) in categories.iter().zip(team_1_runs) {
            let (Some(category), Some(runs)) = (category, runs) else {
                continue;
            };
            if !KNOCKOUT_CATEGORIES.contains(&category.as_str()) {
                continue;
            }
            match groups.iter_mut().find(|(c, _)| c == category) {
                Some((_, values)) => values.push(*runs),
                None => groups.push((category.clone(), vec![*runs])),
            }
        }

        groups
            .into_iter()
            .filter_map(|(category, runs)| {
                let summary = BoxSummary::from_values(&runs)?;
                Some(KnockoutGroup {
                    category,
                    runs,
                    summary,
                })
            })
            .collect()
    }

    fn host_distribution(hosts: &[Option<String>]) -> Vec<HostShare> {
        let counts = StatsCalculator::value_counts(hosts.iter().map(Option::as_deref));
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        counts
            .into_iter()
            .map(|(country, matches)| HostShare {
                country,
                matches,
                share: if total == 0 {
                    0.0
                } else {
                    matches as f64 / total as f64
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{table, MatchRow};
    use proptest::prelude::*;

    fn two_match_table() -> MatchTable {
        table(&[
            MatchRow::new(2003, "Australia", "India")
                .runs(Some(250.0), Some(200.0))
                .result("Australia")
                .pom("Ricky Ponting"),
            MatchRow::new(2003, "Kenya", "Sri Lanka")
                .runs(Some(f64::NAN), Some(180.0))
                .result("Sri Lanka")
                .pom("Ricky Ponting"),
        ])
    }

    fn years(years: &[i32]) -> FilterSelection {
        FilterSelection {
            years: years.iter().copied().collect(),
            ..FilterSelection::default()
        }
    }

    #[test]
    fn run_rate_card_ties_round_to_even() {
        let rows: Vec<MatchRow> = [(300.0, 300.0), (200.0, 200.0), (100.0, 100.0), (25.0, 0.0)]
            .iter()
            .map(|&(a, b)| MatchRow::new(2019, "England", "New Zealand").runs(Some(a), Some(b)))
            .collect();
        let view = DashboardCalculator::refresh(Some(&table(&rows)), &FilterSelection::default()).unwrap();
        let summary = view.summary.unwrap();
        assert_eq!(summary.total_runs, 1225.0);
        assert_eq!(summary.run_rate, 6.12);
        assert_eq!(summary.cards()[2].1, "6.12");
    }

    #[test]
    fn unfiltered_summary() {
        let view = DashboardCalculator::refresh(Some(&two_match_table()), &FilterSelection::default()).unwrap();
        let summary = view.summary.unwrap();
        assert_eq!(summary.total_matches, 2);
        assert_eq!(summary.total_runs, 630.0);
        assert_eq!(summary.run_rate, 6.3);
        assert_eq!(summary.top_team, "Australia");
        assert_eq!(summary.top_player, "Ricky Ponting");
        assert_eq!(view.runs_by_year, vec![YearRuns { year: 2003, runs: 630.0 }]);
    }

    #[test]
    fn summary_cards_format_values() {
        let view = DashboardCalculator::refresh(Some(&two_match_table()), &FilterSelection::default()).unwrap();
        let cards = view.summary.unwrap().cards();
        assert_eq!(cards[0], ("Total Matches", "2".to_string()));
        assert_eq!(cards[1], ("Total Runs", "630".to_string()));
        assert_eq!(cards[2], ("Avg Run Rate", "6.3".to_string()));
        assert_eq!(cards[3], ("Top Team", "Australia".to_string()));
    }

    #[test]
    fn selection_without_matches_yields_zeroes() {
        let view = DashboardCalculator::refresh(Some(&two_match_table()), &years(&[1999])).unwrap();
        let summary = view.summary.unwrap();
        assert_eq!(summary.total_matches, 0);
        assert_eq!(summary.total_runs, 0.0);
        assert_eq!(summary.run_rate, 0.0);
        assert_eq!(summary.top_team, NOT_AVAILABLE);
        assert_eq!(summary.top_player, NOT_AVAILABLE);
        assert!(view.runs_by_year.is_empty());
        assert!(view.team_wins.is_empty());
        assert!(view.knockout_margins.is_empty());
        assert!(view.top_players.is_empty());
        assert!(view.host_distribution.is_empty());
    }

    #[test]
    fn knockouts_need_category_and_runs() {
        let table = table(&[
            MatchRow::new(2011, "India", "Sri Lanka")
                .runs(Some(277.0), Some(274.0))
                .category("Final"),
            MatchRow::new(2007, "Australia", "Sri Lanka")
                .runs(None, Some(215.0))
                .category("Final"),
            MatchRow::new(2011, "India", "Pakistan")
                .runs(Some(260.0), Some(231.0))
                .category("Semi-Final"),
            MatchRow::new(2011, "Sri Lanka", "New Zealand")
                .runs(Some(220.0), Some(217.0))
                .category("Semi-Final"),
            MatchRow::new(2011, "India", "Australia")
                .runs(Some(261.0), Some(260.0))
                .category("Quarter-Final"),
        ]);

        let view = DashboardCalculator::refresh(Some(&table), &FilterSelection::default()).unwrap();
        let groups: Vec<(&str, &[f64])> = view
            .knockout_margins
            .iter()
            .map(|g| (g.category.as_str(), g.runs.as_slice()))
            .collect();
        assert_eq!(
            groups,
            vec![("Final", &[277.0][..]), ("Semi-Final", &[260.0, 220.0][..])]
        );
        assert_eq!(view.knockout_margins[1].summary.median, 240.0);
    }

    #[test]
    fn runs_by_year_skips_undated_matches_and_sorts() {
        let table = table(&[
            MatchRow::new(2011, "India", "Sri Lanka").runs(Some(277.0), Some(274.0)),
            MatchRow::new(1975, "England", "India").runs(Some(334.0), Some(132.0)),
            MatchRow::undated("Kenya", "Canada").runs(Some(100.0), Some(90.0)),
            MatchRow::new(2011, "Kenya", "Canada").runs(None, None),
        ]);

        let view = DashboardCalculator::refresh(Some(&table), &FilterSelection::default()).unwrap();
        assert_eq!(
            view.runs_by_year,
            vec![
                YearRuns { year: 1975, runs: 466.0 },
                YearRuns { year: 2011, runs: 551.0 },
            ]
        );
        assert_eq!(view.summary.unwrap().total_runs, 1207.0);
    }

    #[test]
    fn host_shares_sum_to_one() {
        let table = table(&[
            MatchRow::new(2011, "India", "Sri Lanka").host("India"),
            MatchRow::new(2011, "India", "Pakistan").host("India"),
            MatchRow::new(2011, "Sri Lanka", "New Zealand").host("Sri Lanka"),
            MatchRow::new(2011, "Kenya", "Canada"),
        ]);

        let view = DashboardCalculator::refresh(Some(&table), &FilterSelection::default()).unwrap();
        let hosts: Vec<(&str, usize)> = view
            .host_distribution
            .iter()
            .map(|h| (h.country.as_str(), h.matches))
            .collect();
        assert_eq!(hosts, vec![("India", 2), ("Sri Lanka", 1)]);
        let total: f64 = view.host_distribution.iter().map(|h| h.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn top_players_are_capped_at_ten() {
        let mut rows = Vec::new();
        for i in 0..12 {
            for _ in 0..=i {
                rows.push(MatchRow::new(2019, "India", "England").pom(&format!("Player {i}")));
            }
        }
        let view = DashboardCalculator::refresh(Some(&table(&rows)), &FilterSelection::default()).unwrap();
        assert_eq!(view.top_players.len(), TOP_PLAYER_LIMIT);
        assert_eq!(view.top_players[0].label, "Player 11");
        assert_eq!(view.top_players[0].count, 12);
        assert_eq!(view.summary.unwrap().top_player, "Player 11");
    }

    #[test]
    fn missing_table_is_no_data() {
        let err = DashboardCalculator::refresh(None, &FilterSelection::default()).unwrap_err();
        assert!(matches!(err, TransformError::NoData));
        assert!(DashboardCalculator::refresh_or_empty(None, &FilterSelection::default()).is_empty());
    }

    #[test]
    fn computation_failure_degrades_to_empty_view() {
        let broken = MatchTable::from_combined(
            crate::data::fixtures::frame(&[MatchRow::new(2003, "India", "Kenya")])
                .drop("result")
                .unwrap(),
        )
        .unwrap();

        let err = DashboardCalculator::refresh(Some(&broken), &FilterSelection::default()).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn(ref c) if c == "result"));

        let view = DashboardCalculator::refresh_or_empty(Some(&broken), &FilterSelection::default());
        assert_eq!(view, DashboardView::empty());
    }

    const TEAMS: [&str; 4] = ["Australia", "India", "Kenya", "Sri Lanka"];

    fn row_strategy() -> impl Strategy<Value = MatchRow> {
        (
            prop::option::of(prop::sample::select(vec![1996, 1999, 2003, 2007])),
            prop::sample::select(TEAMS.to_vec()),
            prop::sample::select(TEAMS.to_vec()),
            prop::option::of(0u32..400),
            prop::option::of(0u32..400),
            prop::option::of(prop::sample::select(TEAMS.to_vec())),
            prop::option::of(prop::sample::select(vec!["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"])),
        )
            .prop_map(|(year, t1, t2, r1, r2, result, pom)| {
                let mut row = match year {
                    Some(y) => MatchRow::new(y, t1, t2),
                    None => MatchRow::undated(t1, t2),
                };
                row = row.runs(r1.map(f64::from), r2.map(f64::from));
                row.result = result.map(str::to_string);
                row.pom = pom.map(str::to_string);
                row
            })
    }

    fn row_year(row: &MatchRow) -> Option<i32> {
        row.date.rsplit(' ').next().and_then(|y| y.parse().ok())
    }

    fn selection_strategy() -> impl Strategy<Value = FilterSelection> {
        (
            prop::collection::btree_set(prop::sample::select(vec![1996, 1999, 2003, 2007]), 0..3),
            prop::collection::btree_set(prop::sample::select(TEAMS.to_vec()), 0..3),
        )
            .prop_map(|(years, teams)| FilterSelection {
                years,
                teams: teams.into_iter().map(str::to_string).collect(),
            })
    }

    proptest! {
        #[test]
        fn summary_matches_filtered_rows(
            rows in prop::collection::vec(row_strategy(), 0..30),
            sel in selection_strategy(),
        ) {
            let table = table(&rows);
            let view = DashboardCalculator::refresh(Some(&table), &sel).unwrap();
            let summary = view.summary.clone().unwrap();

            let kept: Vec<&MatchRow> = rows
                .iter()
                .filter(|r| {
                    (sel.years.is_empty() || row_year(r).is_some_and(|y| sel.years.contains(&y)))
                        && (sel.teams.is_empty() || sel.teams.contains(&r.team_1) || sel.teams.contains(&r.team_2))
                })
                .collect();

            prop_assert_eq!(summary.total_matches, kept.len());
            let expected_runs: f64 = kept
                .iter()
                .map(|r| r.team_1_runs.unwrap_or(0.0) + r.team_2_runs.unwrap_or(0.0))
                .sum();
            prop_assert!(summary.total_runs >= 0.0);
            prop_assert_eq!(summary.total_runs, expected_runs);

            if summary.total_matches == 0 {
                prop_assert_eq!(summary.run_rate, 0.0);
            } else {
                let expected = (expected_runs / (kept.len() as f64 * 50.0) * 100.0).round() / 100.0;
                prop_assert_eq!(summary.run_rate, expected);
            }

            let distinct_years: std::collections::BTreeSet<i32> = kept
                .iter()
                .filter_map(|r| row_year(r))
                .collect();
            prop_assert_eq!(view.runs_by_year.len(), distinct_years.len());

            prop_assert!(view.top_players.len() <= TOP_PLAYER_LIMIT);
            prop_assert!(view.top_players.windows(2).all(|w| w[0].count >= w[1].count));
        }

        #[test]
        fn refresh_is_deterministic(
            rows in prop::collection::vec(row_strategy(), 0..20),
            sel in selection_strategy(),
        ) {
            let table = table(&rows);
            let first = DashboardCalculator::refresh(Some(&table), &sel).unwrap();
            let second = DashboardCalculator::refresh(Some(&table), &sel).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
