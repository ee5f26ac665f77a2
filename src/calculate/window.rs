//! History selection for rating estimation.
//!
//! A window never includes unknown results or anything played on or after
//! the cutoff date, so a prediction only sees what was known beforehand.

use chrono::{Days, NaiveDate};
use tracing::debug;

use super::{bounded, CalcError};
use crate::models::{HistoryWindow, MatchRecord};

/// `last_n` default when a cutoff date is given.
pub const DEFAULT_LAST_N_WITH_CUTOFF: u32 = 2000;
pub const MAX_LAST_N: u32 = 5000;
pub const MAX_LAST_DAYS: u32 = 3650;

/// Turn request parameters into a window.
///
/// `fallback_last_n` is used in `last_n` mode when neither a count nor a
/// cutoff was supplied.
pub fn resolve_window(
    mode: &str,
    last_n: Option<u32>,
    last_days: Option<u32>,
    cutoff: Option<NaiveDate>,
    fallback_last_n: u32,
) -> Result<HistoryWindow, CalcError> {
    match mode.trim() {
        "last_n" => {
            let default = if cutoff.is_some() {
                DEFAULT_LAST_N_WITH_CUTOFF
            } else {
                fallback_last_n
            };
            let n = bounded("last_n", last_n, default, 1, MAX_LAST_N)?;
            Ok(HistoryWindow::LastN { n })
        }
        "last_days" => {
            if last_days.is_none() {
                return Err(CalcError::InvalidArgument(
                    "last_days is required for mode last_days".to_string(),
                ));
            }
            let days = bounded("last_days", last_days, 0, 1, MAX_LAST_DAYS)?;
            Ok(HistoryWindow::LastDays { days })
        }
        other => Err(CalcError::InvalidArgument(format!(
            "mode must be one of [last_days, last_n], got '{}'",
            other
        ))),
    }
}

/// Pick the matches a prediction may learn from, oldest first.
///
/// In `LastDays` mode without a cutoff the window ends the day after the
/// latest qualifying match.
pub fn select_history<'a>(
    matches: &'a [MatchRecord],
    window: HistoryWindow,
    cutoff: Option<NaiveDate>,
    season: Option<&str>,
) -> Result<Vec<&'a MatchRecord>, CalcError> {
    let mut eligible: Vec<&MatchRecord> = Vec::with_capacity(matches.len());
    for m in matches {
        if m.final_score()?.is_none() {
            continue;
        }
        if cutoff.is_some_and(|c| m.match_date >= c) {
            continue;
        }
        if season.is_some_and(|s| !m.in_season(s)) {
            continue;
        }
        eligible.push(m);
    }
    eligible.sort_by_key(|m| m.match_date);

    let selected = match window {
        HistoryWindow::LastN { n } => {
            let skip = eligible.len().saturating_sub(n as usize);
            eligible.split_off(skip)
        }
        HistoryWindow::LastDays { days } => {
            let anchor = match cutoff {
                Some(c) => Some(c),
                None => match eligible.last() {
                    Some(m) => Some(shift_date(m.match_date, 1, true)?),
                    None => None,
                },
            };
            match anchor {
                Some(end) => {
                    let start = shift_date(end, days, false)?;
                    eligible
                        .into_iter()
                        .filter(|m| m.match_date >= start && m.match_date < end)
                        .collect()
                }
                None => Vec::new(),
            }
        }
    };

    debug!(
        "History window {:?} (cutoff {:?}, season {:?}): {} matches",
        window,
        cutoff,
        season,
        selected.len()
    );

    Ok(selected)
}

/// Move `date` by `days`, rejecting results outside chrono's date range.
fn shift_date(date: NaiveDate, days: u32, forward: bool) -> Result<NaiveDate, CalcError> {
    let delta = Days::new(u64::from(days));
    let shifted = if forward {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    };
    shifted.ok_or_else(|| {
        CalcError::InvalidArgument(format!(
            "history window of {} days from {} is out of range",
            days, date
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn result(d: &str, season: &str, home: &str, away: &str) -> MatchRecord {
        MatchRecord::new("Bundesliga", season, date(d), home, away).with_score(1, 0)
    }

    fn history() -> Vec<MatchRecord> {
        vec![
            result("2023-05-20", "2022/2023", "Bayern Munich", "Leipzig"),
            result("2023-08-18", "2023/2024", "Bremen", "Bayern Munich"),
            result("2023-08-27", "2023/2024", "Bayern Munich", "Augsburg"),
            // Not played yet
            MatchRecord::new(
                "Bundesliga",
                "2023/2024",
                date("2023-09-02"),
                "Gladbach",
                "Bayern Munich",
            ),
            result("2023-09-15", "2023/2024", "Bayern Munich", "Leverkusen"),
            result("2023-09-23", "2023/2024", "Bayern Munich", "Bochum"),
        ]
    }

    fn dates(selected: &[&MatchRecord]) -> Vec<String> {
        selected.iter().map(|m| m.match_date.to_string()).collect()
    }

    #[test]
    fn test_resolve_last_n_defaults() {
        let cutoff = Some(date("2024-01-01"));
        let with_cutoff = resolve_window("last_n", None, None, cutoff, 300).unwrap();
        assert_eq!(with_cutoff, HistoryWindow::LastN { n: 2000 });

        let without = resolve_window("last_n", None, None, None, 300).unwrap();
        assert_eq!(without, HistoryWindow::LastN { n: 300 });

        let explicit = resolve_window("last_n", Some(40), None, None, 300).unwrap();
        assert_eq!(explicit, HistoryWindow::LastN { n: 40 });
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        for result in [
            resolve_window("elo", None, None, None, 300),
            resolve_window("last_n", Some(0), None, None, 300),
            resolve_window("last_n", Some(5001), None, None, 300),
            resolve_window("last_days", None, None, None, 300),
            resolve_window("last_days", None, Some(3651), None, 300),
        ] {
            assert!(matches!(result, Err(CalcError::InvalidArgument(_))));
        }
        assert_eq!(
            resolve_window("last_days", None, Some(90), None, 300).unwrap(),
            HistoryWindow::LastDays { days: 90 }
        );
    }

    #[test]
    fn test_excludes_unknown_and_cutoff_day() {
        let matches = history();
        let selected = select_history(
            &matches,
            HistoryWindow::LastN { n: 100 },
            Some(date("2023-09-15")),
            None,
        )
        .unwrap();
        assert_eq!(dates(&selected), vec!["2023-05-20", "2023-08-18", "2023-08-27"]);
    }

    #[test]
    fn test_last_n_keeps_most_recent_in_order() {
        let matches = history();
        let selected = select_history(&matches, HistoryWindow::LastN { n: 2 }, None, None).unwrap();
        assert_eq!(dates(&selected), vec!["2023-09-15", "2023-09-23"]);
    }

    #[test]
    fn test_season_filter() {
        let matches = history();
        let selected =
            select_history(&matches, HistoryWindow::LastN { n: 100 }, None, Some("2022")).unwrap();
        assert_eq!(dates(&selected), vec!["2023-05-20"]);
    }

    #[test]
    fn test_last_days_before_cutoff() {
        let matches = history();
        let selected = select_history(
            &matches,
            HistoryWindow::LastDays { days: 30 },
            Some(date("2023-09-20")),
            None,
        )
        .unwrap();
        assert_eq!(dates(&selected), vec!["2023-08-27", "2023-09-15"]);
    }

    #[test]
    fn test_last_days_without_cutoff_anchors_on_latest() {
        let matches = history();
        let selected =
            select_history(&matches, HistoryWindow::LastDays { days: 9 }, None, None).unwrap();
        assert_eq!(dates(&selected), vec!["2023-09-15", "2023-09-23"]);
    }

    #[test]
    fn test_last_days_at_edge_of_calendar() {
        let matches = history();
        let window = HistoryWindow::LastDays { days: 3650 };
        let err = select_history(&matches, window, Some(NaiveDate::MIN), None).unwrap_err();
        assert!(matches!(err, CalcError::InvalidArgument(_)));

        let last = vec![
            MatchRecord::new("Bundesliga", "2023/2024", NaiveDate::MAX, "Bochum", "Mainz")
                .with_score(2, 2),
        ];
        let err = select_history(&last, window, None, None).unwrap_err();
        assert!(matches!(err, CalcError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_selection() {
        let window = HistoryWindow::LastDays { days: 9 };
        let selected = select_history(&[], window, None, None).unwrap();
        assert!(selected.is_empty());
    }
}
