//! CSV import of league results.
//!
//! Reads football-data style results files (one league per file) from a
//! directory and loads them into the match store.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use tracing::{info, warn};

use crate::models::MatchRecord;
use crate::storage::MatchStore;

/// Filename tag -> league, checked in this order.
const LEAGUE_TAGS: &[(&str, &str)] = &[
    ("PL", "Premier League"),
    ("LALIGA", "La Liga"),
    ("SA", "Serie A"),
    ("BUNDES", "Bundesliga"),
    ("LEAGUE", "Ligue 1"),
    ("E0", "Premier League"),
    ("SP1", "La Liga"),
    ("I1", "Serie A"),
    ("D1", "Bundesliga"),
    ("F1", "Ligue 1"),
];

const HOME_TEAM: &[&str] = &["HomeTeam", "Home"];
const AWAY_TEAM: &[&str] = &["AwayTeam", "Away"];
const HOME_GOALS: &[&str] = &["FTHG", "HG"];
const AWAY_GOALS: &[&str] = &["FTAG", "AG"];
const MATCH_DATE: &[&str] = &["Date"];
const SEASON: &[&str] = &["Season"];

/// Counts from one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_skipped: usize,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub inserted: usize,
    pub updated: usize,
}

/// Rows parsed from a single file.
#[derive(Debug)]
pub struct FileImport {
    pub league: String,
    pub records: Vec<MatchRecord>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// League for a results file, from a tag in its name.
pub fn detect_league(file_name: &str) -> Option<&'static str> {
    let upper = file_name.to_uppercase();
    LEAGUE_TAGS
        .iter()
        .find(|(tag, _)| upper.contains(tag))
        .map(|(_, league)| *league)
}

/// Parse `dd/mm/yyyy`, `dd/mm/yy` or `yyyy-mm-dd`.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.contains('/') {
        // chrono's %Y also takes two digits, so pick the format by length
        let year_len = raw.rsplit('/').next().map_or(0, str::len);
        let format = match year_len {
            4 => "%d/%m/%Y",
            2 => "%d/%m/%y",
            _ => return None,
        };
        NaiveDate::parse_from_str(raw, format).ok()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Season label for a match date. Seasons start in July.
pub fn season_for_date(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 7 {
        format!("{}/{}", year, year + 1)
    } else {
        format!("{}/{}", year - 1, year)
    }
}

/// Goal count; accepts `2` and `2.0`, anything else is missing.
fn parse_goals(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h.trim() == *alias))
}

fn required_column(
    headers: &StringRecord,
    aliases: &[&str],
    name: &str,
    path: &Path,
) -> Result<usize> {
    match find_column(headers, aliases) {
        Some(idx) => Ok(idx),
        None => bail!("Missing column '{}' in file: {}", name, path.display()),
    }
}

fn field(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse one results file for `league`.
pub fn read_results_file(path: &Path, league: &str) -> Result<FileImport> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();

    let home_idx = required_column(&headers, HOME_TEAM, "home_team", path)?;
    let away_idx = required_column(&headers, AWAY_TEAM, "away_team", path)?;
    let date_idx = required_column(&headers, MATCH_DATE, "match_date", path)?;
    let home_goals_idx = find_column(&headers, HOME_GOALS);
    let away_goals_idx = find_column(&headers, AWAY_GOALS);
    let season_idx = find_column(&headers, SEASON);

    let mut import = FileImport {
        league: league.to_string(),
        records: Vec::new(),
        rows_read: 0,
        rows_dropped: 0,
    };

    for (i, row) in reader.records().enumerate() {
        let line = i + 2;
        let row = row.with_context(|| format!("Bad CSV row {} in {}", line, path.display()))?;
        import.rows_read += 1;

        let (Some(home), Some(away)) = (field(&row, Some(home_idx)), field(&row, Some(away_idx)))
        else {
            import.rows_dropped += 1;
            continue;
        };
        let Some(date) = field(&row, Some(date_idx)).and_then(parse_match_date) else {
            import.rows_dropped += 1;
            continue;
        };
        let season = match field(&row, season_idx) {
            Some(s) => s.to_string(),
            None => season_for_date(date),
        };

        let mut record = MatchRecord::new(league, season, date, home, away);
        let goals = (
            parse_goals(field(&row, home_goals_idx)),
            parse_goals(field(&row, away_goals_idx)),
        );
        match goals {
            (Some(h), Some(a)) => record = record.with_score(h, a),
            (None, None) => {}
            (h, a) => warn!(
                "Line {} in {}: one-sided score {:?}-{:?}, storing as unknown",
                line,
                path.display(),
                h,
                a
            ),
        }
        import.records.push(record);
    }

    info!(
        "Parsed {} rows from {} ({}), dropped {}",
        import.records.len(),
        path.display(),
        league,
        import.rows_dropped
    );
    Ok(import)
}

/// CSV files in `dir`, sorted by name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Import every recognised results file in `dir` into `store`.
///
/// With `replace` the store is cleared first; otherwise rows are upserted by
/// id so re-importing a file updates scores in place.
pub fn import_dir(dir: &Path, store: &MatchStore, replace: bool) -> Result<ImportSummary> {
    let files = list_csv_files(dir)?;
    info!("Found {} CSV files in {}", files.len(), dir.display());

    let mut summary = ImportSummary::default();
    let mut records = Vec::new();

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(league) = detect_league(&name) else {
            warn!("Skipping {}: unknown league", name);
            summary.files_skipped += 1;
            continue;
        };

        let import = read_results_file(path, league)?;
        summary.files_imported += 1;
        summary.rows_read += import.rows_read;
        summary.rows_dropped += import.rows_dropped;
        records.extend(import.records);
    }

    if replace {
        store.clear().context("Failed to clear match store")?;
    }
    let upserted = store
        .upsert(&records)
        .context("Failed to write match store")?;
    summary.inserted = upserted.inserted;
    summary.updated = upserted.updated;

    info!(
        "Imported {} files ({} skipped): {} inserted, {} updated, {} rows dropped",
        summary.files_imported,
        summary.files_skipped,
        summary.inserted,
        summary.updated,
        summary.rows_dropped
    );
    Ok(summary)
}
