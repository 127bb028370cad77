use crate::state::snapshot::TeamDirectory;
use anyhow::Context;
use chrono::Local;
use copa_bracket::{BracketTree, Outcome, Pending, resolve};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-slot results listing, round by round, in bracket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsReport {
    pub tournament: String,
    pub exported_at: String,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub stage: String,
    pub slot: usize,
    pub home: String,
    pub away: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub extra_time: bool,
    pub penalties: Option<(u32, u32)>,
    /// Winner's name, "Draw" for a level played fixture, "Pending" otherwise.
    pub winner: String,
    pub status: String,
}

pub fn build_report(name: &str, tree: &BracketTree, teams: &dyn TeamDirectory) -> ResultsReport {
    let rows = tree
        .slot_ids()
        .map(|id| {
            let fixture = tree.slot(id);
            let outcome = resolve(fixture);
            let winner = match (outcome, fixture) {
                (Outcome::HomeAdvances, Some(m)) => teams.side_name(m.home),
                (Outcome::AwayAdvances, Some(m)) => teams.side_name(m.away),
                (Outcome::Undecided(Pending::Draw), _) => "Draw".to_string(),
                _ => "Pending".to_string(),
            };
            let status = match outcome {
                Outcome::Undecided(Pending::Unscheduled) => "TBD",
                Outcome::Undecided(Pending::NotPlayed) => "Pending",
                _ => "Played",
            };
            let score = fixture.and_then(|m| m.score());
            ResultRow {
                stage: tree.round_kind(id.round).label(),
                slot: id.index,
                home: teams.side_name(fixture.and_then(|m| m.home)),
                away: teams.side_name(fixture.and_then(|m| m.away)),
                home_goals: score.map(|(h, _)| h),
                away_goals: score.map(|(_, a)| a),
                extra_time: fixture.is_some_and(|m| m.extra_time),
                penalties: fixture.and_then(|m| m.penalties),
                winner,
                status: status.to_string(),
            }
        })
        .collect();

    ResultsReport {
        tournament: name.to_string(),
        exported_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        rows,
    }
}

/// Write the report as pretty JSON into `dir`, returning the file path.
pub fn write_report(report: &ResultsReport, dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create dir {} failed", dir.display()))?;
    let path = dir.join(format!("{}_results.json", file_stem(&report.tournament)));
    let payload = serde_json::to_string_pretty(report).context("serialize results failed")?;
    std::fs::write(&path, payload).with_context(|| format!("write {} failed", path.display()))?;
    Ok(path)
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() { "bracket".to_string() } else { stem }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::snapshot::Snapshot;

    fn snapshot() -> Snapshot {
        Snapshot::from_json(
            r#"{
                "name": "Copa 2025",
                "bracket_size": 2,
                "teams": [{"id": 1, "name": "Atlético"}, {"id": 2, "name": "Norte"}],
                "matches": [
                    {"stage": 0, "slot": 0, "home": 1, "away": 2, "home_score": 1, "away_score": 1,
                     "played": true, "extra_time": true, "penalties": [4, 3]},
                    {"stage": 0, "slot": 1, "home": 2, "away": 1, "home_score": 0, "away_score": 2, "played": true}
                ]
            }"#,
        )
        .expect("parse")
    }

    #[test]
    fn test_report_lists_every_slot() {
        let snapshot = snapshot();
        let tree = snapshot.to_tree().expect("tree");
        let report = build_report(&snapshot.name, &tree, &snapshot);
        assert_eq!(report.rows.len(), 3);

        let draw = &report.rows[0];
        assert_eq!(draw.stage, "Semifinals");
        assert_eq!(draw.winner, "Draw");
        assert_eq!(draw.status, "Played");
        assert_eq!(draw.penalties, Some((4, 3)));
        assert!(draw.extra_time);

        let away_win = &report.rows[1];
        assert_eq!(away_win.winner, "Atlético");
        assert_eq!((away_win.home_goals, away_win.away_goals), (Some(0), Some(2)));

        let final_row = &report.rows[2];
        assert_eq!(final_row.stage, "Final");
        assert_eq!(final_row.home, "TBD");
        assert_eq!(final_row.status, "TBD");
        assert_eq!(final_row.winner, "Pending");
        assert_eq!(final_row.home_goals, None);
    }

    #[test]
    fn test_writes_pretty_json() {
        let snapshot = snapshot();
        let tree = snapshot.to_tree().expect("tree");
        let report = build_report(&snapshot.name, &tree, &snapshot);
        let dir = std::env::temp_dir().join(format!("copatui-export-{}", std::process::id()));
        let path = write_report(&report, &dir).expect("write");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("copa_2025_results.json"));
        let back: ResultsReport =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(back, report);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_stem_is_sanitized() {
        assert_eq!(file_stem("Copa del Rey/2025"), "copa_del_rey_2025");
        assert_eq!(file_stem("  "), "bracket");
    }
}
