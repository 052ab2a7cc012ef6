//! Team Record Normalizer: turns raw tabular rows (header -> string cell)
//! into complete `TeamStats`, resolving the many header spellings seen in
//! exported stat sheets. All shape-shifting header lookup lives here; the
//! engine only ever sees canonical metrics.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{SimError, SimResult};
use crate::metrics::{ALL_METRICS, Metric, Side, canonical_key};
use crate::team::TeamStats;

/// One normalized team plus data-quality metadata: which canonical columns
/// fell back to league defaults. The engine never reads `defaulted`; it is
/// diagnostics only.
#[derive(Debug, Clone)]
pub struct NormalizedTeam {
    pub stats: TeamStats,
    pub defaulted: Vec<String>,
}

static HEADER_ALIASES: Lazy<HashMap<String, (Metric, Side)>> = Lazy::new(build_alias_map);

const TEAM_COLUMN_ALIASES: [&str; 4] = ["team", "team name", "name", "club"];

fn build_alias_map() -> HashMap<String, (Metric, Side)> {
    let mut map = HashMap::new();
    let mut add = |aliases: &[&str], metric: Metric, side: Side| {
        for a in aliases {
            map.insert(normalize_header(a), (metric, side));
        }
        // The canonical key itself is always accepted.
        map.insert(normalize_header(&canonical_key(metric, side)), (metric, side));
    };

    use Metric::*;
    use Side::*;

    add(&["off pts/drive", "offense points per drive", "ppd", "off ppd"], PointsPerDrive, Offense);
    add(&["def pts/drive allowed", "defense points per drive", "ppd allowed", "opp ppd"], PointsPerDrive, Defense);
    add(&["off epa/play", "offense epa per play", "epa", "off epa"], EpaPerPlay, Offense);
    add(&["def epa/play allowed", "defense epa per play", "epa allowed", "def epa"], EpaPerPlay, Defense);
    add(&["off success rate", "success rate", "off sr", "sr"], SuccessRate, Offense);
    add(&["def success rate allowed", "success rate allowed", "def sr", "sr allowed"], SuccessRate, Defense);
    add(&["off explosive rate", "explosive play rate", "explosive%", "off expl"], ExplosiveRate, Offense);
    add(&["def explosive rate allowed", "explosive rate allowed", "def expl"], ExplosiveRate, Defense);
    add(&["off rz td%", "red zone td rate", "rz td rate", "off rz td rate"], RedZoneTdRate, Offense);
    add(&["def rz td% allowed", "red zone td rate allowed", "def rz td rate"], RedZoneTdRate, Defense);
    add(&["off 3-out rate", "three and out rate", "3 and out%", "off three out"], ThreeOutRate, Offense);
    add(&["def 3-out rate forced", "three and out forced", "def three out", "3 and out forced"], ThreeOutRate, Defense);
    add(&["off penalties/drive", "offense penalties per drive", "off pen"], PenaltiesPerDrive, Offense);
    add(&["def penalties/drive", "defense penalties per drive", "def pen"], PenaltiesPerDrive, Defense);
    add(&["off turnover epa", "turnover epa", "off to epa"], TurnoverEpa, Offense);
    add(&["def turnover epa", "takeaway epa", "def to epa"], TurnoverEpa, Defense);
    add(&["off start field pos", "avg starting field position", "field position", "off sfp"], StartingFieldPosition, Offense);
    add(&["def start field pos allowed", "starting field position allowed", "def sfp"], StartingFieldPosition, Defense);
    add(&["off dvoa", "offense dvoa", "dvoa"], Dvoa, Offense);
    add(&["def dvoa", "defense dvoa"], Dvoa, Defense);
    add(&["off drives/game", "drives per game", "off drives"], DrivesPerGame, Offense);
    add(&["def drives/game allowed", "drives per game allowed", "def drives", "opp drives"], DrivesPerGame, Defense);
    add(&["off plays/drive", "plays per drive", "off plays"], PlaysPerDrive, Offense);
    add(&["def plays/drive allowed", "plays per drive allowed", "def plays"], PlaysPerDrive, Defense);
    add(&["early down pass rate", "ed pass rate", "early down pass%"], EarlyDownPassRate, Offense);
    add(&["early down pass rate allowed", "ed pass rate allowed"], EarlyDownPassRate, Defense);
    add(&["no huddle rate", "no-huddle%", "nh rate"], NoHuddleRate, Offense);
    add(&["no huddle rate allowed", "no-huddle% allowed"], NoHuddleRate, Defense);

    map
}

/// Lowercase, strip punctuation to spaces, collapse runs. "Off EPA/Play" and
/// "off_epa_play" both normalize to "off epa play".
fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_space = true;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Numeric cell parser: tolerates "%" suffixes, thousands commas, and treats
/// empty / "-" cells as absent.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.trim_end_matches('%').replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize one raw row into complete `TeamStats`. Every canonical metric
/// ends up with a value; columns that could not be resolved or parsed are
/// reported back by canonical key.
pub fn normalize_row(name: &str, row: &HashMap<String, String>) -> NormalizedTeam {
    let mut values: HashMap<(Metric, Side), f64> = HashMap::new();

    for (header, cell) in row {
        let Some(&(metric, side)) = HEADER_ALIASES.get(&normalize_header(header)) else {
            continue;
        };
        if let Some(v) = parse_cell(cell) {
            // First resolved alias wins; exported sheets occasionally carry
            // both a short and a long header for the same column.
            values.entry((metric, side)).or_insert(v);
        }
    }

    let mut defaulted = Vec::new();
    for m in ALL_METRICS {
        for side in [Side::Offense, Side::Defense] {
            if !values.contains_key(&(m, side)) {
                defaulted.push(canonical_key(m, side));
            }
        }
    }
    defaulted.sort();

    NormalizedTeam {
        stats: TeamStats::new(name, values),
        defaulted,
    }
}

/// Parse a simple comma-separated stat sheet: first line is the header, one
/// team per following line. Quoted cells are not supported; team names with
/// commas do not occur in this data.
pub fn parse_team_csv(text: &str) -> SimResult<Vec<NormalizedTeam>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines
        .next()
        .ok_or_else(|| SimError::Parse("empty team file".to_string()))?;

    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let team_col = headers
        .iter()
        .position(|h| TEAM_COLUMN_ALIASES.contains(&normalize_header(h).as_str()))
        .ok_or_else(|| {
            SimError::Parse(format!(
                "no team-identifier column found (expected one of {:?})",
                TEAM_COLUMN_ALIASES
            ))
        })?;

    let mut out = Vec::new();
    for (idx, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let name = cells.get(team_col).copied().unwrap_or("");
        if name.is_empty() {
            return Err(SimError::Parse(format!(
                "row {}: empty team name",
                idx + 2
            )));
        }
        let row: HashMap<String, String> = headers
            .iter()
            .zip(&cells)
            .map(|(h, c)| (h.to_string(), c.to_string()))
            .collect();
        out.push(normalize_row(name, &row));
    }

    if out.is_empty() {
        return Err(SimError::Parse("no team rows in file".to_string()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_handles_percent_and_commas() {
        assert_eq!(parse_cell("58%").unwrap(), 58.0);
        assert_eq!(parse_cell("2.14").unwrap(), 2.14);
        assert_eq!(parse_cell("1,250").unwrap(), 1250.0);
        assert!(parse_cell("-").is_none());
        assert!(parse_cell("").is_none());
        assert!(parse_cell("n/a").is_none());
    }

    #[test]
    fn header_aliases_resolve_common_spellings() {
        let mut row = HashMap::new();
        row.insert("Off Pts/Drive".to_string(), "2.45".to_string());
        row.insert("Def EPA/Play Allowed".to_string(), "-0.04".to_string());
        let team = normalize_row("KC", &row);
        assert_eq!(team.stats.offense(Metric::PointsPerDrive), 2.45);
        assert_eq!(team.stats.defense(Metric::EpaPerPlay), -0.04);
    }

    #[test]
    fn unresolved_columns_are_reported_and_defaulted() {
        let row = HashMap::new();
        let team = normalize_row("NYJ", &row);
        // 14 metrics * 2 sides, all defaulted.
        assert_eq!(team.defaulted.len(), 28);
        assert_eq!(
            team.stats.offense(Metric::DrivesPerGame),
            Metric::DrivesPerGame.default_value()
        );
    }

    #[test]
    fn csv_requires_team_column() {
        let err = parse_team_csv("off ppd,def ppd\n2.1,2.0\n").unwrap_err();
        assert!(matches!(err, SimError::Parse(_)));
    }

    #[test]
    fn csv_roundtrip_two_teams() {
        let text = "Team,Off Pts/Drive,Def Pts/Drive Allowed,Off EPA/Play\nKC,2.55,1.85,0.10\nBUF,2.40,1.95,\n";
        let teams = parse_team_csv(text).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].stats.name, "KC");
        assert_eq!(teams[0].stats.offense(Metric::PointsPerDrive), 2.55);
        assert_eq!(teams[1].stats.defense(Metric::PointsPerDrive), 1.95);
        // EPA parsed for KC, defaulted elsewhere.
        assert!(teams[0].defaulted.iter().all(|k| k != "off_epa_play"));
        assert!(teams[1].defaulted.iter().any(|k| k == "off_epa_play"));
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        assert!(matches!(parse_team_csv(""), Err(SimError::Parse(_))));
        assert!(matches!(parse_team_csv("team\n"), Err(SimError::Parse(_))));
    }
}
