use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

/// Keyword sets driving segmentation and name extraction. Every component
/// takes these explicitly so rules can be swapped per data source and
/// exercised in isolation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Leading command verbs stripped from headers ("Add Kimani Vidal").
    pub commands: HashSet<String>,
    /// Capitalized words that are never part of a player name.
    pub stop_words: HashSet<String>,
    /// Headers naming a position group rather than a player.
    pub position_groups: HashSet<String>,
    /// Substrings marking a header segment as ownership metadata, not a name.
    pub metadata_indicators: Vec<String>,
    /// Boilerplate phrases identifying navigation/footer noise lines.
    pub noise_phrases: Vec<String>,
    /// Marker headers containing any of these are wrap-up sections, not players.
    pub header_deny_phrases: Vec<String>,
    /// Articles whose title contains one of these are skipped entirely.
    pub excluded_title_keywords: Vec<String>,
    /// Full team names; blocks resolving to one of these are discarded.
    pub team_names: HashSet<String>,
    /// Non-bullet noise lines are only dropped below this length.
    pub noise_length_limit: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            commands: set(&["Add", "Buy", "Sell", "Drop", "Hold", "Start", "Sit"]),
            stop_words: set(&[
                "Is", "Are", "Do", "Does", "Should", "Can", "Will", "Too", "Risky", "Safe",
                "Bet", "Against", "With", "Without", "In", "For", "The", "A", "An", "Vs",
                "Week", "Fantasy", "Football", "Trade", "Target", "Waiver", "Wire", "Low",
                "High", "You", "Why", "On", "Rankings", "Advice", "Draft", "Mock", "Sleepers",
                "Busts", "Or", "And", "Players", "To", "From", "Of", "Be", "Treated", "As",
                "Locked-In", "Option", "ADP", "Rostered", "Gamers", "Trust", "Go", "Back",
                "Well",
            ]),
            position_groups: set(&[
                "Quarterbacks", "Running Backs", "Wide Receivers", "Tight Ends", "Defenses",
                "Kickers", "Sleepers", "Busts", "Streamers", "Rankings", "Flex",
            ]),
            metadata_indicators: vec_of(&["rostered", "adp", "%", "owned"]),
            noise_phrases: vec_of(&[
                "Fantasy Football Draft Kit",
                "Fantasy Football Rankings",
                "Dynasty Fantasy Football Draft Kit",
                "Mock Draft Simulator",
                "Expert Accuracy Rankings",
                "Apple Podcasts",
                "Spotify",
                "SoundCloud",
                "iHeartRadio",
                "Consensus Rankings",
                "Subscribe",
                "Check out the",
                "Contact us",
            ]),
            header_deny_phrases: vec_of(&["Week", "Takeaways", "Players to"]),
            excluded_title_keywords: vec_of(&["DRAFTKINGS", "FANDUEL", "DFS", "BETTING"]),
            team_names: set(&[
                "Arizona Cardinals", "Atlanta Falcons", "Baltimore Ravens", "Buffalo Bills",
                "Carolina Panthers", "Chicago Bears", "Cincinnati Bengals", "Cleveland Browns",
                "Dallas Cowboys", "Denver Broncos", "Detroit Lions", "Green Bay Packers",
                "Houston Texans", "Indianapolis Colts", "Jacksonville Jaguars",
                "Kansas City Chiefs", "Las Vegas Raiders", "Los Angeles Chargers",
                "Los Angeles Rams", "Miami Dolphins", "Minnesota Vikings",
                "New England Patriots", "New Orleans Saints", "New York Giants",
                "New York Jets", "Philadelphia Eagles", "Pittsburgh Steelers",
                "San Francisco 49ers", "Seattle Seahawks", "Tampa Bay Buccaneers",
                "Tennessee Titans", "Washington Commanders",
            ]),
            noise_length_limit: 50,
        }
    }
}

impl ExtractionRules {
    /// Load rule overrides from a JSON file; unspecified fields keep defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules file {}", path.display()))?;
        let rules = serde_json::from_str(&data)
            .with_context(|| format!("invalid rules file {}", path.display()))?;
        Ok(rules)
    }
}

/// Season boundary dates used for week derivation and the in-season window.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SeasonCalendar {
    /// Articles dated before this have no week.
    pub season_start: NaiveDate,
    /// Dates in [season_start, week2_start) are week 1.
    pub week2_start: NaiveDate,
    /// Articles dated after this fall outside the season window.
    pub season_end: NaiveDate,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self {
            season_start: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            week2_start: NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(),
            season_end: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        }
    }
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn vec_of(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let rules = ExtractionRules::default();
        assert!(rules.commands.contains("Add"));
        assert!(rules.position_groups.contains("Tight Ends"));
        assert!(rules.team_names.contains("Seattle Seahawks"));
        assert_eq!(rules.noise_length_limit, 50);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let rules: ExtractionRules =
            serde_json::from_str(r#"{"noise_length_limit": 80}"#).unwrap();
        assert_eq!(rules.noise_length_limit, 80);
        assert!(rules.commands.contains("Sell"));
    }

    #[test]
    fn calendar_defaults() {
        let cal = SeasonCalendar::default();
        assert!(cal.season_start < cal.week2_start);
        assert!(cal.week2_start < cal.season_end);
    }
}
