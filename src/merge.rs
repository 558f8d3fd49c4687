use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::parser::names::clean_join_key;

/// Column-ordered tabular data, schema-agnostic so arbitrary statistical
/// columns pass through the join untouched.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MergeDiagnostics {
    pub total: usize,
    pub matched: usize,
    /// Most frequent unmatched join names, candidate spelling mismatches.
    pub top_unmatched: Vec<(String, usize)>,
}

impl MergeDiagnostics {
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }

    pub fn print(&self) {
        println!("{}", "-".repeat(30));
        println!("Merge complete");
        println!("Total rows:          {}", self.total);
        println!("Match success rate:  {:.1}%", self.match_rate());
        println!("Missing stats:       {}", self.total - self.matched);
        if !self.top_unmatched.is_empty() {
            println!("\nTop unmatched names (cleaned):");
            for (name, count) in &self.top_unmatched {
                println!("  {:>4}  {}", count, name);
            }
        }
    }
}

/// Left outer merge of sentiment rows against stats rows on
/// `(join_name, week)`. Every sentiment row appears exactly once; the first
/// matching stats row wins; misses get empty statistical fields. Output drops
/// the redundant `PlayerName` column, and the temporary join keys never
/// materialize as columns at all.
pub fn merge_sentiment_stats(
    sentiment: &Table,
    stats: &Table,
) -> Result<(Table, MergeDiagnostics)> {
    let Some(sent_name_col) = sentiment.column("player_name") else {
        bail!("sentiment table has no player_name column");
    };
    let Some(sent_week_col) = sentiment.column("week") else {
        bail!("sentiment table has no week column");
    };
    let Some(stats_name_col) = stats.column("PlayerName") else {
        bail!("stats table has no PlayerName column");
    };
    let Some(stats_week_col) = stats.column("week") else {
        bail!("stats table has no week column");
    };

    // Stats columns carried into the output: everything but the key columns.
    let carried: Vec<usize> = (0..stats.headers.len())
        .filter(|&i| i != stats_name_col && i != stats_week_col)
        .collect();

    let mut keyed: HashMap<(String, i64), &Vec<String>> = HashMap::new();
    for row in &stats.rows {
        let key = (
            clean_join_key(row.get(stats_name_col).map(String::as_str).unwrap_or("")),
            coerce_week(row.get(stats_week_col).map(String::as_str).unwrap_or("")),
        );
        // First match wins on duplicate stats keys.
        keyed.entry(key).or_insert(row);
    }

    let mut headers = sentiment.headers.clone();
    headers.extend(carried.iter().map(|&i| stats.headers[i].clone()));

    let mut rows = Vec::with_capacity(sentiment.rows.len());
    let mut diagnostics = MergeDiagnostics {
        total: sentiment.rows.len(),
        ..Default::default()
    };
    let mut unmatched: HashMap<String, usize> = HashMap::new();

    for row in &sentiment.rows {
        let join_name =
            clean_join_key(row.get(sent_name_col).map(String::as_str).unwrap_or(""));
        let week = coerce_week(row.get(sent_week_col).map(String::as_str).unwrap_or(""));

        let mut out = row.clone();
        match keyed.get(&(join_name.clone(), week)) {
            Some(stats_row) => {
                diagnostics.matched += 1;
                out.extend(
                    carried
                        .iter()
                        .map(|&i| stats_row.get(i).cloned().unwrap_or_default()),
                );
            }
            None => {
                *unmatched.entry(join_name).or_insert(0) += 1;
                out.extend(carried.iter().map(|_| String::new()));
            }
        }
        rows.push(out);
    }

    let mut top: Vec<(String, usize)> = unmatched.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(10);
    diagnostics.top_unmatched = top;

    Ok((Table { headers, rows }, diagnostics))
}

/// Coerce a week field to an integer; non-numeric values become 0 and
/// participate in the join like any other key.
fn coerce_week(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment_table(rows: &[(&str, &str)]) -> Table {
        Table {
            headers: vec!["week".into(), "player_name".into(), "sentiment_compound".into()],
            rows: rows
                .iter()
                .map(|(week, name)| vec![week.to_string(), name.to_string(), "0.5".into()])
                .collect(),
        }
    }

    fn stats_table(rows: &[(&str, &str, &str)]) -> Table {
        Table {
            headers: vec!["PlayerName".into(), "week".into(), "TotalPoints".into()],
            rows: rows
                .iter()
                .map(|(name, week, pts)| {
                    vec![name.to_string(), week.to_string(), pts.to_string()]
                })
                .collect(),
        }
    }

    #[test]
    fn left_join_keeps_every_sentiment_row() {
        let sentiment = sentiment_table(&[("5", "Josh Allen"), ("5", "Josh Allen"), ("5", "Nobody Real")]);
        let stats = stats_table(&[("Josh Allen", "5", "28.4")]);
        let (merged, diag) = merge_sentiment_stats(&sentiment, &stats).unwrap();

        assert_eq!(merged.rows.len(), 3);
        assert_eq!(merged.headers, vec!["week", "player_name", "sentiment_compound", "TotalPoints"]);
        assert_eq!(merged.rows[0][3], "28.4");
        assert_eq!(merged.rows[1][3], "28.4");
        assert_eq!(merged.rows[2][3], "");
        assert_eq!(diag.matched, 2);
        assert_eq!(diag.total, 3);
        assert_eq!(diag.top_unmatched, vec![("nobody real".to_string(), 1)]);
    }

    #[test]
    fn join_is_format_insensitive() {
        let sentiment = sentiment_table(&[("3", "Kenneth Walker III"), ("3", "Wan'Dale Robinson")]);
        let stats = stats_table(&[("kenneth walker", "3", "11.0"), ("Wandale Robinson", "3", "9.3")]);
        let (merged, diag) = merge_sentiment_stats(&sentiment, &stats).unwrap();
        assert_eq!(diag.matched, 2);
        assert_eq!(merged.rows[0][3], "11.0");
        assert_eq!(merged.rows[1][3], "9.3");
    }

    #[test]
    fn week_mismatch_does_not_join() {
        let sentiment = sentiment_table(&[("4", "Josh Allen")]);
        let stats = stats_table(&[("Josh Allen", "5", "28.4")]);
        let (_, diag) = merge_sentiment_stats(&sentiment, &stats).unwrap();
        assert_eq!(diag.matched, 0);
    }

    #[test]
    fn non_numeric_weeks_coerce_to_zero_and_join() {
        let sentiment = sentiment_table(&[("Postseason", "Josh Allen")]);
        let stats = stats_table(&[("Josh Allen", "N/A", "28.4")]);
        let (merged, diag) = merge_sentiment_stats(&sentiment, &stats).unwrap();
        // Known data-quality risk, preserved deliberately: both coerce to 0.
        assert_eq!(diag.matched, 1);
        assert_eq!(merged.rows[0][3], "28.4");
    }

    #[test]
    fn first_stats_row_wins_on_duplicates() {
        let sentiment = sentiment_table(&[("5", "Josh Allen")]);
        let stats = stats_table(&[("Josh Allen", "5", "28.4"), ("Josh Allen", "5", "99.9")]);
        let (merged, _) = merge_sentiment_stats(&sentiment, &stats).unwrap();
        assert_eq!(merged.rows.len(), 1);
        assert_eq!(merged.rows[0][3], "28.4");
    }

    #[test]
    fn float_week_strings_coerce() {
        assert_eq!(coerce_week("5"), 5);
        assert_eq!(coerce_week("5.0"), 5);
        assert_eq!(coerce_week(" 12 "), 12);
        assert_eq!(coerce_week("Postseason"), 0);
        assert_eq!(coerce_week(""), 0);
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let bad = Table {
            headers: vec!["week".into()],
            rows: vec![],
        };
        let stats = stats_table(&[]);
        assert!(merge_sentiment_stats(&bad, &stats).is_err());
    }
}
