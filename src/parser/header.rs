use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::ExtractionRules;
use crate::model::{Article, PlayerBlock};
use crate::parser::names::{clean_display, UNKNOWN};
use crate::parser::segment::split_positional_analysis;

// "Jordan Whittington & Jarquez Hunter", "Daniel Jones | 29.7% Rostered",
// "Breece Hall or Zach Charbonnet"
static HEADER_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:\||&|or|vs\.?)\s+").unwrap());

const COMPLEX_SEPARATORS: &[&str] = &["|", "&", " or ", " vs "];

/// Per-article rewrite of the raw block list: position-group blocks are
/// re-scanned into sub-blocks, multi-player headers are split into one block
/// per player, and remaining names get display cleanup. Blocks whose header
/// yields no usable name are dropped.
pub fn extract_names(article: &mut Article, rules: &ExtractionRules) {
    let mut out = Vec::new();

    for block in article.players.drain(..) {
        if rules.position_groups.contains(&block.name) {
            let subs = split_positional_analysis(&block.analysis, &block.name);
            if subs.is_empty() {
                // Conservative fallback: keep the group block unsplit.
                out.push(block);
            } else {
                out.extend(subs);
            }
            continue;
        }

        let lower = block.name.to_lowercase();
        if COMPLEX_SEPARATORS.iter().any(|sep| lower.contains(sep)) {
            let names = split_complex_header(&block.name, rules);
            if names.is_empty() {
                // Everything was filtered out; best-effort single-name cleanup.
                let cleaned = clean_display(&block.name, rules);
                if !cleaned.is_empty() && cleaned != UNKNOWN {
                    out.push(PlayerBlock {
                        name: cleaned,
                        ..block
                    });
                } else {
                    debug!(header = %block.raw_header, "no extractable names, block omitted");
                }
            } else {
                for name in names {
                    out.push(PlayerBlock {
                        name,
                        ..block.clone()
                    });
                }
            }
            continue;
        }

        out.push(PlayerBlock {
            name: clean_display(&block.name, rules),
            ..block
        });
    }

    article.players = out;
}

/// Split a header naming several players into independently cleaned names.
/// Segments carrying ownership metadata ("29.7% Rostered") are discarded
/// before cleanup; survivors must be longer than 2 chars and not numeric.
pub fn split_complex_header(header: &str, rules: &ExtractionRules) -> Vec<String> {
    let text = header.replace('?', "");
    let mut names = Vec::new();

    for part in HEADER_SPLIT_RE.split(&text) {
        let part_lower = part.to_lowercase();
        if rules
            .metadata_indicators
            .iter()
            .any(|indicator| part_lower.contains(indicator.as_str()))
        {
            continue;
        }

        let name = clean_display(part, rules);
        if name != UNKNOWN && name.len() > 2 && !name.replace('.', "").chars().all(|c| c.is_ascii_digit()) {
            names.push(name);
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    fn block(name: &str, analysis: &str) -> PlayerBlock {
        PlayerBlock {
            name: name.to_string(),
            raw_header: name.to_string(),
            analysis: analysis.to_string(),
            kind: BlockKind::Standard,
        }
    }

    fn article(players: Vec<PlayerBlock>) -> Article {
        Article {
            meta_title: "t".into(),
            meta_url: "u".into(),
            meta_date: "d".into(),
            intro_text: String::new(),
            players,
        }
    }

    #[test]
    fn metadata_segment_excluded() {
        let names = split_complex_header("Daniel Jones | 29.7% Rostered", &rules());
        assert_eq!(names, vec!["Daniel Jones"]);
    }

    #[test]
    fn ampersand_split_with_command() {
        let names = split_complex_header("Add Jordan Whittington & Jarquez Hunter", &rules());
        assert_eq!(names, vec!["Jordan Whittington", "Jarquez Hunter"]);
    }

    #[test]
    fn or_split() {
        let names = split_complex_header("Breece Hall or Zach Charbonnet", &rules());
        assert_eq!(names, vec!["Breece Hall", "Zach Charbonnet"]);
    }

    #[test]
    fn numeric_segments_rejected() {
        let names = split_complex_header("De'Von Achane | 44.1", &rules());
        assert_eq!(names, vec!["De'Von Achane"]);
    }

    #[test]
    fn position_group_routes_to_rescan() {
        let analysis = "Travis Kelce TE - KC\nKelce line.\nSam LaPorta TE - DET\nLaPorta line.";
        let mut art = article(vec![block("Tight Ends", analysis)]);
        extract_names(&mut art, &rules());
        assert_eq!(art.players.len(), 2);
        assert_eq!(art.players[0].name, "Travis Kelce");
        assert_eq!(art.players[1].name, "Sam LaPorta");
        assert!(art.players.iter().all(|p| p.raw_header == "Tight Ends"));
    }

    #[test]
    fn position_group_without_subheaders_kept() {
        let mut art = article(vec![block("Sleepers", "No embedded headers here.")]);
        extract_names(&mut art, &rules());
        assert_eq!(art.players.len(), 1);
        assert_eq!(art.players[0].name, "Sleepers");
    }

    #[test]
    fn standard_header_display_cleaned() {
        let mut art = article(vec![block("Add Kimani Vidal", "text")]);
        extract_names(&mut art, &rules());
        assert_eq!(art.players[0].name, "Kimani Vidal");
    }

    #[test]
    fn split_blocks_share_analysis() {
        let mut art = article(vec![block("Jordan Mason & Tyjae Spears", "shared text")]);
        extract_names(&mut art, &rules());
        assert_eq!(art.players.len(), 2);
        assert!(art.players.iter().all(|p| p.analysis == "shared text"));
        assert!(art
            .players
            .iter()
            .all(|p| p.raw_header == "Jordan Mason & Tyjae Spears"));
    }
}
