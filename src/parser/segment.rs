use std::sync::LazyLock;

use regex::Regex;

use crate::config::ExtractionRules;
use crate::model::{BlockKind, PlayerBlock};

/// Literal boundary injected by the scraper around player headings.
pub const PLAYER_MARKER: &str = "### PLAYER SECTION:";

// "Michael Wilson – 16 targets" / "Michael Wilson - 16 targets"
static TARGET_TREND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)[–-]\s*\d+\s*targets").unwrap());
// "QB – Matthew Stafford" / "RB - James Robinson"
static START_SIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(QB|RB|WR|TE|DEF|K)\s*[–-]\s*(.+)").unwrap());
// "Matthew Stafford@ SEA" / "Josh Allen vs. MIA"
static OPPONENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\s+vs\.?\s+|\s*@\s*)").unwrap());
// "Travis Kelce TE - KC" embedded inside a position-group block
static EMBEDDED_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-zA-Z\.\s]+)(QB|RB|WR|TE|DEF|K)\s*-\s*[A-Z]{2,3}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Marker,
    Pattern,
}

#[derive(Debug)]
pub struct Segmented {
    pub intro_text: String,
    pub blocks: Vec<PlayerBlock>,
    pub strategy: Strategy,
}

/// Line-scan accumulator. "No block started yet" is represented
/// structurally, so a save on malformed state cannot be attempted at all;
/// wrap-up sections are carried as non-kept blocks and dropped on close.
enum ScanState {
    Intro,
    InPlayer {
        keep: bool,
        name: String,
        raw_header: String,
        kind: BlockKind,
        lines: Vec<String>,
    },
}

impl ScanState {
    /// Finalize the current block, if any, and fall back to Intro.
    /// The single save path shared by both strategies.
    fn close(&mut self, blocks: &mut Vec<PlayerBlock>) {
        if let ScanState::InPlayer {
            keep,
            name,
            raw_header,
            kind,
            lines,
        } = std::mem::replace(self, ScanState::Intro)
        {
            if keep {
                blocks.push(PlayerBlock {
                    name,
                    raw_header,
                    analysis: lines.join("\n\n").trim().to_string(),
                    kind,
                });
            }
        }
    }

    fn open(
        &mut self,
        blocks: &mut Vec<PlayerBlock>,
        keep: bool,
        name: String,
        raw_header: String,
        kind: BlockKind,
    ) {
        self.close(blocks);
        *self = ScanState::InPlayer {
            keep,
            name,
            raw_header,
            kind,
            lines: Vec::new(),
        };
    }

    fn append(&mut self, line: String, intro: &mut Vec<String>) {
        match self {
            ScanState::Intro => intro.push(line),
            ScanState::InPlayer { lines, .. } => lines.push(line),
        }
    }
}

/// Split one article body into intro text and an ordered sequence of player
/// blocks. The marker strategy applies whenever the scraper injected
/// explicit boundaries; otherwise block starts are discovered by regex.
pub fn segment(body_text: &str, rules: &ExtractionRules) -> Segmented {
    let strategy = if body_text.contains(PLAYER_MARKER) {
        Strategy::Marker
    } else {
        Strategy::Pattern
    };

    let mut blocks = Vec::new();
    let mut intro: Vec<String> = Vec::new();
    let mut state = ScanState::Intro;

    for line in body_text.lines() {
        let line = line.trim();
        if line.is_empty() || is_noise_line(line, rules) {
            continue;
        }

        match strategy {
            Strategy::Marker => scan_marker_line(line, rules, &mut state, &mut blocks, &mut intro),
            Strategy::Pattern => scan_pattern_line(line, &mut state, &mut blocks, &mut intro),
        }
    }
    state.close(&mut blocks);

    Segmented {
        intro_text: intro.join("\n\n").trim().to_string(),
        blocks,
        strategy,
    }
}

fn scan_marker_line(
    line: &str,
    rules: &ExtractionRules,
    state: &mut ScanState,
    blocks: &mut Vec<PlayerBlock>,
    intro: &mut Vec<String>,
) {
    if let Some(idx) = line.find(PLAYER_MARKER) {
        let raw_header = line[idx + PLAYER_MARKER.len()..].trim().to_string();
        let name = header_name(&raw_header);
        // Wrap-up headers ("Week 9 Takeaways") are section trailers, not
        // players; their text must not leak into intro or a real block.
        let keep = !rules
            .header_deny_phrases
            .iter()
            .any(|phrase| name.contains(phrase.as_str()));
        state.open(blocks, keep, name, raw_header, BlockKind::Standard);
        return;
    }

    if let Some(heading) = line.strip_prefix("###") {
        // Generic sub-heading: preserve structure as emphasized text.
        state.append(format!("**{}**", heading.trim()), intro);
        return;
    }

    state.append(line.to_string(), intro);
}

fn scan_pattern_line(
    line: &str,
    state: &mut ScanState,
    blocks: &mut Vec<PlayerBlock>,
    intro: &mut Vec<String>,
) {
    if let Some(caps) = TARGET_TREND_RE.captures(line) {
        let name = caps[1].trim().to_string();
        state.open(blocks, true, name, line.to_string(), BlockKind::TargetTrend);
        return;
    }

    if let Some(caps) = START_SIT_RE.captures(line) {
        let name = strip_opponent(caps[2].trim());
        state.open(blocks, true, name, line.to_string(), BlockKind::StartSit);
        return;
    }

    state.append(line.to_string(), intro);
}

/// Re-scan a position-group block ("Tight Ends") for embedded
/// `<Name> <POS> - <TEAM>` sub-headers, one sub-block per match. The group
/// label is inherited as each sub-block's raw header. Empty when the text
/// carries no embedded headers; callers keep the original block in that case.
pub fn split_positional_analysis(analysis: &str, group_header: &str) -> Vec<PlayerBlock> {
    let mut found = Vec::new();
    let mut state = ScanState::Intro;
    let mut discard = Vec::new();

    for line in analysis.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = EMBEDDED_HEADER_RE.captures(line) {
            let name = caps[1].trim().to_string();
            state.open(&mut found, true, name, group_header.to_string(), BlockKind::Standard);
        }
        // Sub-header lines stay in their block's text; lines before the
        // first sub-header have no player to attach to.
        state.append(line.to_string(), &mut discard);
    }
    state.close(&mut found);

    found
}

/// "Chris Rodriguez Jr., RB, Washington Commanders" → "Chris Rodriguez Jr."
fn header_name(raw_header: &str) -> String {
    let text = raw_header.trim();
    match text.split_once(',') {
        Some((name, _)) => name.trim().to_string(),
        None => text.to_string(),
    }
}

/// "Matthew Stafford@ SEA" → "Matthew Stafford"
fn strip_opponent(raw: &str) -> String {
    OPPONENT_SPLIT_RE
        .splitn(raw, 2)
        .next()
        .unwrap_or(raw)
        .trim()
        .to_string()
}

fn is_noise_line(line: &str, rules: &ExtractionRules) -> bool {
    let lower = line.to_lowercase();
    let matches_phrase = rules
        .noise_phrases
        .iter()
        .any(|phrase| lower.contains(&phrase.to_lowercase()));
    if !matches_phrase {
        return false;
    }
    let bullet = line.starts_with('*') || line.starts_with("- ");
    bullet || line.len() < rules.noise_length_limit
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    #[test]
    fn marker_round_trip_two_blocks() {
        let body = "Intro paragraph.\n\n\
            ### PLAYER SECTION: Chris Godwin, WR, Tampa Bay Buccaneers\n\n\
            Godwin analysis line one.\n\nGodwin analysis line two.\n\n\
            ### PLAYER SECTION: Rachaad White\n\nWhite analysis.";
        let seg = segment(body, &rules());
        assert_eq!(seg.strategy, Strategy::Marker);
        assert_eq!(seg.intro_text, "Intro paragraph.");
        assert_eq!(seg.blocks.len(), 2);
        assert_eq!(seg.blocks[0].name, "Chris Godwin");
        assert_eq!(
            seg.blocks[0].analysis,
            "Godwin analysis line one.\n\nGodwin analysis line two."
        );
        assert_eq!(seg.blocks[1].name, "Rachaad White");
        assert_eq!(seg.blocks[1].analysis, "White analysis.");
    }

    #[test]
    fn wrapup_header_discarded_with_its_text() {
        let body = "### PLAYER SECTION: Justin Fields\n\nFields text.\n\n\
            ### PLAYER SECTION: Week 9 Takeaways\n\nWrap-up text that is not a player.";
        let seg = segment(body, &rules());
        assert_eq!(seg.blocks.len(), 1);
        assert_eq!(seg.blocks[0].name, "Justin Fields");
        assert!(!seg.intro_text.contains("Wrap-up"));
    }

    #[test]
    fn generic_heading_kept_as_emphasis() {
        let body = "### Injury Report\n\nSome intro.\n\n\
            ### PLAYER SECTION: Joe Burrow\n\n### Outlook\n\nBurrow text.";
        let seg = segment(body, &rules());
        assert!(seg.intro_text.contains("**Injury Report**"));
        assert!(seg.blocks[0].analysis.contains("**Outlook**"));
    }

    #[test]
    fn noise_lines_filtered() {
        let body = "* Check out the Mock Draft Simulator\n\nSubscribe\n\n\
            ### PLAYER SECTION: Joe Mixon\n\n* Apple Podcasts\n\nReal Mixon analysis.";
        let seg = segment(body, &rules());
        assert!(seg.intro_text.is_empty());
        assert_eq!(seg.blocks[0].analysis, "Real Mixon analysis.");
    }

    #[test]
    fn long_line_mentioning_noise_phrase_survives() {
        let long = "This long sentence happens to mention Consensus Rankings while carrying real analysis about a player.";
        let body = format!("### PLAYER SECTION: CeeDee Lamb\n\n{long}");
        let seg = segment(&body, &rules());
        assert_eq!(seg.blocks[0].analysis, long);
    }

    #[test]
    fn pattern_fallback_target_trends() {
        let body = "League intro.\n\n\
            Michael Wilson – 16 targets\n\nWilson had a big day.\n\n\
            Marvin Mims - 12 targets\n\nMims notes.";
        let seg = segment(body, &rules());
        assert_eq!(seg.strategy, Strategy::Pattern);
        assert_eq!(seg.intro_text, "League intro.");
        assert_eq!(seg.blocks.len(), 2);
        assert_eq!(seg.blocks[0].name, "Michael Wilson");
        assert_eq!(seg.blocks[0].kind, BlockKind::TargetTrend);
        assert_eq!(seg.blocks[0].analysis, "Wilson had a big day.");
        assert_eq!(seg.blocks[1].name, "Marvin Mims");
    }

    #[test]
    fn pattern_fallback_start_sit() {
        let body = "QB – Matthew Stafford@ SEA\n\nStart him.\n\nRB - James Robinson\n\nSit him.";
        let seg = segment(body, &rules());
        assert_eq!(seg.blocks.len(), 2);
        assert_eq!(seg.blocks[0].name, "Matthew Stafford");
        assert_eq!(seg.blocks[0].kind, BlockKind::StartSit);
        assert_eq!(seg.blocks[1].name, "James Robinson");
        assert_eq!(seg.blocks[1].analysis, "Sit him.");
    }

    #[test]
    fn no_patterns_means_no_blocks() {
        let seg = segment("Just a plain paragraph.\n\nAnother paragraph.", &rules());
        assert!(seg.blocks.is_empty());
        assert_eq!(seg.intro_text, "Just a plain paragraph.\n\nAnother paragraph.");
    }

    #[test]
    fn positional_rescan_splits_embedded_headers() {
        let analysis = "Travis Kelce TE - KC\nKelce remains the top option.\n\
            Sam LaPorta TE - DET\nLaPorta is a weekly starter.";
        let subs = split_positional_analysis(analysis, "Tight Ends");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name, "Travis Kelce");
        assert_eq!(subs[0].raw_header, "Tight Ends");
        assert!(subs[0].analysis.contains("top option"));
        assert_eq!(subs[1].name, "Sam LaPorta");
    }

    #[test]
    fn positional_rescan_empty_without_subheaders() {
        let subs = split_positional_analysis("General positional chatter only.", "Sleepers");
        assert!(subs.is_empty());
    }
}
