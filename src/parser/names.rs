use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::ExtractionRules;

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\).*").unwrap());
static OPPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:vs\.?|@)\s+").unwrap());
static TOKEN_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-\.]").unwrap());
static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(jr|sr|ii|iii|iv|v)\b").unwrap());

/// Sentinel returned by [`clean_display`] for empty input.
pub const UNKNOWN: &str = "Unknown";

/// Level 1 cleanup: light, human-readable. Strips numbering, parenthetical
/// asides, opponent suffixes and leading command verbs; falls back to a
/// capitalized-run scan when the header reads like a sentence
/// ("Is Kimani Vidal A Must-Start This Week?" → "Kimani Vidal").
pub fn clean_display(text: &str, rules: &ExtractionRules) -> String {
    let text = text.trim();
    if text.is_empty() {
        return UNKNOWN.to_string();
    }

    let text = ORDINAL_RE.replace(text, "");
    let text = PAREN_RE.replace(&text, "");
    let text = OPPONENT_RE
        .splitn(&text, 2)
        .next()
        .unwrap_or_default()
        .to_string();

    let mut words: Vec<&str> = text.split_whitespace().collect();
    if let Some(first) = words.first() {
        if rules.commands.contains(*first) {
            words.remove(0);
        }
    }
    let text = words.join(" ");

    // Sentence-style headers: recover the embedded proper name.
    if text.split_whitespace().count() > 3 || text.contains('?') {
        if let Some(run) = capitalized_run(&text, rules) {
            return run;
        }
    }

    text.trim().to_string()
}

/// Scan tokens, accumulating consecutive capitalized words that are neither
/// stop words nor commands. Prefer the first multi-word run, then any run.
fn capitalized_run(text: &str, rules: &ExtractionRules) -> Option<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        let clean = TOKEN_STRIP_RE.replace_all(word, "").to_string();
        if clean.is_empty() {
            continue;
        }
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if capitalized && !rules.stop_words.contains(&clean) && !rules.commands.contains(&clean) {
            current.push(clean);
        } else if !current.is_empty() {
            runs.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        runs.push(current.join(" "));
    }

    runs.iter()
        .find(|r| r.contains(' '))
        .cloned()
        .or_else(|| runs.into_iter().next())
}

/// Display-name refinement applied after extraction: drop periods
/// ("A.J." → "AJ") and generational suffixes, keeping the result readable.
pub fn strip_format(name: &str) -> String {
    let no_periods = name.replace('.', "");
    let no_suffix = SUFFIX_RE.replace_all(&no_periods, "");
    no_suffix.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Level 2 cleanup: the lossy canonical join key. Diacritics decomposed and
/// dropped, lowercased, suffixes removed on word boundaries *before*
/// punctuation stripping (so "Jr." never survives as a bare token), then all
/// non-alphanumerics except spaces removed and whitespace collapsed.
/// Idempotent.
pub fn clean_join_key(name: &str) -> String {
    let ascii: String = name.nfkd().filter(|c| c.is_ascii()).collect();
    let lower = ascii.to_lowercase();
    let no_suffix = SUFFIX_RE.replace_all(&lower, "");
    let stripped: String = no_suffix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when a refined display name is actually a team entry, matched
/// directly or after title-casing.
pub fn is_team_name(name: &str, rules: &ExtractionRules) -> bool {
    rules.team_names.contains(name) || rules.team_names.contains(&title_case(name))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
