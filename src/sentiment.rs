use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::SeasonCalendar;
use crate::model::{Article, SentimentRecord};
use crate::week::{assign_week, WeekSource};

/// Polarity scores for one span of text, VADER-style.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PolarityScores {
    pub compound: f64,
    pub pos: f64,
    pub neg: f64,
    pub neu: f64,
}

/// The scoring model is an external capability; the pipeline only depends on
/// this interface. `Sync` so scoring can run inside rayon workers.
pub trait PolarityScorer: Sync {
    fn score(&self, text: &str) -> PolarityScores;
}

/// Deterministic word-valence scorer used as the default model. Valences can
/// be supplied from a JSON lexicon file; the built-in list covers common
/// fantasy-football analysis vocabulary.
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

// (word, valence) pairs, positive = bullish on the player.
const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("elite", 2.9), ("stud", 2.6), ("smash", 2.4), ("breakout", 2.3), ("league-winner", 3.0),
    ("dominant", 2.5), ("explosive", 2.2), ("upside", 1.9), ("great", 1.9), ("excellent", 2.2),
    ("strong", 1.6), ("good", 1.5), ("solid", 1.4), ("reliable", 1.5), ("safe", 1.2),
    ("efficient", 1.4), ("productive", 1.6), ("valuable", 1.5), ("improving", 1.3),
    ("healthy", 1.2), ("favorable", 1.4), ("sleeper", 1.1), ("start", 0.9), ("add", 0.8),
    ("buy", 0.9), ("trust", 1.0), ("confident", 1.3), ("boom", 1.5), ("win", 1.4),
    ("bad", -1.5), ("poor", -1.6), ("weak", -1.4), ("struggle", -1.6), ("struggling", -1.6),
    ("bust", -2.2), ("avoid", -1.8), ("fade", -1.5), ("risky", -1.3), ("inconsistent", -1.4),
    ("concern", -1.3), ("concerning", -1.5), ("injury", -1.8), ("injured", -1.9),
    ("questionable", -1.2), ("doubtful", -1.7), ("out", -1.0), ("benched", -1.8),
    ("drop", -1.4), ("sell", -0.9), ("sit", -0.9), ("decline", -1.4), ("declining", -1.5),
    ("disappointing", -1.9), ("terrible", -2.4), ("awful", -2.5), ("miss", -1.1),
    ("limited", -1.0), ("tough", -1.0), ("loss", -1.2), ("turnover", -1.3),
];

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: DEFAULT_LEXICON
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
        }
    }

    /// Load a `{word: valence}` JSON map.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?;
        let valences: HashMap<String, f64> = serde_json::from_str(&data)
            .with_context(|| format!("invalid lexicon {}", path.display()))?;
        Ok(Self { valences })
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> PolarityScores {
        let mut sum = 0.0;
        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0usize;
        let mut total = 0usize;

        for token in text.split_whitespace() {
            let word: String = token
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            total += 1;
            match self.valences.get(&word) {
                Some(v) if *v > 0.0 => {
                    sum += v;
                    pos_sum += v;
                }
                Some(v) => {
                    sum += v;
                    neg_sum += v.abs();
                }
                None => neu_count += 1,
            }
        }

        if total == 0 {
            return PolarityScores {
                compound: 0.0,
                pos: 0.0,
                neg: 0.0,
                neu: 0.0,
            };
        }

        // Same normalization curve VADER uses to bound the compound score.
        let compound = sum / (sum * sum + 15.0).sqrt();
        let denom = pos_sum + neg_sum + neu_count as f64;
        PolarityScores {
            compound,
            pos: pos_sum / denom,
            neg: neg_sum / denom,
            neu: neu_count as f64 / denom,
        }
    }
}

/// Per-source week counters reported after flattening.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlattenCounts {
    pub from_title: usize,
    pub from_date: usize,
    pub bumped: usize,
    pub dropped: usize,
    pub rows: usize,
}

impl FlattenCounts {
    pub fn print(&self) {
        println!("Week source - title:      {}", self.from_title);
        println!("Week source - date calc:  {}", self.from_date);
        println!("Week source - WW bumps:   {}", self.bumped);
        println!("Articles dropped:         {}", self.dropped);
        println!("Total rows generated:     {}", self.rows);
    }
}

/// Flatten week-assigned articles into one SentimentRecord per player block.
/// Articles with no determinable week are dropped and counted, never errors.
pub fn flatten_articles(
    articles: &[Article],
    scorer: &dyn PolarityScorer,
    calendar: &SeasonCalendar,
) -> (Vec<SentimentRecord>, FlattenCounts) {
    let mut rows = Vec::new();
    let mut counts = FlattenCounts::default();

    for article in articles {
        let Some(assignment) = assign_week(&article.meta_title, &article.meta_date, calendar)
        else {
            debug!(title = %article.meta_title, "no week determinable, article dropped");
            counts.dropped += 1;
            continue;
        };
        match assignment.source {
            WeekSource::Title => counts.from_title += 1,
            WeekSource::DateFallback => counts.from_date += 1,
            WeekSource::DateFallbackBumped => counts.bumped += 1,
        }

        for player in &article.players {
            let scores = scorer.score(&player.analysis);
            rows.push(SentimentRecord {
                week: assignment.week,
                player_name: player.name.clone(),
                sentiment_compound: scores.compound,
                sentiment_pos: scores.pos,
                sentiment_neg: scores.neg,
                sentiment_neu: scores.neu,
                word_count: player.analysis.split_whitespace().count(),
                article_date: article.meta_date.clone(),
                article_title: article.meta_title.clone(),
                article_url: article.meta_url.clone(),
            });
        }
    }

    counts.rows = rows.len();
    (rows, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, PlayerBlock};

    fn article(title: &str, date: &str, players: Vec<PlayerBlock>) -> Article {
        Article {
            meta_title: title.into(),
            meta_url: "https://example.com/a".into(),
            meta_date: date.into(),
            intro_text: String::new(),
            players,
        }
    }

    fn block(name: &str, analysis: &str) -> PlayerBlock {
        PlayerBlock {
            name: name.into(),
            raw_header: name.into(),
            analysis: analysis.into(),
            kind: BlockKind::Standard,
        }
    }

    #[test]
    fn positive_text_scores_positive() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("Elite breakout upside, a smash start this week.");
        assert!(s.compound > 0.0);
        assert!(s.pos > s.neg);
    }

    #[test]
    fn negative_text_scores_negative() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("Injury concern, inconsistent and risky, a bust to avoid.");
        assert!(s.compound < 0.0);
        assert!(s.neg > s.pos);
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        let scorer = LexiconScorer::new();
        let s = scorer.score("");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neu, 0.0);
    }

    #[test]
    fn compound_is_bounded() {
        let scorer = LexiconScorer::new();
        let text = "elite ".repeat(200);
        let s = scorer.score(&text);
        assert!(s.compound > 0.9 && s.compound <= 1.0);
    }

    #[test]
    fn flatten_one_row_per_block() {
        let articles = vec![article(
            "Week 10 Fantasy Football Start/Sit",
            "2025-11-05",
            vec![block("Josh Allen", "Elite start."), block("Joe Mixon", "Risky sit.")],
        )];
        let (rows, counts) = flatten_articles(
            &articles,
            &LexiconScorer::new(),
            &SeasonCalendar::default(),
        );
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.week == 10));
        assert_eq!(counts.from_title, 1);
        assert_eq!(rows[0].word_count, 2);
    }

    #[test]
    fn weekless_article_dropped_with_count() {
        let articles = vec![article(
            "Fantasy Football Advice",
            "not a date",
            vec![block("Someone", "text")],
        )];
        let (rows, counts) = flatten_articles(
            &articles,
            &LexiconScorer::new(),
            &SeasonCalendar::default(),
        );
        assert!(rows.is_empty());
        assert_eq!(counts.dropped, 1);
    }
}
