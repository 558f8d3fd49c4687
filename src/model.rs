use serde::{Deserialize, Serialize};

/// One scraped article row as produced by the external scraper:
/// body text pre-annotated with `### PLAYER SECTION:` / `###` / bullet markers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    pub url: String,
    pub title: String,
    pub publish_date: String,
    pub body_text: String,
}

/// Which segmentation rule produced a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Standard,
    #[serde(rename = "Target Trend")]
    TargetTrend,
    #[serde(rename = "Start/Sit")]
    StartSit,
}

/// Contiguous span of article text attributed to one player. `name` is
/// mutated across passes (raw header → display-cleaned → refined);
/// `raw_header` is retained as provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBlock {
    pub name: String,
    pub raw_header: String,
    pub analysis: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub meta_title: String,
    pub meta_url: String,
    pub meta_date: String,
    pub intro_text: String,
    pub players: Vec<PlayerBlock>,
}

/// One row of the flattened sentiment dataset: one per player block of a
/// week-assigned article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub week: u32,
    pub player_name: String,
    pub sentiment_compound: f64,
    pub sentiment_pos: f64,
    pub sentiment_neg: f64,
    pub sentiment_neu: f64,
    pub word_count: usize,
    pub article_date: String,
    pub article_title: String,
    pub article_url: String,
}
