pub mod header;
pub mod names;
pub mod segment;

use tracing::debug;

use crate::config::{ExtractionRules, SeasonCalendar};
use crate::model::{Article, RawArticle};
use crate::week::parse_article_date;
use segment::Strategy;

/// Segmentation result for one raw article.
pub enum ArticleOutcome {
    Parsed(Box<Article>, Strategy),
    /// Title matched an excluded keyword (DFS/betting content).
    TitleExcluded,
    /// No block-defining pattern matched anywhere in the body.
    NoBlocks,
}

/// Pure per-article pass: marked body text → intro + ordered player blocks.
/// No cross-article state, so articles parallelize trivially.
pub fn process_article(raw: &RawArticle, rules: &ExtractionRules) -> ArticleOutcome {
    let title_upper = raw.title.to_uppercase();
    if rules
        .excluded_title_keywords
        .iter()
        .any(|kw| title_upper.contains(&kw.to_uppercase()))
    {
        return ArticleOutcome::TitleExcluded;
    }

    let segmented = segment::segment(&raw.body_text, rules);
    if segmented.blocks.is_empty() {
        return ArticleOutcome::NoBlocks;
    }

    ArticleOutcome::Parsed(
        Box::new(Article {
            meta_title: raw.title.clone(),
            meta_url: raw.url.clone(),
            meta_date: raw.publish_date.clone(),
            intro_text: segmented.intro_text,
            players: segmented.blocks,
        }),
        segmented.strategy,
    )
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RefineCounts {
    pub out_of_season: usize,
    pub undated: usize,
    pub names_cleaned: usize,
    pub teams_removed: usize,
    pub emptied: usize,
}

impl RefineCounts {
    pub fn print(&self) {
        println!("Out-of-season dropped:   {}", self.out_of_season);
        println!("Undated dropped:         {}", self.undated);
        println!("Names modified:          {}", self.names_cleaned);
        println!("Team entries removed:    {}", self.teams_removed);
        println!("Articles left empty:     {}", self.emptied);
    }
}

/// Second pass over segmented articles: season-window filter, header name
/// extraction (group re-scans, multi-player splits, display cleanup), then
/// display-name refinement and team-entry removal. Articles that end up with
/// no players are dropped.
pub fn refine_articles(
    articles: Vec<Article>,
    rules: &ExtractionRules,
    calendar: &SeasonCalendar,
) -> (Vec<Article>, RefineCounts) {
    let mut counts = RefineCounts::default();
    let mut kept = Vec::with_capacity(articles.len());

    for mut article in articles {
        match parse_article_date(&article.meta_date) {
            None => {
                debug!(title = %article.meta_title, "undated article dropped");
                counts.undated += 1;
                continue;
            }
            Some(date) => {
                let start = calendar.season_start.and_hms_opt(0, 0, 0).unwrap();
                let end = calendar.season_end.and_hms_opt(23, 59, 59).unwrap();
                if date < start || date > end {
                    counts.out_of_season += 1;
                    continue;
                }
            }
        }

        header::extract_names(&mut article, rules);

        article.players.retain_mut(|player| {
            let refined = names::strip_format(&player.name);
            if names::is_team_name(&refined, rules) {
                counts.teams_removed += 1;
                return false;
            }
            if refined != player.name {
                counts.names_cleaned += 1;
                player.name = refined;
            }
            true
        });

        if article.players.is_empty() {
            counts.emptied += 1;
            continue;
        }
        kept.push(article);
    }

    (kept, counts)
}
