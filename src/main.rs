mod config;
mod io;
mod merge;
mod model;
mod parser;
mod sentiment;
mod week;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use config::{ExtractionRules, SeasonCalendar};
use model::{Article, BlockKind};
use parser::segment::Strategy;
use parser::ArticleOutcome;
use sentiment::{LexiconScorer, PolarityScorer};

#[derive(Parser)]
#[command(
    name = "ffsent",
    about = "Fantasy football article text → per-player, per-week sentiment dataset"
)]
struct Cli {
    /// JSON file overriding the built-in extraction rule sets
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    /// JSON file overriding the season calendar dates
    #[arg(long, global = true)]
    calendar: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split scraped article CSV into per-player analysis blocks (JSON out)
    Segment {
        /// Articles CSV: url, title, publish_date, body_text
        input: PathBuf,
        /// Output article JSON
        output: PathBuf,
    },
    /// Clean player names and filter articles to the season window
    Refine {
        /// Segmented article JSON
        input: PathBuf,
        /// Output cleaned article JSON
        output: PathBuf,
    },
    /// Assign weeks and flatten into the per-player sentiment CSV
    Score {
        /// Cleaned article JSON
        input: PathBuf,
        /// Output sentiment CSV
        output: PathBuf,
        /// JSON word-valence lexicon for the polarity scorer
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
    /// Left-join sentiment rows against the external stats table
    Merge {
        /// Sentiment CSV
        sentiment: PathBuf,
        /// Stats CSV with at least PlayerName, week, TotalPoints
        stats: PathBuf,
        /// Output merged CSV
        output: PathBuf,
    },
    /// Full pipeline: segment → refine → score → merge
    Run {
        /// Articles CSV
        input: PathBuf,
        /// Stats CSV
        stats: PathBuf,
        /// Directory for intermediate and final outputs
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
        /// JSON word-valence lexicon for the polarity scorer
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => ExtractionRules::from_file(path)?,
        None => ExtractionRules::default(),
    };
    let calendar = match &cli.calendar {
        Some(path) => load_calendar(path)?,
        None => SeasonCalendar::default(),
    };

    let result = match cli.command {
        Commands::Segment { input, output } => {
            let (articles, counts) = segment_stage(&input, &rules)?;
            io::write_articles_json(&output, &articles)?;
            counts.print();
            println!("Saved {} articles to {}", articles.len(), output.display());
            Ok(())
        }
        Commands::Refine { input, output } => {
            let articles = io::read_articles_json(&input)?;
            println!("Refining {} articles...", articles.len());
            let (kept, counts) = parser::refine_articles(articles, &rules, &calendar);
            if kept.is_empty() {
                bail!("no articles survived refinement");
            }
            io::write_articles_json(&output, &kept)?;
            counts.print();
            println!("Saved {} articles to {}", kept.len(), output.display());
            Ok(())
        }
        Commands::Score { input, output, lexicon } => {
            let articles = io::read_articles_json(&input)?;
            let scorer = load_scorer(lexicon.as_deref())?;
            println!("Scoring {} articles...", articles.len());
            let (rows, counts) = sentiment::flatten_articles(&articles, &scorer, &calendar);
            if rows.is_empty() {
                bail!("no sentiment rows generated");
            }
            io::write_sentiment_csv(&output, &rows)?;
            counts.print();
            println!("Saved to: {}", output.display());
            Ok(())
        }
        Commands::Merge { sentiment, stats, output } => {
            merge_stage(&sentiment, &stats, &output)
        }
        Commands::Run { input, stats, out_dir, lexicon } => {
            std::fs::create_dir_all(&out_dir)?;

            let (articles, seg_counts) = segment_stage(&input, &rules)?;
            io::write_articles_json(&out_dir.join("articles.json"), &articles)?;
            seg_counts.print();

            println!("Refining {} articles...", articles.len());
            let (kept, refine_counts) = parser::refine_articles(articles, &rules, &calendar);
            if kept.is_empty() {
                bail!("no articles survived refinement");
            }
            io::write_articles_json(&out_dir.join("articles_cleaned.json"), &kept)?;
            refine_counts.print();

            let scorer = load_scorer(lexicon.as_deref())?;
            println!("Scoring {} articles...", kept.len());
            let (rows, flat_counts) = sentiment::flatten_articles(&kept, &scorer, &calendar);
            if rows.is_empty() {
                bail!("no sentiment rows generated");
            }
            let sentiment_path = out_dir.join("sentiment.csv");
            io::write_sentiment_csv(&sentiment_path, &rows)?;
            flat_counts.print();

            merge_stage(&sentiment_path, &stats, &out_dir.join("dataset.csv"))
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

#[derive(Debug, Default, Clone, Copy)]
struct SegmentCounts {
    marker: usize,
    pattern: usize,
    excluded: usize,
    no_blocks: usize,
    standard_blocks: usize,
    target_blocks: usize,
    startsit_blocks: usize,
}

impl SegmentCounts {
    fn print(&self) {
        println!(
            "Articles: marker={}, pattern={}, excluded={}, unsegmentable={}",
            self.marker, self.pattern, self.excluded, self.no_blocks
        );
        println!(
            "Blocks: standard={}, target trends={}, start/sit={}",
            self.standard_blocks, self.target_blocks, self.startsit_blocks
        );
    }
}

/// Segment all articles, rayon-parallel per article (pure, no shared state);
/// results are concatenated in input order.
fn segment_stage(input: &Path, rules: &ExtractionRules) -> Result<(Vec<Article>, SegmentCounts)> {
    let raw_articles = io::read_articles_csv(input)?;
    if raw_articles.is_empty() {
        bail!("no article rows in {}", input.display());
    }
    println!("Segmenting {} articles...", raw_articles.len());

    let pb = ProgressBar::new(raw_articles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let mut articles = Vec::new();
    let mut counts = SegmentCounts::default();

    for chunk in raw_articles.chunks(500) {
        let outcomes: Vec<ArticleOutcome> = chunk
            .par_iter()
            .map(|raw| parser::process_article(raw, rules))
            .collect();

        for outcome in outcomes {
            match outcome {
                ArticleOutcome::Parsed(article, strategy) => {
                    match strategy {
                        Strategy::Marker => counts.marker += 1,
                        Strategy::Pattern => counts.pattern += 1,
                    }
                    for block in &article.players {
                        match block.kind {
                            BlockKind::Standard => counts.standard_blocks += 1,
                            BlockKind::TargetTrend => counts.target_blocks += 1,
                            BlockKind::StartSit => counts.startsit_blocks += 1,
                        }
                    }
                    articles.push(*article);
                }
                ArticleOutcome::TitleExcluded => counts.excluded += 1,
                ArticleOutcome::NoBlocks => counts.no_blocks += 1,
            }
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    if articles.is_empty() {
        bail!("no article produced any player block");
    }
    Ok((articles, counts))
}

fn merge_stage(sentiment: &Path, stats: &Path, output: &Path) -> Result<()> {
    let sentiment_table = io::read_table(sentiment)?;
    let stats_table = io::read_table(stats)?;
    if sentiment_table.is_empty() {
        bail!("sentiment table {} is empty", sentiment.display());
    }
    println!(
        "Merging {} sentiment rows with {} stats rows...",
        sentiment_table.rows.len(),
        stats_table.rows.len()
    );

    let (merged, diagnostics) = merge::merge_sentiment_stats(&sentiment_table, &stats_table)?;
    io::write_table(output, &merged)?;
    diagnostics.print();
    println!("\nSaved to {}", output.display());
    Ok(())
}

fn load_scorer(lexicon: Option<&Path>) -> Result<impl PolarityScorer> {
    match lexicon {
        Some(path) => LexiconScorer::from_file(path),
        None => Ok(LexiconScorer::new()),
    }
}

fn load_calendar(path: &Path) -> Result<SeasonCalendar> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
