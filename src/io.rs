use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::merge::Table;
use crate::model::{Article, RawArticle, SentimentRecord};

pub fn read_articles_csv(path: &Path) -> Result<Vec<RawArticle>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut articles = Vec::new();
    for result in reader.deserialize() {
        let article: RawArticle =
            result.with_context(|| format!("bad row in {}", path.display()))?;
        articles.push(article);
    }
    Ok(articles)
}

pub fn read_articles_json(path: &Path) -> Result<Vec<Article>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let articles = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("invalid article JSON in {}", path.display()))?;
    Ok(articles)
}

pub fn write_articles_json(path: &Path, articles: &[Article]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), articles)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_sentiment_csv(path: &Path, rows: &[SentimentRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read any CSV into a schema-agnostic [`Table`].
pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("missing header row in {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("bad row in {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { headers, rows })
}

pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
