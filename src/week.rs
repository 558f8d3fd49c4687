use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;

use crate::config::SeasonCalendar;

static TITLE_WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Week\s+(\d+)").unwrap());

/// How an article's week was determined; Title always wins over the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSource {
    Title,
    DateFallback,
    /// Weekend waiver-wire article shifted to the upcoming week.
    DateFallbackBumped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekAssignment {
    pub week: u32,
    pub source: WeekSource,
}

/// Date-derived week before the bump correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateWeek {
    Regular(u32),
    Postseason,
}

/// Parse the scraper's date strings: ISO-ish with optional `T` separator and
/// timezone suffix, or a bare date.
pub fn parse_article_date(date_str: &str) -> Option<NaiveDateTime> {
    if date_str.is_empty() {
        return None;
    }
    let clean = date_str.replace('T', " ");
    let clean = clean.split('+').next().unwrap_or(&clean).trim();

    NaiveDateTime::parse_from_str(clean, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(clean, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Priority method: "Week 16" in the title, accepted for 1..=18 only.
fn week_from_title(title: &str) -> Option<u32> {
    TITLE_WEEK_RE
        .captures(title)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|week| (1..=18).contains(week))
}

fn week_from_date(date: NaiveDateTime, calendar: &SeasonCalendar) -> Option<DateWeek> {
    let season_start = calendar.season_start.and_hms_opt(0, 0, 0)?;
    let week2_start = calendar.week2_start.and_hms_opt(0, 0, 0)?;

    if date < season_start {
        return None;
    }
    if date < week2_start {
        return Some(DateWeek::Regular(1));
    }

    let week = (date - week2_start).num_days() / 7 + 2;
    if week > 18 {
        // Computed but always discarded by the caller; see DESIGN.md.
        Some(DateWeek::Postseason)
    } else {
        Some(DateWeek::Regular(week as u32))
    }
}

/// Derive the article's week-in-season. Returns `None` (article dropped from
/// the dataset) when neither title nor date yields a regular-season week.
pub fn assign_week(
    title: &str,
    date_str: &str,
    calendar: &SeasonCalendar,
) -> Option<WeekAssignment> {
    if let Some(week) = week_from_title(title) {
        return Some(WeekAssignment {
            week,
            source: WeekSource::Title,
        });
    }

    let date = parse_article_date(date_str)?;
    match week_from_date(date, calendar)? {
        DateWeek::Postseason => None,
        DateWeek::Regular(week) => {
            // Waiver-wire pieces published Sun/Mon editorially target the
            // upcoming week, not the one whose games just finished.
            let weekend = matches!(date.weekday(), Weekday::Sun | Weekday::Mon);
            if weekend && title.to_lowercase().contains("waiver wire") {
                Some(WeekAssignment {
                    week: week + 1,
                    source: WeekSource::DateFallbackBumped,
                })
            } else {
                Some(WeekAssignment {
                    week,
                    source: WeekSource::DateFallback,
                })
            }
        }
    }
}
