use crate::models::{HistoryEntry, MINUTES_PER_CHUNK, PeriodBucket, StatsResponse, Task};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum StatsPeriod {
    #[serde(rename = "today", alias = "day")]
    Today,
    #[default]
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "3-months")]
    ThreeMonths,
    #[serde(rename = "6-months")]
    SixMonths,
    #[serde(rename = "year")]
    Year,
}

impl StatsPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            StatsPeriod::Today => "today",
            StatsPeriod::Month => "month",
            StatsPeriod::ThreeMonths => "3-months",
            StatsPeriod::SixMonths => "6-months",
            StatsPeriod::Year => "year",
        }
    }

    /// First date included in the period.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        let month_start = today.with_day(1).unwrap_or(today);
        match self {
            StatsPeriod::Today => today,
            StatsPeriod::Month => month_start,
            StatsPeriod::ThreeMonths => months_back(month_start, 2),
            StatsPeriod::SixMonths => months_back(month_start, 5),
            StatsPeriod::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(month_start),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
}

pub fn build_stats(history: &[HistoryEntry], tasks: &[Task], period: StatsPeriod) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), history, tasks, period)
}

/// Buckets archived days plus today's live progress into chart series.
/// Neither `history` nor `tasks` is modified.
pub fn build_stats_at(
    today: NaiveDate,
    history: &[HistoryEntry],
    tasks: &[Task],
    period: StatsPeriod,
) -> StatsResponse {
    let today_chunks: u64 = tasks.iter().map(|task| u64::from(task.checked)).sum();
    let start = period.start_date(today);

    let buckets = if period == StatsPeriod::Today {
        vec![bucket("Today".to_string(), today_chunks)]
    } else {
        let archived = history
            .iter()
            .filter(|entry| entry.date >= start)
            .map(|entry| (entry.date, u64::from(entry.completed_chunks)));
        let live = std::iter::once((today, today_chunks)).filter(|(date, _)| *date >= start);
        group_by_month(archived.chain(live))
    };

    let total_chunks = buckets.iter().map(|b| b.chunks).sum();
    let total_minutes = buckets.iter().map(|b| b.minutes).sum();

    StatsResponse {
        period: period.as_str().to_string(),
        start_date: start.to_string(),
        buckets,
        total_chunks,
        total_minutes,
    }
}

/// Sums chunks per calendar month, keeping months in first-seen order.
fn group_by_month(entries: impl Iterator<Item = (NaiveDate, u64)>) -> Vec<PeriodBucket> {
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (date, chunks) in entries {
        let label = month_label(date);
        match index.get(&label) {
            Some(&slot) => order[slot].1 += chunks,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, chunks));
            }
        }
    }

    order
        .into_iter()
        .map(|(label, chunks)| bucket(label, chunks))
        .collect()
}

fn bucket(label: String, chunks: u64) -> PeriodBucket {
    PeriodBucket {
        label,
        chunks,
        minutes: chunks * MINUTES_PER_CHUNK,
    }
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %y").to_string()
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}
