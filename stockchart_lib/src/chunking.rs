//! Splits an inclusive date range into calendar-aligned chunks.

use chrono::{Datelike, NaiveDate};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkUnit {
    Month,
    Year,
}

/// One inclusive sub-range, clipped to the range it was cut from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateChunk {
    pub unit: ChunkUnit,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateChunk {
    /// `YYYY-MM` for month chunks, `YYYY` for year chunks.
    pub fn label(&self) -> String {
        match self.unit {
            ChunkUnit::Month => self.start.format("%Y-%m").to_string(),
            ChunkUnit::Year => self.start.format("%Y").to_string(),
        }
    }
}

fn last_day_of_period(date: NaiveDate, unit: ChunkUnit) -> Option<NaiveDate> {
    let next_start = match unit {
        ChunkUnit::Month if date.month() == 12 => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
        ChunkUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1),
        ChunkUnit::Year => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
    }?;
    next_start.pred_opt()
}

/// Consecutive chunks covering `[start, end]` in order. Empty when `end < start`.
pub fn chunk_range(start: NaiveDate, end: NaiveDate, unit: ChunkUnit) -> Vec<DateChunk> {
    let mut chunks = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let period_end = last_day_of_period(cursor, unit).unwrap_or(end);
        let chunk_end = period_end.min(end);
        chunks.push(DateChunk {
            unit,
            start: cursor,
            end: chunk_end,
        });
        match chunk_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    chunks
}
