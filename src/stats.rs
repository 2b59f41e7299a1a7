//! Reading-progress analytics shown beside the collection table.

use crate::models::Book;

/// Number of equal-width buckets covering `0..=100`.
pub const BUCKET_COUNT: usize = 10;

/// Ten-bucket histogram of `progress` values. Each bucket spans ten percent;
/// the last one is closed so finished books (100%) land in `90-100`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressHistogram {
    counts: [u64; BUCKET_COUNT],
}

impl ProgressHistogram {
    pub fn from_books(books: &[Book]) -> Self {
        let mut histogram = Self::default();
        for book in books {
            histogram.record(book.progress);
        }
        histogram
    }

    /// Count one progress value. Values outside `0..=100` are clamped; the
    /// schema forbids them, but a hand-edited database should not panic the UI.
    pub fn record(&mut self, progress: i64) {
        let clamped = progress.clamp(0, 100) as usize;
        let index = (clamped / 10).min(BUCKET_COUNT - 1);
        self.counts[index] += 1;
    }

    /// Bucket labels paired with their counts, lowest bucket first.
    pub fn buckets(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(idx, count)| (bucket_label(idx), *count))
            .collect()
    }

    pub fn counts(&self) -> &[u64; BUCKET_COUNT] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Height of the tallest bar, used to scale the chart.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

fn bucket_label(idx: usize) -> String {
    let low = idx * 10;
    if idx == BUCKET_COUNT - 1 {
        format!("{low}-100")
    } else {
        format!("{low}-{}", low + 9)
    }
}
