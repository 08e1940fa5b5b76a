//! Capture statistics and scoring
//!
//! Keeps a rolling window of the most recent bin assignments and scores the
//! resulting category mix against a target distribution.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Score at or above which the board is on target
pub const ON_TARGET_SCORE: u32 = 92;
/// Score at or above which the board is close
pub const CLOSE_SCORE: u32 = 80;
/// Per-category difference (percentage points) reported as close
pub const CLOSE_DIFF: f32 = 3.0;

/// Category a bin belongs to, ordered from the low group to the high group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Orange,
    Red,
    Green,
    Blue,
    Purple,
}

impl Category {
    pub const COUNT: usize = 5;
    pub const ALL: [Category; Category::COUNT] = [
        Category::Orange,
        Category::Red,
        Category::Green,
        Category::Blue,
        Category::Purple,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Orange => "Orange",
            Category::Red => "Red",
            Category::Green => "Green",
            Category::Blue => "Blue",
            Category::Purple => "Purple",
        }
    }

    /// Legend label for the quintile this category stands for
    pub fn label(&self) -> &'static str {
        match self {
            Category::Orange => "0-20%",
            Category::Red => "20-40%",
            Category::Green => "40-60%",
            Category::Blue => "60-80%",
            Category::Purple => "80-100%",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Category::Orange => "#f97316",
            Category::Red => "#ef4444",
            Category::Green => "#22c55e",
            Category::Blue => "#3b82f6",
            Category::Purple => "#a855f7",
        }
    }
}

/// Bin to category mapping, left to right
pub const BIN_CATEGORIES: [Category; BIN_COUNT] = [
    Category::Orange,
    Category::Red,
    Category::Green,
    Category::Blue,
    Category::Purple,
];

/// Bin that a horizontal position falls into
///
/// Bins split `[0, arena_width)` into `BIN_COUNT` equal intervals. Positions
/// outside the arena (and NaN) are clamped to the nearest edge bin.
pub fn bin_index(x: f32, arena_width: f32) -> usize {
    let bin_width = arena_width / BIN_COUNT as f32;
    let raw = (x / bin_width).floor();
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(BIN_COUNT - 1)
}

/// Target percentage per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDistribution {
    percent: [f32; Category::COUNT],
}

impl Default for TargetDistribution {
    fn default() -> Self {
        Self::new([3.0, 9.0, 15.0, 23.0, 50.0])
    }
}

impl TargetDistribution {
    /// Targets indexed in `Category::ALL` order
    pub fn new(percent: [f32; Category::COUNT]) -> Self {
        Self { percent }
    }

    #[inline]
    pub fn get(&self, category: Category) -> f32 {
        self.percent[category.index()]
    }

    pub fn total(&self) -> f32 {
        self.percent.iter().sum()
    }
}

/// Text feedback tier for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    OnTarget,
    Close,
    NeedsWork,
}

impl ScoreRating {
    pub fn from_score(score: u32) -> Self {
        if score >= ON_TARGET_SCORE {
            ScoreRating::OnTarget
        } else if score >= CLOSE_SCORE {
            ScoreRating::Close
        } else {
            ScoreRating::NeedsWork
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreRating::OnTarget => "on target!",
            ScoreRating::Close => "close, keep tuning.",
            ScoreRating::NeedsWork => "needs work.",
        }
    }
}

/// Bounded FIFO of recent bin assignments with per-bin running counts
#[derive(Debug, Clone, Serialize)]
pub struct CaptureWindow {
    recent: VecDeque<usize>,
    counts: [u32; BIN_COUNT],
    capacity: usize,
    /// Lifetime captures (cosmetic only, never used for scoring)
    total_captured: u64,
}

impl Default for CaptureWindow {
    fn default() -> Self {
        Self::new(SCORE_WINDOW)
    }
}

impl CaptureWindow {
    /// Create a window pre-seeded with an even distribution
    pub fn new(capacity: usize) -> Self {
        let mut window = Self {
            recent: VecDeque::with_capacity(capacity + 1),
            counts: [0; BIN_COUNT],
            capacity,
            total_captured: 0,
        };
        window.reset();
        window
    }

    /// Re-seed the window evenly and clear the lifetime counter
    ///
    /// Whole rounds over every bin come first, then the remainder goes to the
    /// lowest bins, so the oldest entries are evicted in the same even order.
    pub fn reset(&mut self) {
        self.recent.clear();
        self.counts = [0; BIN_COUNT];

        let rounds = self.capacity / BIN_COUNT;
        let remainder = self.capacity % BIN_COUNT;
        for _ in 0..rounds {
            for bin in 0..BIN_COUNT {
                self.push(bin);
            }
        }
        for bin in 0..remainder {
            self.push(bin);
        }

        self.total_captured = 0;
    }

    fn push(&mut self, bin: usize) {
        self.recent.push_back(bin);
        self.counts[bin] += 1;
    }

    /// Record a capture at horizontal position `x`, returning its bin
    pub fn capture_in_bin(&mut self, x: f32, arena_width: f32) -> usize {
        let bin = bin_index(x, arena_width);
        self.record(bin);
        bin
    }

    /// Record a capture into a known bin (out-of-range bins are clamped)
    pub fn record(&mut self, bin: usize) {
        let bin = bin.min(BIN_COUNT - 1);
        self.push(bin);

        if self.recent.len() > self.capacity {
            if let Some(dropped) = self.recent.pop_front() {
                self.counts[dropped] = self.counts[dropped].saturating_sub(1);
            }
        }

        self.total_captured += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Running count per bin
    #[inline]
    pub fn counts(&self) -> &[u32; BIN_COUNT] {
        &self.counts
    }

    /// Window contents, oldest first
    pub fn recent(&self) -> impl Iterator<Item = usize> + '_ {
        self.recent.iter().copied()
    }

    #[inline]
    pub fn total_captured(&self) -> u64 {
        self.total_captured
    }

    /// Captures per category currently in the window
    pub fn category_counts(&self) -> [u32; Category::COUNT] {
        let mut by_category = [0; Category::COUNT];
        for (bin, &count) in self.counts.iter().enumerate() {
            by_category[BIN_CATEGORIES[bin].index()] += count;
        }
        by_category
    }

    /// Share of the window per category, in percent (`Category::ALL` order)
    pub fn percentages_by_category(&self) -> [f32; Category::COUNT] {
        let len = self.len();
        if len == 0 {
            return [0.0; Category::COUNT];
        }
        self.category_counts()
            .map(|count| count as f32 / len as f32 * 100.0)
    }

    /// Score in `0..=100`; 100 means the window matches the targets exactly
    pub fn score(&self, targets: &TargetDistribution, penalty_factor: f32) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let current = self.percentages_by_category();
        let total_abs_error: f32 = Category::ALL
            .iter()
            .map(|&c| (current[c.index()] - targets.get(c)).abs())
            .sum();
        (100.0 - total_abs_error * penalty_factor).round().max(0.0) as u32
    }

    /// Full per-category breakdown for a stats panel
    pub fn metrics(&self, targets: &TargetDistribution, penalty_factor: f32) -> Metrics {
        let current = self.percentages_by_category();
        let rows = BIN_CATEGORIES.map(|category| {
            let current = current[category.index()];
            let target = targets.get(category);
            let diff = current - target;
            CategoryStat {
                category,
                current,
                target,
                diff,
                close: diff.abs() < CLOSE_DIFF,
            }
        });
        let score = self.score(targets, penalty_factor);
        Metrics {
            rows,
            score,
            rating: ScoreRating::from_score(score),
            window_len: self.len(),
        }
    }
}

/// One row of the stats table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: Category,
    pub current: f32,
    pub target: f32,
    /// `current - target` in percentage points
    pub diff: f32,
    pub close: bool,
}

/// Read-only scoring snapshot for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Rows in bin order (left to right)
    pub rows: [CategoryStat; BIN_COUNT],
    pub score: u32,
    pub rating: ScoreRating,
    pub window_len: usize,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16}{:>9}{:>8}{:>8}", "Quintile", "Current", "Target", "Diff")?;
        for row in &self.rows {
            let label = format!("{} {}", row.category.name(), row.category.label());
            writeln!(
                f,
                "{:<16}{:>8.1}%{:>7.0}%{:>+8.1}{}",
                label,
                row.current,
                row.target,
                row.diff,
                if row.close { " *" } else { "" }
            )?;
        }
        writeln!(f, "Score: {}/100 -- {}", self.score, self.rating.message())?;
        write!(f, "Based on last {} balls", self.window_len)
    }
}
