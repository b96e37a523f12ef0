use crate::prelude::SearchStrategy;
use chrono::NaiveDateTime;

/// Closest fix found for a target offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance: f64,
}

/// Fix times as seconds since the first fix, precomputed once per run.
#[derive(Debug, Clone)]
pub struct FixIndex {
    offsets: Vec<f64>,
    ordered: bool,
}

impl FixIndex {
    pub fn new(timestamps: &[NaiveDateTime]) -> Self {
        let offsets = match timestamps.first() {
            Some(&origin) => timestamps
                .iter()
                .map(|&ts| seconds_between(origin, ts))
                .collect(),
            None => Vec::new(),
        };
        Self::from_offsets(offsets)
    }

    pub fn from_offsets(offsets: Vec<f64>) -> Self {
        let ordered = offsets.windows(2).all(|pair| pair[0] <= pair[1]);
        Self { offsets, ordered }
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Whether offsets are non-decreasing, which the binary search relies on.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Lowest-index fix minimising `|offset - target|`.
    ///
    /// `Binary` degrades to `Linear` when offsets are out of order.
    pub fn nearest(&self, target: f64, strategy: SearchStrategy) -> Option<Nearest> {
        match strategy {
            SearchStrategy::Binary if self.ordered => self.nearest_binary(target),
            _ => self.nearest_linear(target),
        }
    }

    /// O(n) scan; first minimum wins.
    pub fn nearest_linear(&self, target: f64) -> Option<Nearest> {
        let mut best: Option<Nearest> = None;
        for (index, &offset) in self.offsets.iter().enumerate() {
            let distance = (offset - target).abs();
            let improves = match best {
                None => true,
                Some(current) => distance < current.distance,
            };
            if improves {
                best = Some(Nearest { index, distance });
            }
        }
        best
    }

    /// O(log n) search over ordered offsets with the same tie-break as the scan.
    pub fn nearest_binary(&self, target: f64) -> Option<Nearest> {
        let upper = self.offsets.partition_point(|&x| x < target);
        let mut best: Option<Nearest> = None;

        if upper > 0 {
            let below = self.offsets[upper - 1];
            let index = self.offsets.partition_point(|&x| x < below);
            best = Some(Nearest {
                index,
                distance: (below - target).abs(),
            });
        }
        if let Some(&above) = self.offsets.get(upper) {
            let distance = (above - target).abs();
            if best.map_or(true, |current| distance < current.distance) {
                best = Some(Nearest {
                    index: upper,
                    distance,
                });
            }
        }
        best
    }
}

/// Signed seconds from `origin` to `ts` at microsecond resolution.
pub fn seconds_between(origin: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    let delta = ts - origin;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
