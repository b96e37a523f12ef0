use crate::math::FixIndex;
use crate::prelude::{EngineOptions, SearchStrategy};
use crate::streams::PositionStream;

/// Result of pairing one sweep with the fix stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchDecision {
    Accepted { fix_index: usize, distance: f64 },
    OutOfTolerance { distance: f64 },
}

/// Nearest-neighbour matcher over the fix timeline.
///
/// Sweeps are compared by their offset from the origin fix. With
/// [`SearchStrategy::Linear`] each lookup costs O(n) in the number of fixes,
/// so a full run is O(n * m); [`SearchStrategy::Binary`] brings a lookup down
/// to O(log n) and accepts exactly the same pairs.
#[derive(Debug, Clone)]
pub struct Matcher {
    index: FixIndex,
    strategy: SearchStrategy,
    tolerance_secs: f64,
}

impl Matcher {
    pub fn new(positions: &PositionStream, options: &EngineOptions) -> Self {
        let index = FixIndex::new(&positions.timestamps());
        if options.search == SearchStrategy::Binary && !index.is_ordered() {
            log::warn!("fix timestamps are not monotonic; binary search falls back to a linear scan");
        }
        Self {
            index,
            strategy: options.search,
            tolerance_secs: options.tolerance_secs,
        }
    }

    /// Matches a sweep `relative_time` seconds after the time base.
    ///
    /// `None` only when there are no fixes at all.
    pub fn locate(&self, relative_time: f64) -> Option<MatchDecision> {
        let nearest = self.index.nearest(relative_time, self.strategy)?;
        if nearest.distance <= self.tolerance_secs {
            Some(MatchDecision::Accepted {
                fix_index: nearest.index,
                distance: nearest.distance,
            })
        } else {
            Some(MatchDecision::OutOfTolerance {
                distance: nearest.distance,
            })
        }
    }

    pub fn fix_count(&self) -> usize {
        self.index.offsets().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::default_reference_date;
    use crate::streams::position::tests::gps_line;

    fn matcher(search: SearchStrategy) -> Matcher {
        let text = [0, 1_000_000, 5_000_000]
            .iter()
            .map(|&us| gps_line(us, 3, 1.0, 1.0, 1.0))
            .collect::<Vec<_>>()
            .join("\n");
        let positions = PositionStream::parse(&text, default_reference_date());
        let options = EngineOptions {
            search,
            ..Default::default()
        };
        Matcher::new(&positions, &options)
    }

    #[test]
    fn tolerance_window_is_closed() {
        for search in [SearchStrategy::Linear, SearchStrategy::Binary] {
            let matcher = matcher(search);
            assert_eq!(
                matcher.locate(6.0),
                Some(MatchDecision::Accepted {
                    fix_index: 2,
                    distance: 1.0
                })
            );
            assert!(matches!(
                matcher.locate(6.0000001),
                Some(MatchDecision::OutOfTolerance { .. })
            ));
            assert!(matches!(
                matcher.locate(-1.0),
                Some(MatchDecision::Accepted { fix_index: 0, .. })
            ));
        }
    }

    #[test]
    fn picks_the_nearest_fix() {
        let matcher = matcher(SearchStrategy::Linear);
        assert!(matches!(
            matcher.locate(0.9),
            Some(MatchDecision::Accepted { fix_index: 1, .. })
        ));
        assert!(matches!(
            matcher.locate(3.0),
            Some(MatchDecision::OutOfTolerance { .. })
        ));
        assert_eq!(matcher.fix_count(), 3);
    }
}
