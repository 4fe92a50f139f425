//! Tempo contest tables
//!
//! A contest maps a quantized tempo bucket to an accumulated score. Scores are
//! credited, decayed in proportion to elapsed time, and rescaled whenever the
//! leading entry passes the finish line so no score grows without bound. The
//! leader is the externally reported tempo.

use std::collections::BTreeMap;

/// Ordered bucket -> score table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contest {
    entries: BTreeMap<i32, f32>,
}

impl Contest {
    /// Create an empty contest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the score of `bucket`
    pub fn credit(&mut self, bucket: i32, amount: f32) {
        *self.entries.entry(bucket).or_insert(0.0) += amount;
    }

    /// Score of `bucket` (0.0 if absent)
    pub fn score(&self, bucket: i32) -> f32 {
        self.entries.get(&bucket).copied().unwrap_or(0.0)
    }

    /// Reduce every score by `fraction` of itself
    ///
    /// `fraction` is clamped to [0.0, 1.0], so scores never turn negative.
    pub fn decay(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        for score in self.entries.values_mut() {
            *score -= *score * fraction;
        }
    }

    /// Largest score (0.0 if empty)
    pub fn max(&self) -> f32 {
        self.entries.values().copied().fold(0.0f32, f32::max)
    }

    /// Scale all scores so the largest equals `finish_line` if it exceeds it
    ///
    /// # Returns
    ///
    /// True if the table was rescaled
    pub fn rescale(&mut self, finish_line: f32) -> bool {
        let max = self.max();
        if max <= finish_line {
            return false;
        }
        let scale = finish_line / max;
        for score in self.entries.values_mut() {
            // `max * (finish_line / max)` can round one ulp above the line
            *score = (*score * scale).min(finish_line);
        }
        true
    }

    /// Bucket with the largest positive score
    ///
    /// Ties go to the lowest bucket. Returns `None` if no score is positive.
    pub fn leader(&self) -> Option<(i32, f32)> {
        let mut best: Option<(i32, f32)> = None;
        for (&bucket, &score) in &self.entries {
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((bucket, score));
            }
        }
        best
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no bucket has been credited
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(bucket, score)` in ascending bucket order
    pub fn iter(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.entries.iter().map(|(&b, &s)| (b, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_leader() {
        let mut contest = Contest::new();
        assert_eq!(contest.leader(), None);

        contest.credit(1200, 7.0);
        contest.credit(1180, 3.0);
        contest.credit(1200, 7.0);

        assert_eq!(contest.score(1200), 14.0);
        assert_eq!(contest.leader(), Some((1200, 14.0)));
        assert_eq!(contest.len(), 2);
    }

    #[test]
    fn test_leader_tie_goes_to_lowest_bucket() {
        let mut contest = Contest::new();
        contest.credit(1300, 5.0);
        contest.credit(1250, 5.0);
        assert_eq!(contest.leader(), Some((1250, 5.0)));
    }

    #[test]
    fn test_decay_is_proportional() {
        let mut contest = Contest::new();
        contest.credit(1, 10.0);
        contest.credit(2, 4.0);
        contest.decay(0.25);
        assert!((contest.score(1) - 7.5).abs() < 1e-6);
        assert!((contest.score(2) - 3.0).abs() < 1e-6);

        contest.decay(5.0);
        assert_eq!(contest.max(), 0.0);
        assert_eq!(contest.leader(), None);
    }

    #[test]
    fn test_rescale_caps_at_finish_line() {
        let mut contest = Contest::new();
        contest.credit(1200, 120.0);
        contest.credit(1210, 30.0);

        assert!(contest.rescale(60.0));
        assert!((contest.max() - 60.0).abs() < 1e-4);
        assert!((contest.score(1210) - 15.0).abs() < 1e-4);

        // Already below the line: untouched
        assert!(!contest.rescale(60.0));
        assert_eq!(contest.leader().map(|(b, _)| b), Some(1200));
    }

    #[test]
    fn test_rescale_never_exceeds_finish_line() {
        let mut over = 0;
        for k in 1..20_000 {
            let mut contest = Contest::new();
            let top = 60.0 + k as f32 * 0.0123;
            contest.credit(1200, top);
            contest.credit(1190, top * 0.5);
            contest.rescale(60.0);
            if contest.max() > 60.0 {
                over += 1;
            }
            assert!(contest.score(1190) <= contest.score(1200));
        }
        assert_eq!(over, 0);
    }

    #[test]
    fn test_clear() {
        let mut contest = Contest::new();
        contest.credit(100, 1.0);
        contest.clear();
        assert!(contest.is_empty());
    }
}
