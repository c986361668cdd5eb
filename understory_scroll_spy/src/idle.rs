// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-counting idle detection.
//!
//! An [`IdleDetector`] is fed one scroll offset per animation frame. Any
//! change restarts the count; once the offset has stayed put for
//! `threshold` consecutive frames the scroll is considered settled. This is a
//! debounce measured in frames rather than wall-clock time, so it follows the
//! host's own scroll-animation cadence.

/// Counts consecutive frames without movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdleDetector {
    threshold: u32,
    last: Option<f64>,
    still: u32,
}

impl IdleDetector {
    /// Creates a detector that settles after `threshold` still frames.
    ///
    /// A threshold of zero is treated as one.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            last: None,
            still: 0,
        }
    }

    /// Number of still frames required to settle.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Consecutive still frames observed so far.
    #[must_use]
    pub fn still_frames(&self) -> u32 {
        self.still
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.last = None;
        self.still = 0;
    }

    /// Records the offset seen on this frame, returning `true` once settled.
    ///
    /// The first sample after a reset only establishes the baseline.
    pub fn sample(&mut self, offset: f64) -> bool {
        if self.last != Some(offset) {
            self.last = Some(offset);
            self.still = 0;
            return false;
        }
        self.still += 1;
        self.still >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::IdleDetector;

    #[test]
    fn settles_after_threshold_still_frames() {
        let mut idle = IdleDetector::new(3);
        assert!(!idle.sample(100.0));
        assert!(!idle.sample(100.0));
        assert!(!idle.sample(100.0));
        assert!(idle.sample(100.0));
    }

    #[test]
    fn movement_restarts_the_count() {
        let mut idle = IdleDetector::new(2);
        idle.sample(0.0);
        idle.sample(0.0);
        assert_eq!(idle.still_frames(), 1);

        assert!(!idle.sample(40.0));
        assert_eq!(idle.still_frames(), 0);
        assert!(!idle.sample(40.0));
        assert!(idle.sample(40.0));
    }

    #[test]
    fn reset_discards_baseline() {
        let mut idle = IdleDetector::new(1);
        idle.sample(5.0);
        idle.reset();
        assert!(!idle.sample(5.0));
        assert!(idle.sample(5.0));
    }

    #[test]
    fn zero_threshold_is_clamped() {
        assert_eq!(IdleDetector::new(0).threshold(), 1);
    }
}
