// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction-dependent target selection.
//!
//! Scrolling down, the active target is the last one whose top has *left*
//! through the activation line. Scrolling up, it is the first one whose
//! bottom is still *below* the line, i.e. the section entering from the top.
//! Using different edges per direction gives the selection hysteresis: a
//! section stays active until it has fully handed over to its neighbor.
//!
//! Candidates are filtered through [`guard_accepts`], which only lets the
//! active index move in the direction of travel. Smooth scrolling and custom
//! easings can otherwise report samples that briefly select a previous
//! section.

use crate::{EdgeOffset, ScrollSpyOptions, Target};

/// Fixed allowance added to every activation line.
pub const BOUNDARY_OFFSET: f64 = 5.0;

/// Distance past the upward activation line the first target may travel
/// before it stops being active (when `jump_to_first` is off).
pub const HEAD_BUFFER: f64 = 5.0;

/// Direction of a scroll sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Offset decreased.
    Up,
    /// Offset increased or stayed put.
    Down,
}

impl ScrollDirection {
    /// Classifies a move from `prev` to `current`.
    #[must_use]
    pub fn classify(prev: f64, current: f64) -> Self {
        if current < prev { Self::Up } else { Self::Down }
    }
}

/// Outcome of a directional scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Proposed index (or no target), still subject to [`guard_accepts`].
    Candidate(Option<usize>),
    /// Head/tail policy: nothing should be active, regardless of the guard.
    Clear,
}

/// Activation lines and jump policies derived from [`ScrollSpyOptions`].
///
/// Lines are measured from the root's visible top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanPolicy {
    /// Line a target's top must reach while scrolling down.
    pub down_line: f64,
    /// Line a target's bottom must stay below while scrolling up.
    pub up_line: f64,
    /// See [`ScrollSpyOptions::jump_to_first`].
    pub jump_to_first: bool,
    /// See [`ScrollSpyOptions::jump_to_last`].
    pub jump_to_last: bool,
    /// See [`ScrollSpyOptions::edge_offset`].
    pub edge_offset: EdgeOffset,
}

impl ScanPolicy {
    /// Builds the policy for a set of options.
    #[must_use]
    pub fn from_options(options: &ScrollSpyOptions) -> Self {
        let base = BOUNDARY_OFFSET + options.overlay_height;
        Self {
            down_line: base + options.boundary_offset.to_bottom,
            up_line: base + options.boundary_offset.to_top,
            jump_to_first: options.jump_to_first,
            jump_to_last: options.jump_to_last,
            edge_offset: options.edge_offset,
        }
    }

    /// Runs the scan for `direction`.
    #[must_use]
    pub fn scan(&self, direction: ScrollDirection, targets: &[Target], scroll_top: f64) -> Resolution {
        match direction {
            ScrollDirection::Down => self.scan_down(targets, scroll_top),
            ScrollDirection::Up => self.scan_up(targets, scroll_top),
        }
    }

    /// Last target whose top has crossed the downward line.
    #[must_use]
    pub fn scan_down(&self, targets: &[Target], scroll_top: f64) -> Resolution {
        let mut candidate = None;
        for (i, target) in targets.iter().enumerate() {
            let mut line = self.down_line;
            if i == 0 && !self.jump_to_first {
                line += self.edge_offset.first;
            }
            if target.top_at(scroll_top) <= line {
                candidate = Some(i);
            }
        }

        if candidate.is_none() && self.jump_to_first && !targets.is_empty() {
            candidate = Some(0);
        }

        if !self.jump_to_last {
            let last = targets.len().checked_sub(1);
            if let (Some(i), Some(last)) = (candidate, last) {
                let passed = targets[last].bottom_at(scroll_top)
                    <= self.down_line - self.edge_offset.last;
                if i == last && passed {
                    return Resolution::Clear;
                }
            }
        }

        Resolution::Candidate(candidate)
    }

    /// First target whose bottom is still below the upward line.
    #[must_use]
    pub fn scan_up(&self, targets: &[Target], scroll_top: f64) -> Resolution {
        let mut candidate = targets
            .iter()
            .position(|target| target.bottom_at(scroll_top) >= self.up_line);

        if candidate.is_none() && self.jump_to_last {
            candidate = targets.len().checked_sub(1);
        }

        if !self.jump_to_first && candidate == Some(0) {
            let head = self.up_line + HEAD_BUFFER + self.edge_offset.first;
            if targets[0].top_at(scroll_top) > head {
                return Resolution::Clear;
            }
        }

        Resolution::Candidate(candidate)
    }
}

/// Monotonic guard: whether `candidate` may replace `current`.
///
/// Moving down only accepts a strictly later index, moving up a strictly
/// earlier one (where "no target" ranks before every index). With nothing
/// active every candidate is accepted.
#[must_use]
pub fn guard_accepts(
    direction: ScrollDirection,
    candidate: Option<usize>,
    current: Option<usize>,
) -> bool {
    let Some(current) = current else {
        return true;
    };
    match direction {
        ScrollDirection::Down => candidate.is_some_and(|c| c > current),
        ScrollDirection::Up => candidate.is_none_or(|c| c < current),
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec::Vec;

    use super::{Resolution, ScanPolicy, ScrollDirection, guard_accepts};
    use crate::{ScrollSpyOptions, Target};

    /// Five contiguous 500px sections starting at the content origin.
    fn sections() -> Vec<Target> {
        (0..5_u32)
            .map(|i| Target {
                id: format!("t{i}"),
                top: f64::from(i) * 500.0,
                bottom: f64::from(i + 1) * 500.0,
            })
            .collect()
    }

    fn policy(options: ScrollSpyOptions) -> ScanPolicy {
        ScanPolicy::from_options(&options)
    }

    #[test]
    fn classify_treats_unchanged_as_down() {
        assert_eq!(ScrollDirection::classify(100.0, 50.0), ScrollDirection::Up);
        assert_eq!(ScrollDirection::classify(100.0, 150.0), ScrollDirection::Down);
        assert_eq!(ScrollDirection::classify(100.0, 100.0), ScrollDirection::Down);
    }

    #[test]
    fn lines_include_overlay_and_boundary() {
        let p = policy(
            ScrollSpyOptions::default()
                .with_overlay_height(60.0)
                .with_boundary_offset(10.0, 20.0),
        );
        assert_eq!(p.up_line, 75.0);
        assert_eq!(p.down_line, 85.0);
    }

    #[test]
    fn down_picks_last_section_that_left_the_top() {
        let targets = sections();
        let p = policy(ScrollSpyOptions::default());

        assert_eq!(p.scan_down(&targets, 1100.0), Resolution::Candidate(Some(2)));
        assert_eq!(p.scan_down(&targets, 1600.0), Resolution::Candidate(Some(3)));
        // Within the 5px allowance.
        assert_eq!(p.scan_down(&targets, 1497.0), Resolution::Candidate(Some(3)));
    }

    #[test]
    fn down_before_first_section_depends_on_jump_to_first() {
        let mut targets = sections();
        for t in &mut targets {
            t.top += 300.0;
            t.bottom += 300.0;
        }

        let jumping = policy(ScrollSpyOptions::default());
        assert_eq!(jumping.scan_down(&targets, 0.0), Resolution::Candidate(Some(0)));

        let strict = policy(ScrollSpyOptions::default().with_jump_to_first(false));
        assert_eq!(strict.scan_down(&targets, 0.0), Resolution::Candidate(None));

        // Slack lets the first section activate earlier.
        let slack = policy(
            ScrollSpyOptions::default()
                .with_jump_to_first(false)
                .with_edge_offset(300.0, 0.0),
        );
        assert_eq!(slack.scan_down(&targets, 0.0), Resolution::Candidate(Some(0)));
    }

    #[test]
    fn down_tail_clears_once_last_section_is_passed() {
        let targets = sections();
        let p = policy(ScrollSpyOptions::default().with_jump_to_last(false));

        // Last section's top crossed, bottom still below the line.
        assert_eq!(p.scan_down(&targets, 2100.0), Resolution::Candidate(Some(4)));
        // Bottom crossed too.
        assert_eq!(p.scan_down(&targets, 2500.0), Resolution::Clear);

        let jumping = policy(ScrollSpyOptions::default());
        assert_eq!(jumping.scan_down(&targets, 2500.0), Resolution::Candidate(Some(4)));
    }

    #[test]
    fn up_picks_first_section_still_below_the_line() {
        let targets = sections();
        let p = policy(ScrollSpyOptions::default());

        // t2 bottom at 100 is below the 5px line.
        assert_eq!(p.scan_up(&targets, 1400.0), Resolution::Candidate(Some(2)));
        // t2 bottom at 3: t3 takes over.
        assert_eq!(p.scan_up(&targets, 1497.0), Resolution::Candidate(Some(3)));
    }

    #[test]
    fn up_past_every_section_depends_on_jump_to_last() {
        let targets = sections();
        let jumping = policy(ScrollSpyOptions::default());
        assert_eq!(jumping.scan_up(&targets, 2600.0), Resolution::Candidate(Some(4)));

        let strict = policy(ScrollSpyOptions::default().with_jump_to_last(false));
        assert_eq!(strict.scan_up(&targets, 2600.0), Resolution::Candidate(None));
    }

    #[test]
    fn up_head_clears_once_first_section_fully_entered() {
        let mut targets = sections();
        for t in &mut targets {
            t.top += 200.0;
            t.bottom += 200.0;
        }
        let p = policy(ScrollSpyOptions::default().with_jump_to_first(false));

        // First top at 8: inside the 10px head buffer.
        assert_eq!(p.scan_up(&targets, 192.0), Resolution::Candidate(Some(0)));
        // First top at 50: fully entered.
        assert_eq!(p.scan_up(&targets, 150.0), Resolution::Clear);
    }

    #[test]
    fn guard_is_direction_monotonic() {
        use ScrollDirection::{Down, Up};

        assert!(guard_accepts(Down, Some(3), Some(2)));
        assert!(!guard_accepts(Down, Some(1), Some(2)));
        assert!(!guard_accepts(Down, Some(2), Some(2)));
        assert!(!guard_accepts(Down, None, Some(2)));

        assert!(guard_accepts(Up, Some(1), Some(2)));
        assert!(!guard_accepts(Up, Some(3), Some(2)));
        assert!(guard_accepts(Up, None, Some(2)));

        assert!(guard_accepts(Down, Some(0), None));
        assert!(guard_accepts(Up, Some(4), None));
    }
}
