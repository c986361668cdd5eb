// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Min-width viewport gate.

/// Enables tracking only at or above a viewport width, like a
/// `(min-width: Npx)` media query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGate {
    min_width: f64,
    open: bool,
}

impl ViewportGate {
    /// Creates a gate for `min_width`, initially open.
    #[must_use]
    pub fn new(min_width: f64) -> Self {
        Self {
            min_width,
            open: true,
        }
    }

    /// The breakpoint.
    #[must_use]
    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    /// Whether tracking is currently enabled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `width` satisfies the breakpoint.
    #[must_use]
    pub fn matches(&self, width: f64) -> bool {
        width >= self.min_width
    }

    /// Re-evaluates the gate for a viewport `width`.
    ///
    /// Returns the new state if it flipped, `None` otherwise.
    pub fn update(&mut self, width: f64) -> Option<bool> {
        let open = self.matches(width);
        if open == self.open {
            return None;
        }
        self.open = open;
        Some(open)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportGate;

    #[test]
    fn breakpoint_is_inclusive() {
        let gate = ViewportGate::new(768.0);
        assert!(gate.matches(768.0));
        assert!(!gate.matches(767.5));
    }

    #[test]
    fn zero_breakpoint_always_matches() {
        let gate = ViewportGate::new(0.0);
        assert!(gate.matches(0.0));
        assert!(gate.matches(320.0));
    }

    #[test]
    fn update_reports_flips_only() {
        let mut gate = ViewportGate::new(768.0);
        assert_eq!(gate.update(1024.0), None);
        assert_eq!(gate.update(500.0), Some(false));
        assert!(!gate.is_open());
        assert_eq!(gate.update(600.0), None);
        assert_eq!(gate.update(900.0), Some(true));
        assert!(gate.is_open());
    }
}
