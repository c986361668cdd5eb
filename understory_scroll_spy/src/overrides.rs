// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click override bookkeeping.
//!
//! After [`ScrollSpy::set_active`](crate::ScrollSpy::set_active) the host is
//! usually running a (smooth) programmatic scroll towards the clicked
//! section. While it is in flight, organic scroll tracking is suspended.
//! [`ClickOverride`] remembers where that scroll started and watches frames
//! until it has come to rest.

use crate::{IdleDetector, ScrollSpyEvent};

/// State for one click-driven navigation scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickOverride {
    origin: f64,
    idle: IdleDetector,
}

impl ClickOverride {
    /// Arms an override for a scroll starting at `origin`.
    #[must_use]
    pub fn new(origin: f64, idle_frames: u32) -> Self {
        Self {
            origin,
            idle: IdleDetector::new(idle_frames),
        }
    }

    /// Scroll offset at the time of the click.
    ///
    /// A cancel re-evaluation classifies its direction against this offset.
    #[must_use]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Samples one frame, returning `true` once the scroll has come to rest.
    pub fn on_frame(&mut self, offset: f64) -> bool {
        self.idle.sample(offset)
    }

    /// Whether `event` is a user gesture that takes over from the
    /// programmatic scroll.
    ///
    /// Wheel, touch movement, and the space bar always cancel. A pointer press
    /// cancels unless it lands on a link (which is a new navigation) or the
    /// root sits at an edge (where a press cannot be grabbing a scroll in
    /// progress).
    #[must_use]
    pub fn is_cancel(event: ScrollSpyEvent, at_edge: bool) -> bool {
        match event {
            ScrollSpyEvent::Wheel | ScrollSpyEvent::TouchMove => true,
            ScrollSpyEvent::KeyDown { space } => space,
            ScrollSpyEvent::PointerDown { on_link } => !on_link && !at_edge,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClickOverride;
    use crate::ScrollSpyEvent;

    #[test]
    fn settles_after_idle_frames() {
        let mut click = ClickOverride::new(120.0, 2);
        assert_eq!(click.origin(), 120.0);
        assert!(!click.on_frame(300.0));
        assert!(!click.on_frame(600.0));
        assert!(!click.on_frame(600.0));
        assert!(click.on_frame(600.0));
    }

    #[test]
    fn cancel_gestures() {
        assert!(ClickOverride::is_cancel(ScrollSpyEvent::Wheel, true));
        assert!(ClickOverride::is_cancel(ScrollSpyEvent::TouchMove, false));
        assert!(ClickOverride::is_cancel(
            ScrollSpyEvent::KeyDown { space: true },
            false
        ));
        assert!(!ClickOverride::is_cancel(
            ScrollSpyEvent::KeyDown { space: false },
            false
        ));
    }

    #[test]
    fn pointer_cancel_skips_links_and_edges() {
        let press = |on_link| ScrollSpyEvent::PointerDown { on_link };
        assert!(ClickOverride::is_cancel(press(false), false));
        assert!(!ClickOverride::is_cancel(press(true), false));
        assert!(!ClickOverride::is_cancel(press(false), true));
    }

    #[test]
    fn scroll_is_not_a_cancel() {
        assert!(!ClickOverride::is_cancel(ScrollSpyEvent::Scroll, false));
    }
}
