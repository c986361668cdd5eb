// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host environment: geometry queries, listener registration, history, and frames.
//!
//! [`ScrollSpy`](crate::ScrollSpy) never touches a DOM or window system directly.
//! Everything it needs from the outside world goes through [`Environment`], which
//! a host implements once (for example over `web-sys`, or over a scripted layout
//! in tests).
//!
//! Listener registration is declarative: the spy tells the host which
//! [`Listeners`] should be live via [`Environment::attach`] and
//! [`Environment::detach`], and the host forwards matching input back through
//! [`ScrollSpy::handle`](crate::ScrollSpy::handle). Input for a listener that is
//! not attached is dropped by the spy, the same way a removed DOM listener
//! would never fire.

use alloc::string::String;

use kurbo::Rect;

bitflags::bitflags! {
    /// Kinds of host input the scroll spy listens to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Listeners: u8 {
        /// Scroll events on the scroll root.
        const SCROLL       = 0b0000_0001;
        /// Viewport resize (and media-query changes).
        const RESIZE       = 0b0000_0010;
        /// Mouse wheel on the scroll root.
        const WHEEL        = 0b0000_0100;
        /// Touch movement on the scroll root.
        const TOUCH_MOVE   = 0b0000_1000;
        /// Key presses; only the space bar is of interest.
        const KEY_DOWN     = 0b0001_0000;
        /// Pointer presses on the scroll root.
        const POINTER_DOWN = 0b0010_0000;
        /// Fragment navigation (`hashchange` / `popstate`).
        const HASH_CHANGE  = 0b0100_0000;
    }
}

impl Listeners {
    /// Gestures that hand control back from a click-driven scroll.
    pub const CANCEL_GESTURES: Self = Self::WHEEL
        .union(Self::TOUCH_MOVE)
        .union(Self::KEY_DOWN)
        .union(Self::POINTER_DOWN);
}

/// Scroll state of the scroll root, in root (block-axis) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset. May be negative or exceed the maximum during overscroll.
    pub scroll_top: f64,
    /// Total scrollable content height.
    pub scroll_height: f64,
    /// Visible height of the root.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Largest regular scroll offset, `scroll_height - client_height`, floored at zero.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Everything the scroll spy needs from its host.
///
/// All rectangles are in viewport coordinates, like `getBoundingClientRect`.
pub trait Environment {
    /// Returns `false` when there is no document to observe (server rendering).
    ///
    /// An unavailable environment turns every [`ScrollSpy`](crate::ScrollSpy)
    /// operation into a no-op.
    fn is_available(&self) -> bool {
        true
    }

    /// Current scroll metrics of the scroll root.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Viewport-relative top edge of the scroll root (`0.0` for the document).
    fn root_top(&self) -> f64;

    /// Viewport-relative bounds of the element with the given id, if it exists.
    fn target_rect(&self, id: &str) -> Option<Rect>;

    /// Current viewport width used by the min-width gate.
    fn viewport_width(&self) -> f64;

    /// Current URL fragment without the leading `#`, if any.
    fn location_hash(&self) -> Option<String>;

    /// Replaces the URL fragment without navigating or adding a history entry.
    ///
    /// `None` strips the fragment.
    fn replace_hash(&mut self, fragment: Option<&str>);

    /// Starts delivering the given kinds of input.
    fn attach(&mut self, listeners: Listeners);

    /// Stops delivering the given kinds of input.
    fn detach(&mut self, listeners: Listeners);

    /// Schedules one [`ScrollSpyEvent::Frame`](crate::ScrollSpyEvent::Frame) on the next animation frame.
    fn request_frame(&mut self);

    /// Cancels a previously requested frame, if still pending.
    fn cancel_frame(&mut self);
}

/// Environment without a document.
///
/// Used for server-side rendering and for constructing a spy before a real
/// host is available; every query returns an empty default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEnvironment;

impl Environment for NullEnvironment {
    fn is_available(&self) -> bool {
        false
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::default()
    }

    fn root_top(&self) -> f64 {
        0.0
    }

    fn target_rect(&self, _id: &str) -> Option<Rect> {
        None
    }

    fn viewport_width(&self) -> f64 {
        0.0
    }

    fn location_hash(&self) -> Option<String> {
        None
    }

    fn replace_hash(&mut self, _fragment: Option<&str>) {}

    fn attach(&mut self, _listeners: Listeners) {}

    fn detach(&mut self, _listeners: Listeners) {}

    fn request_frame(&mut self) {}

    fn cancel_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::{Listeners, ScrollMetrics};

    #[test]
    fn max_scroll_top_is_never_negative() {
        let short = ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 300.0,
            client_height: 800.0,
        };
        assert_eq!(short.max_scroll_top(), 0.0);

        let long = ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 3000.0,
            client_height: 800.0,
        };
        assert_eq!(long.max_scroll_top(), 2200.0);
    }

    #[test]
    fn cancel_gestures_exclude_scroll() {
        assert!(!Listeners::CANCEL_GESTURES.contains(Listeners::SCROLL));
        assert!(Listeners::CANCEL_GESTURES.contains(Listeners::POINTER_DOWN));
    }
}
