// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input forwarded into [`ScrollSpy::handle`](crate::ScrollSpy::handle).

use crate::Listeners;

/// A single piece of host input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSpyEvent {
    /// The scroll root scrolled.
    Scroll,
    /// The viewport was resized or a media query changed.
    Resize,
    /// A wheel gesture started on the scroll root.
    Wheel,
    /// A touch moved on the scroll root.
    TouchMove,
    /// A key was pressed.
    KeyDown {
        /// Whether the key was the space bar.
        space: bool,
    },
    /// A pointer was pressed.
    PointerDown {
        /// Whether the press landed on (or inside) a navigation link.
        on_link: bool,
    },
    /// The URL fragment changed through navigation.
    HashChange,
    /// An animation frame requested via [`Environment::request_frame`](crate::Environment::request_frame) fired.
    Frame,
}

impl ScrollSpyEvent {
    /// The listener this event is delivered through, or `None` for frames.
    #[must_use]
    pub fn listener(self) -> Option<Listeners> {
        Some(match self {
            Self::Scroll => Listeners::SCROLL,
            Self::Resize => Listeners::RESIZE,
            Self::Wheel => Listeners::WHEEL,
            Self::TouchMove => Listeners::TOUCH_MOVE,
            Self::KeyDown { .. } => Listeners::KEY_DOWN,
            Self::PointerDown { .. } => Listeners::POINTER_DOWN,
            Self::HashChange => Listeners::HASH_CHANGE,
            Self::Frame => return None,
        })
    }
}
