// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_spy --heading-base-level=0

//! Understory Scroll Spy: headless active-section tracking for tables of contents.
//!
//! A scroll spy watches a scrollable root containing a set of target
//! sections (identified by id) and decides which one is "active" so that a
//! navigation sidebar can highlight it. This crate owns the decision logic
//! only. Reading layout, listening to input, scheduling animation frames,
//! and writing the URL are delegated to an [`Environment`] supplied by the
//! host.
//!
//! The resolver:
//! - Uses direction-aware activation lines with hysteresis, so the
//!   highlight moves forward while scrolling down and backward while
//!   scrolling up, and never flickers back against the direction of travel.
//! - Short-circuits at the top and bottom of the root (including
//!   rubber-band overscroll), so the first and last sections are reachable
//!   even when they are too short to cross the line.
//! - Lets the URL fragment win after the host's initial scroll-to-fragment
//!   has settled.
//! - Suspends organic tracking while a link-driven navigation scroll is in
//!   flight, resuming when it comes to rest or when the user takes over
//!   with a wheel, touch, space bar, or pointer press.
//! - Turns itself off below a viewport width breakpoint.
//! - Optionally mirrors the active id into the URL fragment.
//!
//! ## Model
//!
//! [`ScrollSpy`] is a state machine moving through the [`Phase`]s
//! `Unmounted → (Disabled | Settling) → Tracking ⇄ Overridden`. The host
//! forwards input through [`ScrollSpy::handle`]. Which [`Listeners`] should
//! be attached is pushed back to the environment on every phase change, so
//! a DOM binding only has to mirror [`Environment::attach`] and
//! [`Environment::detach`]. Idle detection runs on host animation frames
//! ([`ScrollSpyEvent::Frame`]) rather than on timers.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_scroll_spy::{
//!     Environment, Listeners, ScrollMetrics, ScrollSpy, ScrollSpyEvent, ScrollSpyOptions,
//! };
//!
//! /// Three 400px sections followed by a long footer.
//! struct Page {
//!     scroll_top: f64,
//! }
//!
//! impl Environment for Page {
//!     fn scroll_metrics(&self) -> ScrollMetrics {
//!         ScrollMetrics {
//!             scroll_top: self.scroll_top,
//!             scroll_height: 2000.0,
//!             client_height: 800.0,
//!         }
//!     }
//!     fn root_top(&self) -> f64 {
//!         0.0
//!     }
//!     fn target_rect(&self, id: &str) -> Option<Rect> {
//!         let i = ["intro", "usage", "faq"].iter().position(|t| *t == id)?;
//!         let top = i as f64 * 400.0 - self.scroll_top;
//!         Some(Rect::new(0.0, top, 600.0, top + 400.0))
//!     }
//!     fn viewport_width(&self) -> f64 {
//!         1024.0
//!     }
//!     fn location_hash(&self) -> Option<String> {
//!         None
//!     }
//!     fn replace_hash(&mut self, _fragment: Option<&str>) {}
//!     fn attach(&mut self, _listeners: Listeners) {}
//!     fn detach(&mut self, _listeners: Listeners) {}
//!     fn request_frame(&mut self) {}
//!     fn cancel_frame(&mut self) {}
//! }
//!
//! let page = Page { scroll_top: 0.0 };
//! let mut spy =
//!     ScrollSpy::with_targets(page, ScrollSpyOptions::default(), ["intro", "usage", "faq"])
//!         .unwrap();
//! spy.mount();
//! assert_eq!(spy.active_id(), "intro");
//!
//! spy.env_mut().scroll_top = 420.0;
//! spy.handle(ScrollSpyEvent::Scroll);
//! assert_eq!(spy.active_id(), "usage");
//!
//! spy.env_mut().scroll_top = 100.0;
//! spy.handle(ScrollSpyEvent::Scroll);
//! assert_eq!(spy.active_index(), Some(0));
//! ```
//!
//! Without a document (server-side rendering), use [`NullEnvironment`]:
//! mounting is a no-op and the active id stays empty.
//!
//! ## Observing changes
//!
//! [`ScrollSpy::subscribe`] registers callbacks that run whenever the active
//! target changes. The underlying [`store`] types are usable on their own.
//!
//! ## Logging
//!
//! Phase changes and active-target changes are reported through `tracing` at
//! `debug` level; individual scans and listener diffs at `trace` level.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo, `tracing`, and `thiserror`.
//! - `libm`: forwards `libm` to Kurbo for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod direction;
mod edges;
mod env;
mod error;
mod event;
mod gate;
mod geometry;
mod hash;
mod idle;
mod options;
mod overrides;
mod spy;
pub mod store;

pub use direction::{
    BOUNDARY_OFFSET, HEAD_BUFFER, Resolution, ScanPolicy, ScrollDirection, guard_accepts,
};
pub use edges::{BOTTOM_EDGE_TOLERANCE, Edges, TOP_EDGE_TOLERANCE};
pub use env::{Environment, Listeners, NullEnvironment, ScrollMetrics};
pub use error::OptionsError;
pub use event::ScrollSpyEvent;
pub use gate::ViewportGate;
pub use geometry::{GeometryCache, Target};
pub use hash::HashSync;
pub use idle::IdleDetector;
pub use options::{BoundaryOffset, EdgeOffset, ScrollSpyOptions};
pub use overrides::ClickOverride;
pub use spy::{ActiveTarget, Phase, ScrollSpy};
pub use store::{GatedStore, Observable, SubscriptionId};
