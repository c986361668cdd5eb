// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_spy_web --heading-base-level=0

//! DOM binding for `understory_scroll_spy`.
//!
//! When targeting `wasm32`, this crate provides:
//! - `DomEnvironment`: an `Environment` over `web-sys` that reads scroll
//!   metrics and bounding rectangles, registers event listeners, schedules
//!   `requestAnimationFrame` callbacks, and rewrites the URL fragment with
//!   `history.replaceState`.
//! - `WebScrollSpy`: a shared handle owning a `ScrollSpy<DomEnvironment>`,
//!   wired so that DOM input reaches the spy without any glue code.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn track_toc() -> understory_scroll_spy_web::WebScrollSpy {
//!     use understory_scroll_spy::ScrollSpyOptions;
//!     use understory_scroll_spy_web::WebScrollSpy;
//!
//!     let options = ScrollSpyOptions::default()
//!         .with_overlay_height(64.0)
//!         .with_min_width(1024.0);
//!     let spy = WebScrollSpy::new(None, options, ["intro", "usage", "faq"]).unwrap();
//!     spy.subscribe(|active| tracing::info!(id = %active.id, "active section changed"));
//!     spy.mount();
//!     spy
//! }
//! ```
//!
//! Notes:
//! - Passing `None` as the root tracks the document's scrolling element
//!   with window semantics.
//! - Outside a browser window (for example in a worker), the spy stays
//!   inert and reports no active target.
//! - Dropping the `WebScrollSpy` detaches every listener.
//!
//! On other targets this crate is empty.

#![no_std]

extern crate alloc;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomEnvironment, WebScrollSpy};
