// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use thiserror::Error;

/// Rejected [`ScrollSpyOptions`](crate::ScrollSpyOptions).
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum OptionsError {
    /// An offset or width is NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An option that must be non-negative is negative.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A frame threshold is zero; idle detection needs at least one still frame.
    #[error("`{field}` must be at least one frame")]
    ZeroFrames {
        /// Name of the offending option.
        field: &'static str,
    },
}
