// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options for [`ScrollSpy`](crate::ScrollSpy).

use crate::OptionsError;

/// Extra per-direction offset added to the activation line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundaryOffset {
    /// Added while scrolling up (sections entering from the top).
    pub to_top: f64,
    /// Added while scrolling down (sections leaving through the top).
    pub to_bottom: f64,
}

/// Extra slack for the first/last target when the matching jump policy is off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeOffset {
    /// Applied to the first target when `jump_to_first` is `false`.
    pub first: f64,
    /// Applied to the last target when `jump_to_last` is `false`.
    pub last: f64,
}

/// Behavior knobs for a [`ScrollSpy`](crate::ScrollSpy).
///
/// All lengths are in root pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSpyOptions {
    /// Activate the first target at the top edge and before any target was reached.
    pub jump_to_first: bool,
    /// Activate the last target at the bottom edge and after every target was passed.
    pub jump_to_last: bool,
    /// Height of fixed chrome (for example a sticky header) covering the root's top.
    pub overlay_height: f64,
    /// Per-direction activation line offsets.
    pub boundary_offset: BoundaryOffset,
    /// First/last target slack.
    pub edge_offset: EdgeOffset,
    /// Viewport width below which tracking is disabled.
    pub min_width: f64,
    /// Mirror the active id into the URL fragment.
    pub replace_hash: bool,
    /// Still frames required before the initial hash scroll counts as settled.
    pub settle_frames: u32,
    /// Still frames required before a click-driven scroll counts as finished.
    pub override_idle_frames: u32,
}

impl Default for ScrollSpyOptions {
    fn default() -> Self {
        Self {
            jump_to_first: true,
            jump_to_last: true,
            overlay_height: 0.0,
            boundary_offset: BoundaryOffset::default(),
            edge_offset: EdgeOffset::default(),
            min_width: 0.0,
            replace_hash: false,
            settle_frames: 10,
            override_idle_frames: 20,
        }
    }
}

impl ScrollSpyOptions {
    /// Sets [`jump_to_first`](Self::jump_to_first).
    #[must_use]
    pub fn with_jump_to_first(mut self, jump: bool) -> Self {
        self.jump_to_first = jump;
        self
    }

    /// Sets [`jump_to_last`](Self::jump_to_last).
    #[must_use]
    pub fn with_jump_to_last(mut self, jump: bool) -> Self {
        self.jump_to_last = jump;
        self
    }

    /// Sets [`overlay_height`](Self::overlay_height).
    #[must_use]
    pub fn with_overlay_height(mut self, height: f64) -> Self {
        self.overlay_height = height;
        self
    }

    /// Sets [`boundary_offset`](Self::boundary_offset).
    #[must_use]
    pub fn with_boundary_offset(mut self, to_top: f64, to_bottom: f64) -> Self {
        self.boundary_offset = BoundaryOffset { to_top, to_bottom };
        self
    }

    /// Sets [`edge_offset`](Self::edge_offset).
    #[must_use]
    pub fn with_edge_offset(mut self, first: f64, last: f64) -> Self {
        self.edge_offset = EdgeOffset { first, last };
        self
    }

    /// Sets [`min_width`](Self::min_width).
    #[must_use]
    pub fn with_min_width(mut self, width: f64) -> Self {
        self.min_width = width;
        self
    }

    /// Sets [`replace_hash`](Self::replace_hash).
    #[must_use]
    pub fn with_replace_hash(mut self, replace: bool) -> Self {
        self.replace_hash = replace;
        self
    }

    /// Sets both idle-detection frame thresholds.
    #[must_use]
    pub fn with_idle_frames(mut self, settle: u32, override_idle: u32) -> Self {
        self.settle_frames = settle;
        self.override_idle_frames = override_idle;
        self
    }

    /// Checks that every length is usable.
    ///
    /// Boundary offsets may be negative; every other length must be finite
    /// and non-negative, and both frame thresholds must be non-zero.
    pub fn validate(&self) -> Result<(), OptionsError> {
        finite("boundary_offset.to_top", self.boundary_offset.to_top)?;
        finite("boundary_offset.to_bottom", self.boundary_offset.to_bottom)?;
        non_negative("overlay_height", self.overlay_height)?;
        non_negative("edge_offset.first", self.edge_offset.first)?;
        non_negative("edge_offset.last", self.edge_offset.last)?;
        non_negative("min_width", self.min_width)?;
        if self.settle_frames == 0 {
            return Err(OptionsError::ZeroFrames {
                field: "settle_frames",
            });
        }
        if self.override_idle_frames == 0 {
            return Err(OptionsError::ZeroFrames {
                field: "override_idle_frames",
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OptionsError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), OptionsError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(OptionsError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ScrollSpyOptions;
    use crate::OptionsError;

    #[test]
    fn defaults_are_valid() {
        let options = ScrollSpyOptions::default();
        assert!(options.jump_to_first && options.jump_to_last);
        assert!(!options.replace_hash);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn negative_boundary_offsets_are_allowed() {
        let options = ScrollSpyOptions::default().with_boundary_offset(-20.0, -5.0);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_lengths() {
        let nan = ScrollSpyOptions::default().with_overlay_height(f64::NAN);
        assert!(matches!(
            nan.validate(),
            Err(OptionsError::NonFinite {
                field: "overlay_height",
                ..
            })
        ));

        let negative = ScrollSpyOptions::default().with_min_width(-1.0);
        assert_eq!(
            negative.validate(),
            Err(OptionsError::Negative {
                field: "min_width",
                value: -1.0
            })
        );
    }

    #[test]
    fn rejects_zero_frame_thresholds() {
        let options = ScrollSpyOptions::default().with_idle_frames(10, 0);
        assert_eq!(
            options.validate(),
            Err(OptionsError::ZeroFrames {
                field: "override_idle_frames"
            })
        );
    }
}
