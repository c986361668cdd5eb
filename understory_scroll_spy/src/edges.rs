// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top/bottom boundary detection for the scroll root, including overscroll.

use crate::ScrollMetrics;

/// Scroll offsets at or below this count as "at the top".
///
/// Absorbs sub-pixel rendering and restored scroll positions.
pub const TOP_EDGE_TOLERANCE: f64 = 10.0;

/// Maximum distance from the maximum scroll offset that counts as "at the bottom".
pub const BOTTOM_EDGE_TOLERANCE: f64 = 1.0;

/// Whether the scroll root sits at either boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    /// At (or rubber-banding past) the top.
    pub is_top: bool,
    /// At (or rubber-banding past) the bottom.
    pub is_bottom: bool,
}

impl Edges {
    /// Classifies the given metrics.
    ///
    /// Content shorter than the root is both at the top and at the bottom.
    #[must_use]
    pub fn from_metrics(metrics: &ScrollMetrics) -> Self {
        let top = metrics.scroll_top;
        let max = metrics.scroll_height - metrics.client_height;

        Self {
            // Negative offsets (rubber-band overscroll) fall under the tolerance too.
            is_top: top <= TOP_EDGE_TOLERANCE,
            is_bottom: (max - top).abs() <= BOTTOM_EDGE_TOLERANCE || top > max,
        }
    }

    /// Returns `true` at either boundary.
    #[must_use]
    pub fn any(self) -> bool {
        self.is_top || self.is_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::Edges;
    use crate::ScrollMetrics;

    fn at(scroll_top: f64) -> Edges {
        Edges::from_metrics(&ScrollMetrics {
            scroll_top,
            scroll_height: 3000.0,
            client_height: 1000.0,
        })
    }

    #[test]
    fn top_tolerance_and_overscroll() {
        assert!(at(0.0).is_top);
        assert!(at(10.0).is_top);
        assert!(!at(10.5).is_top);
        assert!(at(-40.0).is_top);
    }

    #[test]
    fn bottom_tolerance_and_overscroll() {
        assert!(at(2000.0).is_bottom);
        assert!(at(1999.2).is_bottom);
        assert!(!at(1998.0).is_bottom);
        assert!(at(2060.0).is_bottom);
    }

    #[test]
    fn middle_is_neither() {
        let edges = at(900.0);
        assert!(!edges.any());
    }

    #[test]
    fn short_content_is_both() {
        let edges = Edges::from_metrics(&ScrollMetrics {
            scroll_top: 0.0,
            scroll_height: 600.0,
            client_height: 1000.0,
        });
        assert!(edges.is_top);
        assert!(edges.is_bottom);
    }
}
