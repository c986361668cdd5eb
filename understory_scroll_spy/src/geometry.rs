// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached target geometry in content space.
//!
//! [`GeometryCache::refresh`] resolves each user-supplied id through the
//! [`Environment`], drops ids that do not resolve, and records each target's
//! top and bottom relative to the scroll root's content origin. Because the
//! offsets are content-relative, scroll samples can be resolved against the
//! cache with a single subtraction and no host queries; the cache only needs
//! refreshing when layout changes (mount, target-set change, resize).

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::Environment;

/// One trackable section.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    /// Stable identifier, matching the navigation fragment.
    pub id: String,
    /// Top edge in content space.
    pub top: f64,
    /// Bottom edge in content space.
    pub bottom: f64,
}

impl Target {
    /// Top edge relative to the root's visible top at the given scroll offset.
    #[must_use]
    pub fn top_at(&self, scroll_top: f64) -> f64 {
        self.top - scroll_top
    }

    /// Bottom edge relative to the root's visible top at the given scroll offset.
    #[must_use]
    pub fn bottom_at(&self, scroll_top: f64) -> f64 {
        self.bottom - scroll_top
    }
}

/// Targets sorted by document position, plus an id lookup.
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
}

impl GeometryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the cache from `ids` against the current layout.
    ///
    /// - Ids that do not resolve to an element are skipped; they may mount later.
    /// - Repeated ids are kept once.
    /// - The result is ordered by ascending top edge; ties keep `ids` order.
    ///
    /// Calling this twice against an unchanged layout yields identical contents.
    pub fn refresh<E>(&mut self, ids: &[String], env: &E)
    where
        E: Environment + ?Sized,
    {
        self.targets.clear();
        self.index.clear();

        let metrics = env.scroll_metrics();
        // Maps viewport coordinates to content coordinates.
        let origin = env.root_top() - metrics.scroll_top;

        for id in ids {
            if self.index.contains_key(id) {
                continue;
            }
            let Some(rect) = env.target_rect(id) else {
                continue;
            };
            self.index.insert(id.clone(), 0);
            self.targets.push(Target {
                id: id.clone(),
                top: rect.y0.min(rect.y1) - origin,
                bottom: rect.y0.max(rect.y1) - origin,
            });
        }

        self.targets.sort_by(|a, b| a.top.total_cmp(&b.top));
        for (i, target) in self.targets.iter().enumerate() {
            if let Some(slot) = self.index.get_mut(&target.id) {
                *slot = i;
            }
        }
    }

    /// Removes every target.
    pub fn clear(&mut self) {
        self.targets.clear();
        self.index.clear();
    }

    /// Sorted targets.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Number of resolved targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no target resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target at a sorted position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    /// Sorted position of `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index of the last target, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.targets.len().checked_sub(1)
    }

    /// Targets whose top edge can never reach `line` because it lies beyond
    /// the maximum scroll offset.
    ///
    /// These are the short trailing sections that only the bottom-edge
    /// short-circuit (or a click) can activate.
    pub fn unreachable(&self, max_scroll_top: f64, line: f64) -> impl Iterator<Item = &Target> {
        self.targets
            .iter()
            .filter(move |target| target.top_at(max_scroll_top) > line)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::GeometryCache;
    use crate::{Environment, Listeners, ScrollMetrics};

    struct Layout {
        sections: Vec<(&'static str, f64, f64)>,
        scroll_top: f64,
        root_top: f64,
    }

    impl Environment for Layout {
        fn scroll_metrics(&self) -> ScrollMetrics {
            ScrollMetrics {
                scroll_top: self.scroll_top,
                scroll_height: 2000.0,
                client_height: 500.0,
            }
        }

        fn root_top(&self) -> f64 {
            self.root_top
        }

        fn target_rect(&self, id: &str) -> Option<Rect> {
            let (_, top, bottom) = self.sections.iter().find(|(name, ..)| *name == id)?;
            let shift = self.root_top - self.scroll_top;
            Some(Rect::new(0.0, top + shift, 100.0, bottom + shift))
        }

        fn viewport_width(&self) -> f64 {
            1024.0
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

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn layout() -> Layout {
        Layout {
            sections: alloc::vec![("a", 0.0, 400.0), ("b", 400.0, 900.0), ("c", 900.0, 1200.0)],
            scroll_top: 0.0,
            root_top: 0.0,
        }
    }

    #[test]
    fn sorts_by_position_not_input_order() {
        let mut cache = GeometryCache::new();
        cache.refresh(&ids(&["c", "a", "b"]), &layout());

        let order: Vec<&str> = cache.targets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
        assert_eq!(cache.index_of("c"), Some(2));
    }

    #[test]
    fn missing_and_repeated_ids_are_dropped() {
        let mut cache = GeometryCache::new();
        cache.refresh(&ids(&["a", "ghost", "a", "b"]), &layout());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.index_of("ghost"), None);
        assert_eq!(cache.last_index(), Some(1));
    }

    #[test]
    fn offsets_are_content_relative_at_any_scroll() {
        let mut env = layout();
        env.scroll_top = 650.0;
        env.root_top = 40.0;

        let mut cache = GeometryCache::new();
        cache.refresh(&ids(&["a", "b", "c"]), &env);

        let b = cache.get(1).unwrap();
        assert_eq!(b.top, 400.0);
        assert_eq!(b.bottom, 900.0);
        assert_eq!(b.top_at(650.0), -250.0);
    }

    #[test]
    fn refresh_is_idempotent() {
        let env = layout();
        let mut cache = GeometryCache::new();
        cache.refresh(&ids(&["b", "c", "a"]), &env);
        let first = cache.targets().to_vec();

        cache.refresh(&ids(&["b", "c", "a"]), &env);
        assert_eq!(cache.targets(), first.as_slice());
        assert_eq!(cache.index_of("a"), Some(0));
    }

    #[test]
    fn unreachable_lists_short_trailing_sections() {
        let mut cache = GeometryCache::new();
        cache.refresh(&ids(&["a", "b", "c"]), &layout());

        // Max scroll 700: "c" (top 900) stays 200px below a 5px line.
        let names: Vec<&str> = cache
            .unreachable(700.0, 5.0)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(names, ["c"]);
    }
}
