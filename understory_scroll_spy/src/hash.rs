// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mirrors the active id into the URL fragment.

use crate::Environment;

/// URL fragment synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashSync {
    enabled: bool,
    jump_to_first: bool,
}

impl HashSync {
    /// Creates a synchronizer.
    ///
    /// With `jump_to_first`, the first target is the page's resting state and
    /// does not carry a visible fragment.
    #[must_use]
    pub fn new(enabled: bool, jump_to_first: bool) -> Self {
        Self {
            enabled,
            jump_to_first,
        }
    }

    /// Whether the URL is written at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The fragment that should be shown for an active `id` at `index`.
    #[must_use]
    pub fn fragment<'a>(&self, id: &'a str, index: Option<usize>) -> Option<&'a str> {
        let boundary = usize::from(self.jump_to_first);
        match index {
            Some(i) if i >= boundary => Some(id),
            _ => None,
        }
    }

    /// Writes the fragment for the new active target through `env`.
    pub fn sync<E>(&self, env: &mut E, id: &str, index: Option<usize>)
    where
        E: Environment + ?Sized,
    {
        if !self.enabled {
            return;
        }
        let fragment = self.fragment(id, index);
        tracing::trace!(?fragment, "replacing location hash");
        env.replace_hash(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::HashSync;

    #[test]
    fn first_target_has_no_fragment_when_jumping() {
        let sync = HashSync::new(true, true);
        assert_eq!(sync.fragment("intro", Some(0)), None);
        assert_eq!(sync.fragment("usage", Some(1)), Some("usage"));
        assert_eq!(sync.fragment("", None), None);
    }

    #[test]
    fn first_target_keeps_fragment_without_jumping() {
        let sync = HashSync::new(true, false);
        assert_eq!(sync.fragment("intro", Some(0)), Some("intro"));
        assert_eq!(sync.fragment("", None), None);
    }
}
