// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push-notified value holders.
//!
//! [`Observable`] is the minimal reactive primitive the scroll spy publishes
//! through: a value plus a list of callbacks invoked whenever the value
//! actually changes. UI layers bridge it into whatever reactivity system they
//! use (signals, stores, message queues).
//!
//! [`GatedStore`] decorates an [`Observable`] with an on/off gate. While the
//! gate is closed, every write stores `T::default()` instead.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_scroll_spy::store::GatedStore;
//!
//! let mut store = GatedStore::new(0_u32);
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! store.subscribe(move |v| sink.set(*v));
//!
//! store.set(7);
//! assert_eq!(seen.get(), 7);
//!
//! store.set_open(false);
//! store.set(9);
//! assert_eq!(*store.get(), 0);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// A value that notifies subscribers when it changes.
pub struct Observable<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Default + PartialEq> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq> Observable<T> {
    /// Creates an observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value`, notifying subscribers if it differs from the current one.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, callback) in &mut self.subscribers {
            callback(&self.value);
        }
        true
    }

    /// Registers `callback` to run after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// An [`Observable`] whose writes are replaced by `T::default()` while closed.
pub struct GatedStore<T> {
    inner: Observable<T>,
    open: bool,
}

impl<T: fmt::Debug> fmt::Debug for GatedStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedStore")
            .field("inner", &self.inner)
            .field("open", &self.open)
            .finish()
    }
}

impl<T: Default + PartialEq> GatedStore<T> {
    /// Creates an open store holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Observable::new(value),
            open: true,
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> &T {
        self.inner.get()
    }

    /// Whether writes pass through.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Stores `value` if open, or `T::default()` if closed.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, value: T) -> bool {
        let value = if self.open { value } else { T::default() };
        self.inner.set(value)
    }

    /// Opens or closes the gate. Closing resets the value to `T::default()`.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_open(&mut self, open: bool) -> bool {
        self.open = open;
        if open {
            false
        } else {
            self.inner.set(T::default())
        }
    }

    /// See [`Observable::subscribe`].
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.inner.subscribe(callback)
    }

    /// See [`Observable::unsubscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::{GatedStore, Observable};

    #[test]
    fn notifies_only_on_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);

        let mut value = Observable::new(1);
        value.subscribe(move |v| sink.borrow_mut().push(*v));

        assert!(!value.set(1));
        assert!(value.set(2));
        assert!(value.set(3));
        assert_eq!(*log.borrow(), [2, 3]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);

        let mut value = Observable::new(0);
        let id = value.subscribe(move |v| sink.borrow_mut().push(*v));
        value.set(1);

        assert!(value.unsubscribe(id));
        assert!(!value.unsubscribe(id));
        value.set(2);
        assert_eq!(*log.borrow(), [1]);
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn closed_gate_forces_default() {
        let mut store = GatedStore::new(5);
        assert!(store.set_open(false));
        assert_eq!(*store.get(), 0);

        assert!(!store.set(8));
        assert_eq!(*store.get(), 0);

        assert!(!store.set_open(true));
        assert!(store.set(8));
        assert_eq!(*store.get(), 8);
    }
}
