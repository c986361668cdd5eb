// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active-target state machine.

use alloc::string::String;
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::direction::{Resolution, ScanPolicy, ScrollDirection, guard_accepts};
use crate::store::{GatedStore, SubscriptionId};
use crate::{
    ClickOverride, Edges, Environment, GeometryCache, HashSync, IdleDetector, Listeners,
    OptionsError, ScrollMetrics, ScrollSpyEvent, ScrollSpyOptions, Target, ViewportGate,
};

/// The published output: which target is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveTarget {
    /// Active id, or empty when nothing is active.
    pub id: String,
    /// Position of `id` among the sorted targets, if it is one of them.
    pub index: Option<usize>,
}

/// Lifecycle state of a [`ScrollSpy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted, disposed, or without a document.
    Unmounted,
    /// The viewport is below the min-width breakpoint.
    Disabled,
    /// Waiting for the host's own scroll-to-fragment on load to come to rest.
    Settling,
    /// Following organic scrolling.
    Tracking,
    /// A click-driven navigation scroll is in flight.
    Overridden,
}

impl Phase {
    /// Listeners that must be attached while in this phase.
    #[must_use]
    pub fn listeners(self) -> Listeners {
        match self {
            Self::Unmounted => Listeners::empty(),
            Self::Disabled => Listeners::RESIZE,
            Self::Settling => Listeners::RESIZE | Listeners::HASH_CHANGE,
            Self::Tracking => Listeners::RESIZE | Listeners::HASH_CHANGE | Listeners::SCROLL,
            Self::Overridden => {
                Listeners::RESIZE | Listeners::HASH_CHANGE | Listeners::CANCEL_GESTURES
            }
        }
    }
}

/// Resolves the active target of a table of contents.
///
/// See the [crate documentation](crate) for the overall model. A `ScrollSpy`
/// is driven entirely by its owner:
///
/// 1. [`mount`](Self::mount) once the document is ready.
/// 2. Forward host input with [`handle`](Self::handle).
/// 3. Call [`set_active`](Self::set_active) when a navigation link is clicked.
/// 4. Read [`active_id`](Self::active_id) / [`active_index`](Self::active_index),
///    or [`subscribe`](Self::subscribe) to changes.
/// 5. [`dispose`](Self::dispose) to detach every listener.
#[derive(Debug)]
pub struct ScrollSpy<E> {
    env: E,
    options: ScrollSpyOptions,
    policy: ScanPolicy,
    ids: Vec<String>,
    geometry: GeometryCache,
    active: GatedStore<ActiveTarget>,
    phase: Phase,
    gate: ViewportGate,
    hash: HashSync,
    listeners: Listeners,
    frame_pending: bool,
    settle: IdleDetector,
    click: Option<ClickOverride>,
    prev_y: f64,
    idle: bool,
}

impl<E: Environment> ScrollSpy<E> {
    /// Creates an unmounted spy over `env`.
    pub fn new(env: E, options: ScrollSpyOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            env,
            policy: ScanPolicy::from_options(&options),
            ids: Vec::new(),
            geometry: GeometryCache::new(),
            active: GatedStore::new(ActiveTarget::default()),
            phase: Phase::Unmounted,
            gate: ViewportGate::new(options.min_width),
            hash: HashSync::new(options.replace_hash, options.jump_to_first),
            listeners: Listeners::empty(),
            frame_pending: false,
            settle: IdleDetector::new(options.settle_frames),
            click: None,
            prev_y: 0.0,
            idle: false,
            options,
        })
    }

    /// Creates a spy tracking `ids`.
    pub fn with_targets<I, S>(
        env: E,
        options: ScrollSpyOptions,
        ids: I,
    ) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spy = Self::new(env, options)?;
        spy.ids = ids.into_iter().map(Into::into).collect();
        Ok(spy)
    }

    /// Starts observing the environment.
    ///
    /// Resolves the targets, evaluates the viewport gate, and either waits for
    /// a fragment scroll to settle or picks the initial active target right
    /// away. Does nothing if already mounted or if the environment has no
    /// document.
    pub fn mount(&mut self) {
        if self.phase != Phase::Unmounted {
            return;
        }
        if !self.env.is_available() {
            debug!("no document available, scroll spy stays inert");
            return;
        }

        self.geometry.refresh(&self.ids, &self.env);
        self.gate.update(self.env.viewport_width());
        if self.gate.is_open() {
            // A dispose while disabled leaves the store closed.
            self.active.set_open(true);
        }
        if !self.gate.is_open() {
            self.idle = true;
            self.close_gate();
            return;
        }

        let has_hash = self
            .env
            .location_hash()
            .is_some_and(|hash| !hash.is_empty());
        if has_hash {
            self.idle = false;
            self.settle.reset();
            self.enter(Phase::Settling);
            self.request_frame();
        } else {
            self.idle = true;
            self.start_tracking();
            self.evaluate(ScrollDirection::Down, true);
        }
    }

    /// Detaches every listener and cancels pending frames.
    ///
    /// The last active target stays readable. The spy may be mounted again.
    pub fn dispose(&mut self) {
        self.cancel_frame();
        self.click = None;
        self.idle = false;
        self.enter(Phase::Unmounted);
    }

    /// Replaces the tracked ids.
    ///
    /// Order does not matter; targets are always ordered by document
    /// position. Ids without an element are ignored until a later refresh
    /// finds them.
    pub fn set_targets<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        if self.phase == Phase::Unmounted {
            return;
        }
        self.refresh();
        // Targets that mount late should still produce a highlight.
        if self.phase == Phase::Tracking && self.active.get().index.is_none() {
            self.evaluate(ScrollDirection::Down, true);
        }
    }

    /// Re-reads target geometry after a layout change the host knows about.
    pub fn refresh(&mut self) {
        if self.phase == Phase::Unmounted {
            return;
        }
        self.geometry.refresh(&self.ids, &self.env);
        let current = self.active.get();
        let index = self.geometry.index_of(&current.id);
        if index != current.index {
            let id = current.id.clone();
            self.publish(ActiveTarget { id, index });
        }
    }

    /// Processes one piece of host input.
    ///
    /// Input arriving through a listener that is not currently attached is
    /// ignored.
    pub fn handle(&mut self, event: ScrollSpyEvent) {
        if let Some(listener) = event.listener()
            && !self.listeners.contains(listener)
        {
            trace!(?event, "ignoring input for detached listener");
            return;
        }

        match event {
            ScrollSpyEvent::Frame => self.on_frame(),
            ScrollSpyEvent::Scroll => self.on_scroll(),
            ScrollSpyEvent::Resize => self.on_resize(),
            ScrollSpyEvent::HashChange => self.on_hash_change(),
            ScrollSpyEvent::Wheel
            | ScrollSpyEvent::TouchMove
            | ScrollSpyEvent::KeyDown { .. }
            | ScrollSpyEvent::PointerDown { .. } => self.on_gesture(event),
        }
    }

    /// Activates `id` on behalf of the user, typically from a link click.
    ///
    /// Organic scroll tracking is suspended until the resulting navigation
    /// scroll comes to rest or the user takes over with a gesture. Ignored
    /// while unmounted or disabled.
    pub fn set_active(&mut self, id: &str) {
        if !matches!(
            self.phase,
            Phase::Settling | Phase::Tracking | Phase::Overridden
        ) {
            return;
        }

        if self.active.get().id != id {
            let index = self.geometry.index_of(id);
            self.publish(ActiveTarget {
                id: id.into(),
                index,
            });
        }

        let origin = self.env.scroll_metrics().scroll_top;
        debug!(id, origin, "click override armed");
        self.click = Some(ClickOverride::new(origin, self.options.override_idle_frames));
        if self.phase == Phase::Settling {
            self.idle = true;
            self.settle.reset();
        }
        self.enter(Phase::Overridden);
        self.request_frame();
    }

    /// Whether `id` is the active target.
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        !id.is_empty() && self.active.get().id == id
    }

    /// Active id, or `""` when nothing is active.
    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.active.get().id
    }

    /// Position of the active id among the sorted targets.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active.get().index
    }

    /// The published id and index together.
    #[must_use]
    pub fn active(&self) -> &ActiveTarget {
        self.active.get()
    }

    /// Registers `callback` to run after every change of the active target.
    pub fn subscribe(&mut self, callback: impl FnMut(&ActiveTarget) + 'static) -> SubscriptionId {
        self.active.subscribe(callback)
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.active.unsubscribe(id)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the initial fragment scroll (if any) has settled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Whether a click-driven scroll currently owns the active target.
    #[must_use]
    pub fn is_from_click(&self) -> bool {
        self.phase == Phase::Overridden
    }

    /// Whether the viewport gate is open.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.gate.is_open()
    }

    /// Currently attached listeners.
    #[must_use]
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Resolved targets in document order.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        self.geometry.targets()
    }

    /// Targets whose top can never scroll up to the activation line.
    pub fn unreachable_targets(&self) -> impl Iterator<Item = &Target> {
        let max = self.env.scroll_metrics().max_scroll_top();
        self.geometry.unreachable(max, self.policy.down_line)
    }

    /// Options this spy was built with.
    #[must_use]
    pub fn options(&self) -> &ScrollSpyOptions {
        &self.options
    }

    /// The host environment.
    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The host environment, mutably.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "scroll spy phase change");
        }
        self.phase = phase;

        let wanted = phase.listeners();
        let removed = self.listeners.difference(wanted);
        let added = wanted.difference(self.listeners);
        if !removed.is_empty() {
            trace!(?removed, "detaching listeners");
            self.env.detach(removed);
        }
        if !added.is_empty() {
            trace!(?added, "attaching listeners");
            self.env.attach(added);
        }
        self.listeners = wanted;
    }

    fn start_tracking(&mut self) {
        self.click = None;
        self.prev_y = self.env.scroll_metrics().scroll_top;
        self.enter(Phase::Tracking);
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.env.request_frame();
        }
    }

    fn cancel_frame(&mut self) {
        if self.frame_pending {
            self.frame_pending = false;
            self.env.cancel_frame();
        }
    }

    fn on_frame(&mut self) {
        if !self.frame_pending {
            return;
        }
        self.frame_pending = false;
        let y = self.env.scroll_metrics().scroll_top;

        match self.phase {
            Phase::Settling => {
                if self.settle.sample(y) {
                    self.finish_settling();
                } else {
                    self.request_frame();
                }
            }
            Phase::Overridden => {
                let settled = match &mut self.click {
                    Some(click) => click.on_frame(y),
                    None => true,
                };
                if settled {
                    debug!(y, "click scroll came to rest");
                    self.start_tracking();
                } else {
                    self.request_frame();
                }
            }
            Phase::Unmounted | Phase::Disabled | Phase::Tracking => {}
        }
    }

    fn finish_settling(&mut self) {
        debug!("initial scroll settled");
        self.idle = true;
        self.geometry.refresh(&self.ids, &self.env);
        self.start_tracking();

        let hashed = self
            .env
            .location_hash()
            .and_then(|hash| self.geometry.index_of(&hash));
        match hashed {
            Some(index) => self.commit(Some(index)),
            None => self.evaluate(ScrollDirection::Down, true),
        }
    }

    fn on_scroll(&mut self) {
        let metrics = self.env.scroll_metrics();
        let y = metrics.scroll_top;
        if y == self.prev_y {
            return;
        }
        let direction = ScrollDirection::classify(self.prev_y, y);
        self.prev_y = y;
        trace!(y, ?direction, "scroll sample");
        self.evaluate_with(&metrics, direction, false);
    }

    fn on_resize(&mut self) {
        match self.gate.update(self.env.viewport_width()) {
            Some(false) => {
                debug!(min_width = self.gate.min_width(), "viewport below breakpoint");
                self.cancel_frame();
                self.click = None;
                self.settle.reset();
                self.idle = true;
                self.close_gate();
                return;
            }
            Some(true) => {
                debug!(min_width = self.gate.min_width(), "viewport above breakpoint");
                self.active.set_open(true);
                self.geometry.refresh(&self.ids, &self.env);
                self.idle = true;
                self.start_tracking();
                self.evaluate(ScrollDirection::Down, true);
                return;
            }
            None => {}
        }

        if self.phase == Phase::Disabled {
            return;
        }
        self.refresh();
        if self.phase == Phase::Tracking {
            self.prev_y = self.env.scroll_metrics().scroll_top;
            self.evaluate(ScrollDirection::Down, true);
        }
    }

    fn on_hash_change(&mut self) {
        let Some(hash) = self.env.location_hash() else {
            return;
        };
        if self.geometry.index_of(&hash).is_some() {
            debug!(hash = %hash, "fragment navigation");
            self.set_active(&hash);
        }
    }

    fn on_gesture(&mut self, event: ScrollSpyEvent) {
        let metrics = self.env.scroll_metrics();
        let at_edge = Edges::from_metrics(&metrics).any();
        if !ClickOverride::is_cancel(event, at_edge) {
            return;
        }
        let Some(click) = self.click.take() else {
            return;
        };

        debug!(?event, "click scroll taken over by user");
        self.cancel_frame();
        self.start_tracking();
        let direction = ScrollDirection::classify(click.origin(), metrics.scroll_top);
        self.evaluate_with(&metrics, direction, true);
    }

    fn close_gate(&mut self) {
        if self.active.set_open(false) {
            self.hash.sync(&mut self.env, "", None);
        }
        self.enter(Phase::Disabled);
    }

    fn evaluate(&mut self, direction: ScrollDirection, bypass_guard: bool) {
        let metrics = self.env.scroll_metrics();
        self.evaluate_with(&metrics, direction, bypass_guard);
    }

    fn evaluate_with(
        &mut self,
        metrics: &ScrollMetrics,
        direction: ScrollDirection,
        bypass_guard: bool,
    ) {
        if let Some(index) = self.edge_target(Edges::from_metrics(metrics)) {
            self.commit(Some(index));
            return;
        }

        let resolution = self
            .policy
            .scan(direction, self.geometry.targets(), metrics.scroll_top);
        trace!(?direction, ?resolution, bypass_guard, "directional scan");
        match resolution {
            Resolution::Clear => self.commit(None),
            Resolution::Candidate(candidate) => {
                let current = self.active.get().index;
                if bypass_guard || guard_accepts(direction, candidate, current) {
                    self.commit(candidate);
                }
            }
        }
    }

    fn edge_target(&self, edges: Edges) -> Option<usize> {
        if self.geometry.is_empty() {
            return None;
        }
        if self.policy.jump_to_first && edges.is_top {
            return Some(0);
        }
        if self.policy.jump_to_last && edges.is_bottom {
            return self.geometry.last_index();
        }
        None
    }

    fn commit(&mut self, index: Option<usize>) {
        let id = index
            .and_then(|i| self.geometry.get(i))
            .map(|target| target.id.clone())
            .unwrap_or_default();
        self.publish(ActiveTarget { id, index });
    }

    fn publish(&mut self, next: ActiveTarget) {
        if !self.active.set(next) {
            return;
        }
        let active = self.active.get();
        debug!(id = %active.id, index = ?active.index, "active target changed");
        self.hash.sync(&mut self.env, &active.id, active.index);
    }
}
