// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use core::cell::RefCell;
use core::fmt;

use js_sys::Function;
use kurbo::Rect;
use tracing::{debug, warn};
use understory_scroll_spy::{
    ActiveTarget, Environment, Listeners, OptionsError, Phase, ScrollMetrics, ScrollSpy,
    ScrollSpyEvent, ScrollSpyOptions, SubscriptionId,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, KeyboardEvent, Window,
};

type SharedSpy = Rc<RefCell<ScrollSpy<DomEnvironment>>>;

/// DOM event name per listener, and whether it binds to the scroll root
/// (`true`) or to the window.
const BINDINGS: [(Listeners, &str, bool); 8] = [
    (Listeners::SCROLL, "scroll", true),
    (Listeners::RESIZE, "resize", false),
    (Listeners::WHEEL, "wheel", true),
    (Listeners::TOUCH_MOVE, "touchmove", true),
    (Listeners::KEY_DOWN, "keydown", false),
    (Listeners::POINTER_DOWN, "pointerdown", true),
    (Listeners::HASH_CHANGE, "hashchange", false),
    (Listeners::HASH_CHANGE, "popstate", false),
];

struct Dom {
    window: Window,
    document: Document,
    root: Option<Element>,
    touch: bool,
}

impl Dom {
    /// Touch devices report scroll gestures as `touchmove`, others as `wheel`.
    fn binds(&self, listener: Listeners) -> bool {
        if listener == Listeners::WHEEL {
            !self.touch
        } else if listener == Listeners::TOUCH_MOVE {
            self.touch
        } else {
            true
        }
    }

    fn scroll_element(&self) -> Option<Element> {
        self.root
            .clone()
            .or_else(|| self.document.scrolling_element())
    }

    fn event_target(&self, on_root: bool) -> &EventTarget {
        match (&self.root, on_root) {
            (Some(root), true) => root.unchecked_ref(),
            _ => self.window.unchecked_ref(),
        }
    }
}

/// JS callbacks forwarding DOM input into a shared spy.
struct Handlers {
    scroll: Closure<dyn FnMut()>,
    resize: Closure<dyn FnMut()>,
    wheel: Closure<dyn FnMut()>,
    touch_move: Closure<dyn FnMut()>,
    key_down: Closure<dyn FnMut(Event)>,
    pointer_down: Closure<dyn FnMut(Event)>,
    hash_change: Closure<dyn FnMut()>,
    frame: Closure<dyn FnMut(f64)>,
}

impl Handlers {
    fn new(spy: &Weak<RefCell<ScrollSpy<DomEnvironment>>>) -> Self {
        let simple = |event: ScrollSpyEvent| {
            let spy = spy.clone();
            Closure::wrap(Box::new(move || dispatch(&spy, event)) as Box<dyn FnMut()>)
        };

        let key_down = {
            let spy = spy.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let space = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|key| key.code() == "Space");
                dispatch(&spy, ScrollSpyEvent::KeyDown { space });
            }) as Box<dyn FnMut(Event)>)
        };

        let pointer_down = {
            let spy = spy.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let on_link = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|element| element.closest("a").ok().flatten())
                    .is_some();
                dispatch(&spy, ScrollSpyEvent::PointerDown { on_link });
            }) as Box<dyn FnMut(Event)>)
        };

        let frame = {
            let spy = spy.clone();
            Closure::wrap(Box::new(move |_timestamp: f64| {
                let Some(shared) = spy.upgrade() else {
                    return;
                };
                let Ok(mut spy) = shared.try_borrow_mut() else {
                    return;
                };
                spy.env_mut().frame = None;
                spy.handle(ScrollSpyEvent::Frame);
            }) as Box<dyn FnMut(f64)>)
        };

        Self {
            scroll: simple(ScrollSpyEvent::Scroll),
            resize: simple(ScrollSpyEvent::Resize),
            wheel: simple(ScrollSpyEvent::Wheel),
            touch_move: simple(ScrollSpyEvent::TouchMove),
            key_down,
            pointer_down,
            hash_change: simple(ScrollSpyEvent::HashChange),
            frame,
        }
    }

    fn callback(&self, listener: Listeners) -> &Function {
        let value: &JsValue = if listener == Listeners::SCROLL {
            self.scroll.as_ref()
        } else if listener == Listeners::RESIZE {
            self.resize.as_ref()
        } else if listener == Listeners::WHEEL {
            self.wheel.as_ref()
        } else if listener == Listeners::TOUCH_MOVE {
            self.touch_move.as_ref()
        } else if listener == Listeners::KEY_DOWN {
            self.key_down.as_ref()
        } else if listener == Listeners::POINTER_DOWN {
            self.pointer_down.as_ref()
        } else {
            self.hash_change.as_ref()
        };
        value.unchecked_ref()
    }
}

fn dispatch(spy: &Weak<RefCell<ScrollSpy<DomEnvironment>>>, event: ScrollSpyEvent) {
    let Some(shared) = spy.upgrade() else {
        return;
    };
    let Ok(mut spy) = shared.try_borrow_mut() else {
        debug!(?event, "scroll spy busy, dropping input");
        return;
    };
    spy.handle(event);
}

/// [`Environment`] backed by the browser DOM.
///
/// Created and wired by [`WebScrollSpy::new`].
pub struct DomEnvironment {
    dom: Option<Dom>,
    handlers: Option<Handlers>,
    frame: Option<i32>,
}

impl fmt::Debug for DomEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomEnvironment")
            .field("available", &self.dom.is_some())
            .field("root", &self.dom.as_ref().and_then(|dom| dom.root.as_ref()))
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl DomEnvironment {
    fn new(root: Option<Element>) -> Self {
        let dom = web_sys::window().and_then(|window| {
            let document = window.document()?;
            let touch = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart"))
                .unwrap_or(false);
            Some(Dom {
                window,
                document,
                root,
                touch,
            })
        });
        if dom.is_none() {
            debug!("no window or document, scroll spy will stay inert");
        }
        Self {
            dom,
            handlers: None,
            frame: None,
        }
    }

    /// The element being tracked, or `None` for the document scroller.
    #[must_use]
    pub fn root(&self) -> Option<&Element> {
        self.dom.as_ref().and_then(|dom| dom.root.as_ref())
    }

    fn wired(&self) -> Option<(&Dom, &Handlers)> {
        Some((self.dom.as_ref()?, self.handlers.as_ref()?))
    }
}

impl Environment for DomEnvironment {
    fn is_available(&self) -> bool {
        self.wired().is_some()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let Some(dom) = &self.dom else {
            return ScrollMetrics::default();
        };
        let Some(element) = dom.scroll_element() else {
            return ScrollMetrics::default();
        };
        let scroll_top = if dom.root.is_some() {
            f64::from(element.scroll_top())
        } else {
            // Keeps rubber-band overscroll, which the scrolling element clamps.
            dom.window
                .scroll_y()
                .unwrap_or_else(|_| f64::from(element.scroll_top()))
        };
        ScrollMetrics {
            scroll_top,
            scroll_height: f64::from(element.scroll_height()),
            client_height: f64::from(element.client_height()),
        }
    }

    fn root_top(&self) -> f64 {
        self.root()
            .map_or(0.0, |root| root.get_bounding_client_rect().top())
    }

    fn target_rect(&self, id: &str) -> Option<Rect> {
        let element = self.dom.as_ref()?.document.get_element_by_id(id)?;
        let rect = element.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom()))
    }

    fn viewport_width(&self) -> f64 {
        self.dom
            .as_ref()
            .and_then(|dom| dom.window.inner_width().ok())
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn location_hash(&self) -> Option<String> {
        let raw = self.dom.as_ref()?.window.location().hash().ok()?;
        let fragment = raw.strip_prefix('#').unwrap_or(&raw);
        if fragment.is_empty() {
            return None;
        }
        Some(
            js_sys::decode_uri_component(fragment)
                .map(String::from)
                .unwrap_or_else(|_| fragment.to_string()),
        )
    }

    fn replace_hash(&mut self, fragment: Option<&str>) {
        let Some(dom) = &self.dom else {
            return;
        };
        let location = dom.window.location();
        let url = match fragment {
            Some(id) => format!("#{}", String::from(js_sys::encode_uri_component(id))),
            None => {
                let path = location.pathname().unwrap_or_default();
                let search = location.search().unwrap_or_default();
                format!("{path}{search}")
            }
        };
        let Ok(history) = dom.window.history() else {
            return;
        };
        let state = history.state().unwrap_or(JsValue::NULL);
        if let Err(err) = history.replace_state_with_url(&state, "", Some(&url)) {
            warn!(?err, %url, "history.replaceState failed");
        }
    }

    fn attach(&mut self, listeners: Listeners) {
        let Some((dom, handlers)) = self.wired() else {
            return;
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        for (listener, name, on_root) in BINDINGS {
            if !listeners.contains(listener) || !dom.binds(listener) {
                continue;
            }
            let result = dom
                .event_target(on_root)
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    handlers.callback(listener),
                    &options,
                );
            if let Err(err) = result {
                warn!(?err, name, "addEventListener failed");
            }
        }
    }

    fn detach(&mut self, listeners: Listeners) {
        let Some((dom, handlers)) = self.wired() else {
            return;
        };
        for (listener, name, on_root) in BINDINGS {
            if !listeners.contains(listener) || !dom.binds(listener) {
                continue;
            }
            let result = dom
                .event_target(on_root)
                .remove_event_listener_with_callback(name, handlers.callback(listener));
            if let Err(err) = result {
                warn!(?err, name, "removeEventListener failed");
            }
        }
    }

    fn request_frame(&mut self) {
        let Some((dom, handlers)) = self.wired() else {
            return;
        };
        match dom
            .window
            .request_animation_frame(handlers.frame.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame = Some(handle),
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
    }

    fn cancel_frame(&mut self) {
        let Some(handle) = self.frame.take() else {
            return;
        };
        if let Some(dom) = &self.dom
            && let Err(err) = dom.window.cancel_animation_frame(handle)
        {
            warn!(?err, "cancelAnimationFrame failed");
        }
    }
}

/// A [`ScrollSpy`] wired to the DOM.
///
/// Methods borrow the shared spy; calling them from inside a
/// [`subscribe`](Self::subscribe) callback panics.
pub struct WebScrollSpy {
    spy: SharedSpy,
}

impl fmt::Debug for WebScrollSpy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebScrollSpy")
            .field("spy", &self.spy.try_borrow().ok())
            .finish()
    }
}

impl WebScrollSpy {
    /// Creates an unmounted spy over `root` (or the document scroller).
    pub fn new<I, S>(
        root: Option<Element>,
        options: ScrollSpyOptions,
        ids: I,
    ) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let env = DomEnvironment::new(root);
        let spy = Rc::new(RefCell::new(ScrollSpy::with_targets(env, options, ids)?));
        let handlers = Handlers::new(&Rc::downgrade(&spy));
        spy.borrow_mut().env_mut().handlers = Some(handlers);
        Ok(Self { spy })
    }

    /// See [`ScrollSpy::mount`].
    pub fn mount(&self) {
        self.spy.borrow_mut().mount();
    }

    /// See [`ScrollSpy::dispose`].
    pub fn dispose(&self) {
        self.spy.borrow_mut().dispose();
    }

    /// See [`ScrollSpy::set_targets`].
    pub fn set_targets<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spy.borrow_mut().set_targets(ids);
    }

    /// See [`ScrollSpy::refresh`].
    pub fn refresh(&self) {
        self.spy.borrow_mut().refresh();
    }

    /// See [`ScrollSpy::set_active`].
    pub fn set_active(&self, id: &str) {
        self.spy.borrow_mut().set_active(id);
    }

    /// See [`ScrollSpy::is_active`].
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.spy.borrow().is_active(id)
    }

    /// See [`ScrollSpy::active`].
    #[must_use]
    pub fn active(&self) -> ActiveTarget {
        self.spy.borrow().active().clone()
    }

    /// See [`ScrollSpy::active_id`].
    #[must_use]
    pub fn active_id(&self) -> String {
        self.spy.borrow().active_id().to_string()
    }

    /// See [`ScrollSpy::active_index`].
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.spy.borrow().active_index()
    }

    /// See [`ScrollSpy::phase`].
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.spy.borrow().phase()
    }

    /// See [`ScrollSpy::is_from_click`].
    #[must_use]
    pub fn is_from_click(&self) -> bool {
        self.spy.borrow().is_from_click()
    }

    /// See [`ScrollSpy::is_idle`].
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.spy.borrow().is_idle()
    }

    /// See [`ScrollSpy::subscribe`].
    pub fn subscribe(&self, callback: impl FnMut(&ActiveTarget) + 'static) -> SubscriptionId {
        self.spy.borrow_mut().subscribe(callback)
    }

    /// See [`ScrollSpy::unsubscribe`].
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.spy.borrow_mut().unsubscribe(id)
    }

    /// Runs `f` with the underlying spy.
    pub fn with<R>(&self, f: impl FnOnce(&ScrollSpy<DomEnvironment>) -> R) -> R {
        f(&self.spy.borrow())
    }
}

impl Drop for WebScrollSpy {
    fn drop(&mut self) {
        // Registered closures must not outlive the handlers that own them.
        match self.spy.try_borrow_mut() {
            Ok(mut spy) => spy.dispose(),
            Err(_) => warn!(
                "scroll spy dropped from inside one of its own callbacks, DOM listeners stay registered"
            ),
        }
    }
}
