//! Keyboard focus confinement for modal dialogs.
//!
//! # Design
//! The trap is a small state machine that knows nothing about a concrete DOM.
//! A `FocusHost` answers "what is focused", "what can take focus inside this
//! container", and moves focus on request. The UI layer forwards key presses
//! to `handle_key` and applies the returned `KeyOutcome` to the native event.
//!
//! Activation is two-step. `activate` remembers the element that had focus,
//! then `on_render_committed` (called once the UI has mounted the dialog)
//! moves focus inside and starts key handling. Dropping the trap deactivates
//! it, which hands focus back to the remembered element.

use std::rc::Rc;

/// CSS selector a DOM host should use for `FocusHost::focusable_within`.
pub const FOCUSABLE_SELECTOR: &str = "button:not([disabled]), [href], input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Element categories the trap cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    Input,
    Select,
    TextArea,
    Other,
}

/// The attributes that decide whether an element can take keyboard focus.
/// Mirrors `FOCUSABLE_SELECTOR` for hosts without a selector engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    pub kind: ElementKind,
    pub disabled: bool,
    pub has_href: bool,
    pub tab_index: Option<i32>,
}

impl ElementInfo {
    pub fn is_focusable(&self) -> bool {
        if self.tab_index.is_some_and(|index| index >= 0) || self.has_href {
            return true;
        }
        match self.kind {
            ElementKind::Button | ElementKind::Input | ElementKind::Select | ElementKind::TextArea => {
                !self.disabled
            }
            ElementKind::Link | ElementKind::Other => false,
        }
    }
}

/// Document access the trap needs. Methods take `&self`; hosts wrap their
/// document handle, which is interior-mutable anyway.
pub trait FocusHost {
    type Element: Clone + PartialEq;

    /// Element that currently has focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    fn focus(&self, element: &Self::Element);

    /// Focusable descendants of `container` in document order.
    fn focusable_within(&self, container: &Self::Element) -> Vec<Self::Element>;

    /// Whether `element` is `container` or one of its descendants.
    fn contains(&self, container: &Self::Element, element: &Self::Element) -> bool;

    /// Whether `element` is still part of the document.
    fn is_attached(&self, element: &Self::Element) -> bool;

    fn kind(&self, element: &Self::Element) -> ElementKind;
}

impl<H: FocusHost> FocusHost for Rc<H> {
    type Element = H::Element;

    fn active_element(&self) -> Option<Self::Element> {
        (**self).active_element()
    }

    fn focus(&self, element: &Self::Element) {
        (**self).focus(element)
    }

    fn focusable_within(&self, container: &Self::Element) -> Vec<Self::Element> {
        (**self).focusable_within(container)
    }

    fn contains(&self, container: &Self::Element, element: &Self::Element) -> bool {
        (**self).contains(container, element)
    }

    fn is_attached(&self, element: &Self::Element) -> bool {
        (**self).is_attached(element)
    }

    fn kind(&self, element: &Self::Element) -> ElementKind {
        (**self).kind(element)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// What the UI layer should do with the native key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the browser handle the key.
    PassThrough,
    /// Call `preventDefault()`; the trap already acted.
    PreventDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Inactive,
    /// Activated, waiting for the container to be rendered.
    Pending,
    Active,
}

type EscapeHandler = Box<dyn FnMut()>;
type EnterHandler<E> = Box<dyn FnMut(&E)>;

pub struct FocusTrap<H: FocusHost> {
    host: H,
    container: Option<H::Element>,
    initial_focus: Option<H::Element>,
    on_escape: Option<EscapeHandler>,
    on_enter: Option<EnterHandler<H::Element>>,
    last_focused: Option<H::Element>,
    phase: Phase,
}

impl<H: FocusHost> FocusTrap<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            container: None,
            initial_focus: None,
            on_escape: None,
            on_enter: None,
            last_focused: None,
            phase: Phase::Inactive,
        }
    }

    pub fn on_escape(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_escape = Some(Box::new(handler));
        self
    }

    /// Called with the focused element when Enter is pressed outside a
    /// textarea or button.
    pub fn on_enter(mut self, handler: impl FnMut(&H::Element) + 'static) -> Self {
        self.on_enter = Some(Box::new(handler));
        self
    }

    /// Bind (or unbind, on unmount) the element focus is confined to.
    pub fn set_container(&mut self, container: Option<H::Element>) {
        self.container = container;
    }

    /// Element to focus on activation instead of the first focusable one.
    pub fn set_initial_focus(&mut self, element: Option<H::Element>) {
        self.initial_focus = element;
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Inactive
    }

    pub fn activate(&mut self) {
        if self.phase != Phase::Inactive {
            return;
        }
        self.last_focused = self.host.active_element();
        self.phase = Phase::Pending;
    }

    /// Move focus into the container once it is on screen. Does nothing unless
    /// an activation is pending and a container is bound.
    pub fn on_render_committed(&mut self) {
        if self.phase != Phase::Pending {
            return;
        }
        let Some(container) = self.container.clone() else {
            tracing::debug!("focus trap activated without a mounted container");
            return;
        };
        let target = self
            .initial_focus
            .clone()
            .or_else(|| self.host.focusable_within(&container).into_iter().next())
            .unwrap_or(container);
        self.host.focus(&target);
        self.phase = Phase::Active;
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyOutcome {
        if self.phase != Phase::Active {
            return KeyOutcome::PassThrough;
        }
        let Some(container) = self.container.clone() else {
            return KeyOutcome::PassThrough;
        };

        match press.key {
            Key::Escape => match self.on_escape.as_mut() {
                Some(handler) => {
                    handler();
                    KeyOutcome::PreventDefault
                }
                None => KeyOutcome::PassThrough,
            },
            Key::Enter => self.handle_enter(),
            Key::Tab => self.handle_tab(&container, press.shift),
            Key::Other => KeyOutcome::PassThrough,
        }
    }

    pub fn deactivate(&mut self) {
        if self.phase == Phase::Inactive {
            return;
        }
        self.phase = Phase::Inactive;
        if let Some(previous) = self.last_focused.take() {
            if self.host.is_attached(&previous) {
                self.host.focus(&previous);
            }
        }
    }

    fn handle_enter(&mut self) -> KeyOutcome {
        let Some(handler) = self.on_enter.as_mut() else {
            return KeyOutcome::PassThrough;
        };
        let Some(active) = self.host.active_element() else {
            return KeyOutcome::PassThrough;
        };
        match self.host.kind(&active) {
            ElementKind::TextArea | ElementKind::Button => KeyOutcome::PassThrough,
            _ => {
                handler(&active);
                KeyOutcome::PreventDefault
            }
        }
    }

    fn handle_tab(&self, container: &H::Element, backwards: bool) -> KeyOutcome {
        let focusable = self.host.focusable_within(container);
        let (Some(first), Some(last)) = (focusable.first(), focusable.last()) else {
            return KeyOutcome::PassThrough;
        };

        let active = self.host.active_element();
        let inside = active
            .as_ref()
            .is_some_and(|element| self.host.contains(container, element));
        if !inside {
            self.host.focus(first);
            return KeyOutcome::PreventDefault;
        }

        let wrap_to = match (backwards, active.as_ref()) {
            (true, Some(element)) if element == first => last,
            (false, Some(element)) if element == last => first,
            _ => return KeyOutcome::PassThrough,
        };
        self.host.focus(wrap_to);
        KeyOutcome::PreventDefault
    }
}

impl<H: FocusHost> Drop for FocusTrap<H> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
