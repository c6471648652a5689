//! DOM event system.
//!
//! Listeners accumulate per `(node, kind)` and fire in registration order.
//! Dispatch runs the target's listeners first, then walks up the ancestor
//! chain for bubbling kinds. Listener lists are snapshotted before any
//! callback runs, and no document borrow is held across a callback — a
//! listener is free to mutate the document through its own handles.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::node::NodeId;
use crate::tree::SharedDocument;

// ---------------------------------------------------------------------------
// Event kinds and payload categories
// ---------------------------------------------------------------------------

/// The events the platform knows how to deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DoubleClick,
    PointerDown,
    PointerUp,
    PointerMove,
    KeyDown,
    KeyUp,
    Input,
    Change,
    Focus,
    Blur,
}

/// Payload category an [`EventKind`] is associated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventCategory {
    Pointer,
    Keyboard,
    General,
}

impl EventKind {
    /// Platform-level event name.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DoubleClick => "dblclick",
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerUp => "pointerup",
            EventKind::PointerMove => "pointermove",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
        }
    }

    /// The payload shape events of this kind carry.
    pub fn category(self) -> EventCategory {
        match self {
            EventKind::Click
            | EventKind::DoubleClick
            | EventKind::PointerDown
            | EventKind::PointerUp
            | EventKind::PointerMove => EventCategory::Pointer,
            EventKind::KeyDown | EventKind::KeyUp => EventCategory::Keyboard,
            EventKind::Input | EventKind::Change | EventKind::Focus | EventKind::Blur => {
                EventCategory::General
            }
        }
    }

    /// Whether events of this kind travel up the ancestor chain.
    pub fn bubbles_by_default(self) -> bool {
        !matches!(self, EventKind::Focus | EventKind::Blur)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

bitflags! {
    /// Modifier keys held while a keyboard event fired.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const CTRL  = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

/// Data carried by pointer events.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerData {
    pub x: f64,
    pub y: f64,
    pub button: u8,
}

/// Data carried by keyboard events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyData {
    pub key: String,
    pub modifiers: Modifiers,
}

/// Category-specific event data.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    Pointer(PointerData),
    Keyboard(KeyData),
    General,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An event travelling through the tree.
#[derive(Clone, Debug)]
pub struct Event {
    pub kind: EventKind,
    pub payload: EventPayload,

    /// The node the event was originally dispatched on.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently being invoked.
    pub current_target: Option<NodeId>,

    pub bubbles: bool,
    pub cancelable: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl Event {
    fn with_payload(kind: EventKind, payload: EventPayload) -> Self {
        Self {
            kind,
            payload,
            target: None,
            current_target: None,
            bubbles: kind.bubbles_by_default(),
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A pointer-category event.
    pub fn pointer(kind: EventKind, data: PointerData) -> Self {
        Self::with_payload(kind, EventPayload::Pointer(data))
    }

    /// A keyboard-category event.
    pub fn keyboard(kind: EventKind, data: KeyData) -> Self {
        Self::with_payload(kind, EventPayload::Keyboard(data))
    }

    /// An event with no category-specific data.
    pub fn general(kind: EventKind) -> Self {
        Self::with_payload(kind, EventPayload::General)
    }

    /// Pointer data, if this is a pointer-category event.
    pub fn pointer_data(&self) -> Option<&PointerData> {
        match &self.payload {
            EventPayload::Pointer(data) => Some(data),
            _ => None,
        }
    }

    /// Keyboard data, if this is a keyboard-category event.
    pub fn keyboard_data(&self) -> Option<&KeyData> {
        match &self.payload {
            EventPayload::Keyboard(data) => Some(data),
            _ => None,
        }
    }

    /// Prevent the platform's default action for this event.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop the event from propagating to ancestor nodes. Listeners on the
    /// current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// A registered event callback. `Clone` so the dispatch loop can snapshot
/// listener lists before invoking anything.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&mut Event)>);

impl Listener {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        Self(Rc::new(action))
    }

    pub fn invoke(&self, event: &mut Event) {
        (self.0)(event);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventTargets (lives inside the Document)
// ---------------------------------------------------------------------------

/// Listener table for every node that has at least one registration.
#[derive(Debug, Default)]
pub struct EventTargets {
    listeners: FxHashMap<NodeId, Vec<(EventKind, Listener)>>,
}

impl EventTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: NodeId, kind: EventKind, listener: Listener) {
        self.listeners.entry(node).or_default().push((kind, listener));
    }

    /// Snapshot of the listeners on `node` matching `kind`, in registration
    /// order.
    pub fn matching(&self, node: NodeId, kind: EventKind) -> Vec<Listener> {
        self.listeners
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, l)| l.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Dispatch `event` at `target`: target's listeners first, then each
/// ancestor's in turn when the event bubbles.
///
/// Returns `true` if the default action was *not* prevented.
pub fn dispatch(doc: &SharedDocument, target: NodeId, event: &mut Event) -> bool {
    event.target = Some(target);

    let mut path = vec![target];
    if event.bubbles {
        path.extend(doc.borrow().ancestors(target));
    }

    for node in path {
        if event.propagation_stopped {
            break;
        }
        event.current_target = Some(node);
        // Snapshot, then invoke with no borrow held.
        let listeners = doc.borrow().listeners_for(node, event.kind);
        for listener in &listeners {
            listener.invoke(event);
        }
    }

    event.current_target = None;
    !event.default_prevented
}

// ===========================================================================
// Tests
// ===========================================================================
