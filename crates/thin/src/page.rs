//! Page - the host context
//!
//! One document, one event system, one ready queue. The page stands in for
//! the browser: embedders drive it by dispatching events and advancing the
//! document lifecycle, and the utility surface reacts.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use thin_dom::{Document, NodeId, ReadyState};
use thin_events::{BackendKind, Event, EventSystem, Handler, ListenerBackend};

use crate::handle::{ElementSet, Selection};
use crate::ready::ReadyQueue;

pub(crate) struct PageInner {
    document: RefCell<Document>,
    events: RefCell<EventSystem>,
    backend: Box<dyn ListenerBackend>,
    kind: BackendKind,
    ready: RefCell<ReadyQueue>,
}

/// Shared handle to a page. Clones are cheap and alias the same state;
/// everything is single-threaded.
#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

/// Non-owning page reference for handlers stored inside the page itself
#[derive(Clone)]
pub struct WeakPage {
    inner: Weak<PageInner>,
}

impl WeakPage {
    pub fn upgrade(&self) -> Option<Page> {
        self.inner.upgrade().map(|inner| Page { inner })
    }
}

impl Page {
    /// Wrap a document with the standard listener backend
    pub fn new(document: Document) -> Self {
        Self::with_backend(document, BackendKind::Standard)
    }

    /// Wrap a document, selecting the listener backend once for the life
    /// of the page
    pub fn with_backend(document: Document, kind: BackendKind) -> Self {
        let page = Page {
            inner: Rc::new(PageInner {
                document: RefCell::new(document),
                events: RefCell::new(EventSystem::new()),
                backend: kind.create(),
                kind,
                ready: RefCell::new(ReadyQueue::new()),
            }),
        };
        page.wire_ready_signals();
        page
    }

    /// Parse HTML and wrap the result; the document starts in Loading
    pub fn from_html(html: &str) -> Self {
        Self::new(thin_html::parse(html))
    }

    pub fn downgrade(&self) -> WeakPage {
        WeakPage {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// The document, immutably
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// The document, mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// The listener backend this page was built with
    pub fn backend_kind(&self) -> BackendKind {
        self.inner.kind
    }

    /// Resolve a selection into an element set.
    ///
    /// Accepts a CSS selector string, a single node, a node list, or an
    /// existing set (re-wrapping). Zero matches are a valid, silent result.
    pub fn select(&self, target: impl Into<Selection>) -> ElementSet {
        ElementSet::resolve(self, target.into())
    }

    /// Register a document-ready callback.
    ///
    /// If the document already reports Complete (or the queue has drained),
    /// the callback runs synchronously before this returns; otherwise it is
    /// queued FIFO for the ready signal.
    pub fn ready(&self, callback: impl FnOnce() + 'static) {
        let run_now = {
            let complete = self.document().ready_state() == ReadyState::Complete;
            self.inner
                .ready
                .borrow_mut()
                .offer(complete, Box::new(callback))
        };
        if let Some(cb) = run_now {
            cb();
        }
    }

    pub(crate) fn add_listener(&self, node: NodeId, name: &str, handler: Handler) {
        let mut events = self.inner.events.borrow_mut();
        self.inner.backend.add_listener(&mut events, node, name, handler);
    }

    /// Synthesize a bubbling event on `target` and dispatch it.
    /// Returns the event so callers can inspect propagation state.
    pub fn dispatch(&self, name: &str, target: NodeId) -> Event {
        let mut event = Event::new(name, target);
        self.dispatch_event(&mut event);
        event
    }

    /// Dispatch a prepared event through the tree
    pub fn dispatch_event(&self, event: &mut Event) {
        let path = {
            let doc = self.document();
            EventSystem::propagation_path(doc.tree(), event)
        };
        EventSystem::dispatch(&self.inner.events, &path, event, self.inner.backend.as_ref());
    }

    /// Advance the document lifecycle and fire the matching host signal:
    /// Interactive dispatches "DOMContentLoaded" on the document node,
    /// Complete dispatches "load". Regressions are ignored.
    pub fn advance_ready_state(&self, state: ReadyState) {
        let changed = self.document_mut().advance_ready_state(state);
        if !changed {
            return;
        }
        let root = self.document().tree().root();
        match state {
            ReadyState::Loading => {}
            ReadyState::Interactive => {
                self.dispatch("DOMContentLoaded", root);
            }
            ReadyState::Complete => {
                let mut event = Event::non_bubbling("load", root);
                self.dispatch_event(&mut event);
            }
        }
    }

    /// Drain the ready queue in FIFO order. Idempotent: repeated signals
    /// find the queue already empty.
    pub fn fire_ready(&self) {
        let pending = self.inner.ready.borrow_mut().take_pending();
        for cb in pending {
            cb();
        }
    }

    /// Whether the ready queue has drained
    pub fn ready_fired(&self) -> bool {
        self.inner.ready.borrow().is_fired()
    }

    // The queue drains on the first of: content-loaded (when the backend
    // has one), the load backstop, or the polling fallback in ready.rs.
    fn wire_ready_signals(&self) {
        let root = self.document().tree().root();

        if self.inner.kind.has_content_loaded() {
            let weak = self.downgrade();
            self.add_listener(
                root,
                "DOMContentLoaded",
                thin_events::handler(move |_receiver, _event| {
                    if let Some(page) = weak.upgrade() {
                        page.fire_ready();
                    }
                }),
            );
        }

        let weak = self.downgrade();
        self.add_listener(
            root,
            "load",
            thin_events::handler(move |_receiver, _event| {
                if let Some(page) = weak.upgrade() {
                    page.fire_ready();
                }
            }),
        );
    }
}
