//! Ready signaling
//!
//! A FIFO queue of callbacks drained exactly once when the document
//! becomes usable. Three signals can drain it, first one wins: the
//! content-loaded event, the polling fallback below, or the load backstop.
//! The queue itself only knows Pending and Fired; the wiring lives in
//! `Page` and `start_ready_probe`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::Page;

/// A queued ready callback
pub type ReadyCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyPhase {
    Pending,
    Fired,
}

/// Ready-callback queue with a two-state lifecycle
pub struct ReadyQueue {
    phase: ReadyPhase,
    queue: VecDeque<ReadyCallback>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            phase: ReadyPhase::Pending,
            queue: VecDeque::new(),
        }
    }

    /// Queue a callback, or hand it back for inline execution when the
    /// document is already complete or the queue has drained.
    pub fn offer(&mut self, document_complete: bool, callback: ReadyCallback) -> Option<ReadyCallback> {
        if self.phase == ReadyPhase::Fired || document_complete {
            Some(callback)
        } else {
            self.queue.push_back(callback);
            None
        }
    }

    /// Flip to Fired and take whatever is queued, FIFO. Taking from an
    /// already-drained queue yields nothing, so repeated signals are
    /// harmless.
    pub fn take_pending(&mut self) -> VecDeque<ReadyCallback> {
        if self.phase == ReadyPhase::Pending {
            tracing::debug!("Ready queue firing with {} callback(s)", self.queue.len());
        }
        self.phase = ReadyPhase::Fired;
        std::mem::take(&mut self.queue)
    }

    pub fn is_fired(&self) -> bool {
        self.phase == ReadyPhase::Fired
    }

    /// Callbacks currently waiting
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Host task scheduler the polling fallback posts itself to
pub trait TaskScheduler {
    fn post(&self, task: Box<dyn FnOnce()>);
}

/// Deterministic scheduler: posted tasks run only when the owner pumps
/// them, so tests control every retry.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks waiting to run
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run one posted task; false if none were waiting
    pub fn run_next(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Pump tasks until none remain. Careful: a still-failing probe
    /// reposts itself, so only call this once the probe can succeed.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl TaskScheduler for ManualScheduler {
    fn post(&self, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Polling fallback for hosts without a content-loaded signal.
///
/// Posts a task that attempts a benign mutation probe against the
/// document; on failure it reposts itself and keeps retrying with no
/// retry cap or timeout, on success it drains the ready queue. Draining
/// is idempotent, so racing the load backstop is fine.
pub fn start_ready_probe(page: &Page, scheduler: Rc<dyn TaskScheduler>) {
    post_probe(page.clone(), scheduler);
}

fn post_probe(page: Page, scheduler: Rc<dyn TaskScheduler>) {
    let again = Rc::clone(&scheduler);
    scheduler.post(Box::new(move || {
        let ready = page.document_mut().mutation_probe();
        if ready {
            page.fire_ready();
        } else {
            tracing::trace!("Ready probe failed, rescheduling");
            post_probe(page, again);
        }
    }));
}
