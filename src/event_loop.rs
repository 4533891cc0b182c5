//! Polling loop: per-tick callback dispatch
//!
//! An [`EventLoop`] is a registry of callbacks run once per control-cycle
//! tick, in registration order. The host scheduler owns the cadence (50 Hz
//! is typical); this crate only provides the registry and a process-wide
//! default instance that trigger accessors bind to when no explicit loop is
//! given.
//!
//! Callbacks registered while a tick is in flight take effect on the next
//! tick. Unbinding stops future firing but has no effect on a callback
//! already running - the loop is single-threaded, so nothing is ever
//! concurrent with it.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

type Callback = Box<dyn FnMut() + Send>;

struct Binding {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct LoopInner {
    bindings: Vec<Binding>,
    removed: Vec<u64>,
    next_id: u64,
    polling: bool,
    cleared: bool,
}

/// Handle to a registered callback, used to unbind it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingToken(u64);

/// A single-threaded per-tick callback dispatcher.
///
/// Cloning produces another handle to the same loop.
#[derive(Clone, Default)]
pub struct EventLoop {
    inner: Arc<Mutex<LoopInner>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it will run once per [`poll`](Self::poll), after
    /// every callback registered before it.
    pub fn bind(&self, callback: impl FnMut() + Send + 'static) -> BindingToken {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.bindings.push(Binding {
            id,
            callback: Box::new(callback),
        });
        BindingToken(id)
    }

    /// Stop a callback from firing on future ticks.
    pub fn unbind(&self, token: BindingToken) {
        let mut inner = self.inner.lock();
        let before = inner.bindings.len();
        inner.bindings.retain(|b| b.id != token.0);
        if inner.bindings.len() == before {
            // The binding may be out for polling right now; drop it when the
            // tick finishes.
            inner.removed.push(token.0);
        }
    }

    /// Run every registered callback once, in registration order.
    pub fn poll(&self) {
        let mut active = {
            let mut inner = self.inner.lock();
            inner.polling = true;
            std::mem::take(&mut inner.bindings)
        };

        for binding in active.iter_mut() {
            (binding.callback)();
        }

        let mut inner = self.inner.lock();
        inner.polling = false;
        if inner.cleared {
            // clear() ran mid-tick: drop the list that was out for polling,
            // keep anything registered after the clear.
            inner.cleared = false;
            return;
        }
        // Callbacks registered during the tick landed in inner.bindings;
        // keep them after the ones that just ran.
        let added = std::mem::take(&mut inner.bindings);
        active.extend(added);
        if !inner.removed.is_empty() {
            let removed = std::mem::take(&mut inner.removed);
            active.retain(|b| !removed.contains(&b.id));
        }
        inner.bindings = active;
    }

    /// Drop every registered callback.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.bindings.clear();
        inner.removed.clear();
        if inner.polling {
            inner.cleared = true;
        }
    }

    /// Number of currently registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.lock().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().bindings.is_empty()
    }
}

static DEFAULT_LOOP: Lazy<EventLoop> = Lazy::new(EventLoop::new);

/// The process-wide default loop that accessors without an explicit loop
/// argument bind to.
///
/// Callers are expected to register bindings before the control cycle starts
/// polling; a binding registered mid-tick takes effect on the next tick.
pub fn default_loop() -> &'static EventLoop {
    &DEFAULT_LOOP
}
