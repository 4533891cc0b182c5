//! Edge-triggered boolean conditions
//!
//! A [`Trigger`] wraps a zero-argument predicate and the [`EventLoop`] its
//! callbacks bind to. Sampling happens inside the loop's tick; each
//! registration carries its own [`EdgeDetector`], so two triggers built from
//! the same accessor keep fully independent histories.
//!
//! Triggers compose with [`and`](Trigger::and), [`or`](Trigger::or) and
//! [`negate`](Trigger::negate). Composites sample *every* operand on every
//! pass - short-circuiting is deliberately avoided so that side-effecting
//! conditions keep their edge state consistent.

use std::sync::Arc;

use crate::event_loop::{BindingToken, EventLoop};

/// Shared sampling closure behind a trigger.
pub type Condition = Arc<dyn Fn() -> bool + Send + Sync>;

/// Classification of one sample against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    UnchangedLow,
    Rising,
    UnchangedHigh,
    Falling,
}

/// Tracks the previous sample of one registration.
///
/// The initial previous value is `false`, so a condition that is already
/// true on the very first poll reports a rising edge.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current sample and classify the transition.
    pub fn feed(&mut self, sample: bool) -> Edge {
        let edge = match (self.previous, sample) {
            (false, false) => Edge::UnchangedLow,
            (false, true) => Edge::Rising,
            (true, true) => Edge::UnchangedHigh,
            (true, false) => Edge::Falling,
        };
        self.previous = sample;
        edge
    }
}

/// A lazily-sampled boolean condition bound to an event loop.
///
/// Value-like: cloning is cheap and clones share the underlying condition.
/// Composition is strictly acyclic - a composite holds read-only handles to
/// conditions that existed before it, never to itself.
#[derive(Clone)]
pub struct Trigger {
    event_loop: EventLoop,
    condition: Condition,
}

impl Trigger {
    /// Wrap a predicate, binding future callbacks to `event_loop`.
    pub fn new(event_loop: &EventLoop, condition: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            event_loop: event_loop.clone(),
            condition: Arc::new(condition),
        }
    }

    /// Wrap a predicate on the process-wide default loop.
    pub fn on_default_loop(condition: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self::new(crate::event_loop::default_loop(), condition)
    }

    /// The constant-false trigger: never active, never fires.
    pub fn never(event_loop: &EventLoop) -> Self {
        Self::new(event_loop, || false)
    }

    /// Sample the condition right now, outside any tick.
    pub fn value(&self) -> bool {
        (self.condition)()
    }

    /// The loop this trigger's callbacks bind to.
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Run `callback` on each rising edge (false -> true between two polls).
    pub fn when_active(&self, mut callback: impl FnMut() + Send + 'static) -> BindingToken {
        let condition = Arc::clone(&self.condition);
        let mut edges = EdgeDetector::new();
        self.event_loop.bind(move || {
            if edges.feed(condition()) == Edge::Rising {
                callback();
            }
        })
    }

    /// Run `callback` on each falling edge (true -> false between two polls).
    pub fn when_inactive(&self, mut callback: impl FnMut() + Send + 'static) -> BindingToken {
        let condition = Arc::clone(&self.condition);
        let mut edges = EdgeDetector::new();
        self.event_loop.bind(move || {
            if edges.feed(condition()) == Edge::Falling {
                callback();
            }
        })
    }

    /// Run `callback` on every poll where the condition samples true,
    /// including the rising tick.
    pub fn while_active_continuous(&self, mut callback: impl FnMut() + Send + 'static) -> BindingToken {
        let condition = Arc::clone(&self.condition);
        self.event_loop.bind(move || {
            if condition() {
                callback();
            }
        })
    }

    /// Both conditions true. The composite binds to this trigger's loop and
    /// samples both operands on every pass.
    pub fn and(&self, other: &Trigger) -> Trigger {
        let left = Arc::clone(&self.condition);
        let right = Arc::clone(&other.condition);
        Trigger {
            event_loop: self.event_loop.clone(),
            condition: Arc::new(move || {
                let a = left();
                let b = right();
                a & b
            }),
        }
    }

    /// Either condition true. The composite binds to this trigger's loop and
    /// samples both operands on every pass.
    pub fn or(&self, other: &Trigger) -> Trigger {
        let left = Arc::clone(&self.condition);
        let right = Arc::clone(&other.condition);
        Trigger {
            event_loop: self.event_loop.clone(),
            condition: Arc::new(move || {
                let a = left();
                let b = right();
                a | b
            }),
        }
    }

    /// Logical inverse on the same loop.
    pub fn negate(&self) -> Trigger {
        let inner = Arc::clone(&self.condition);
        Trigger {
            event_loop: self.event_loop.clone(),
            condition: Arc::new(move || !inner()),
        }
    }
}
