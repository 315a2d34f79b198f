use core::fmt;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One tick-stamped executor event.
///
/// `a` and `b` are tag-specific payloads (goal index, plan length, cost, ...). Tags are
/// dot-separated, `goap.<subject>.<verb>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>, a: u64, b: u64) -> Self {
        Self {
            tick,
            tag: tag.into(),
            a,
            b,
        }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} a={} b={}", self.tick, self.tag, self.a, self.b)
    }
}

/// Destination for executor events.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Events in emission order.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.events.iter().filter(|e| e.is(tag)).count()
    }

    /// Events with `tag`, oldest first.
    pub fn find<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.is(tag))
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// A [`TraceLog`] the host keeps a handle to while the executor owns the sink.
#[derive(Debug, Clone, Default)]
pub struct SharedTraceLog(Rc<RefCell<TraceLog>>);

impl SharedTraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.0.borrow().events.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.0
            .borrow()
            .events
            .iter()
            .map(|e| e.tag.to_string())
            .collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.0.borrow().count(tag)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn take(&self) -> TraceLog {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl TraceSink for SharedTraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().emit(event);
    }
}
