//! Deterministic trace events for goal-oriented action planning.
//!
//! The executor emits small tick-stamped events; hosts decide where they go (an in-memory log
//! for tests and replays, or their own sink).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{SharedTraceLog, TraceEvent, TraceLog, TraceSink};
