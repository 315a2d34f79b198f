//! Utility scoring primitives for goal selection.
//!
//! A goal's utility is a raw consideration score passed through a monotonic [`UtilityCurve`].
//! [`UtilitySelector`] picks the highest-scoring candidate each tick; tie-breaking is stable
//! (the incumbent, then candidate order) for determinism.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod consideration;
pub mod curve;
pub mod selector;

pub use consideration::{Consideration, Constant};
pub use curve::UtilityCurve;
pub use selector::{UtilitySelector, UtilitySelectorConfig};
