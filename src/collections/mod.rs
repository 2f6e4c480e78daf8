//! Ordered collections keyed by a pluggable key extractor.
//!
//! - `collate`: the `Collate` ordering contract for sort keys
//! - `sorted_set`: `OrderedKeyedSet`, identity-unique members in key order

mod collate;
mod sorted_set;

pub use collate::Collate;
pub use sorted_set::{Direction, OrderedKeyedSet};
