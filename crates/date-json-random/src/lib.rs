//! Random [`RichValue`](date_json::RichValue) and
//! [`WireValue`](date_json::WireValue) trees for fuzzing round trips.
//!
//! Generated trees are always in the round-trippable subset: no callables,
//! no exotic kinds, finite numbers, no object shaped like a bare `$date`
//! marker unless it is a real one.

pub mod random_date_json;

pub use random_date_json::{NodeOdds, RandomDateJson, RandomDateJsonOptions};
