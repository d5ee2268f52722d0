//! Analysis modules.
//!
//! Aggregations over cleaned postings, plus the distribution helpers the
//! chart renderer builds on.

pub mod aggregator;
pub mod distribution;

pub use aggregator::*;
