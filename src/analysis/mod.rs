//! Analysis and result aggregation modules
//!
//! Runs the chord backend ladder and assembles the final result:
//! - Chord backends (neural, template)
//! - Segment analyzer
//! - Result types

pub mod analyzer;
pub mod backend;
pub mod result;
