//! Meter handling
//!
//! Translate a time signature and a tempo estimate into the fixed duration of one
//! chord group. Group boundaries are derived from tempo alone, never from tracked beats.

pub mod interval;
pub mod time_signature;

pub use interval::{interval_duration, measure_duration};
pub use time_signature::TimeSignature;
