//! Neural chord recognition
//!
//! The core never runs a network itself. A `ChordRecognizer` turns a buffer into raw
//! labelled spans, and `spans::consume_spans` converts those into chord events.
//! With the `ml` feature an external recognizer program can be plugged in.

pub mod recognizer;
pub mod spans;

#[cfg(feature = "ml")]
pub mod external;

pub use recognizer::{ChordRecognizer, ChordSpan, NO_CHORD};
pub use spans::consume_spans;

#[cfg(feature = "ml")]
pub use external::ExternalRecognizer;
