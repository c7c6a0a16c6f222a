//! Audio preprocessing modules
//!
//! Utilities for preparing decoded audio for analysis:
//! - Channel mixing (multichannel to mono)
//! - Resampling to the analysis rate

pub mod channel_mixer;
pub mod resample;
