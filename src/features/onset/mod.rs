//! Onset strength modules
//!
//! Frame-level onset envelopes used to estimate tempo.

pub mod energy_flux;

pub use energy_flux::compute_energy_flux;
