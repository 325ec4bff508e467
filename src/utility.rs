//! Concrete utility adapters.

pub mod dlc;

pub use dlc::*;
