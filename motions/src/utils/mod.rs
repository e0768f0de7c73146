//! Utility modules for List Motions.
//!
//! # Modules
//!
//! - [`debounce`]: Event debouncing for coalescing rapid document changes
//! - [`sequence`]: Arrival stamps so a delayed change never overwrites a newer render

pub mod debounce;
pub mod sequence;

pub use debounce::{Debouncer, DebouncerError, DEFAULT_DEBOUNCE_MS};
pub use sequence::Sequencer;
