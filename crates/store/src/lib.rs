//! Ad record store and attribution recorder.
//!
//! The store is the only shared mutable resource in the engine; every
//! counter update goes through a single atomic operation under its entry
//! locks, so no application-level locking is layered on top.

pub mod attribution;
pub mod store;

pub use attribution::AttributionRecorder;
pub use store::AdStore;
