//! Quiet-hour windows — wraparound-aware interval algebra, the per-subject
//! non-overlap invariant, and the quiet-hours evaluator.

pub mod evaluator;
pub mod interval;
pub mod store;
pub mod window;

pub use store::{InMemoryWindowStore, WindowStore};
