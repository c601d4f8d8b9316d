//! Migration ledger adapters.

mod json;
mod memory;

pub use json::{DEFAULT_TRACKER_FILE, JsonTrackerStore};
pub use memory::MemoryTrackerStore;
