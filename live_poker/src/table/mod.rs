//! Table session around the hand engine.

pub mod live_table;

pub use live_table::LiveTable;
