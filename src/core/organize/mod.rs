//! Photo organization module.
//!
//! Routes triaged photos into one folder per disposition. Planning is pure;
//! name collisions are resolved by the executor against the live filesystem.

mod executor;
mod planner;
mod types;

pub use executor::MoveExecutor;
pub use planner::{unique_destination, MovePlanner};
pub use types::*;
