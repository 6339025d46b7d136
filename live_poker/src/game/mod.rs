//! Live hand engine.
//!
//! This module holds the state machine that turns narrated actions into a
//! hand ledger:
//! - Seat math for blinds and turn order on a nine-seat ring
//! - Forced bet posting
//! - No-limit bet sizing and action validation
//! - Betting-round closure and street progression
//! - The `HandState` ledger and its `apply` entry point

pub mod betting;
pub mod config;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod forced_bets;
pub mod hand;
pub mod seats;
mod streets;

pub use betting::{BetSizing, RoundStatus};
pub use config::GameConfig;
pub use errors::{HandError, HandResult};
pub use hand::{ActionOptions, Applied, HandOutcome, HandPhase, HandState, Transition};
pub use seats::PlayPositions;
