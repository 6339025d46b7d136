//! # Live Poker
//!
//! A hand engine for recording live Texas Hold'em hands as they are narrated
//! by someone sitting at the table.
//!
//! The operator reports what happens (blinds, bets, folds, board cards) and
//! the engine keeps the hand ledger: forced bets, turn order, legal bet and
//! raise sizes, street progression, and the pot. A finished (or saved) hand
//! is exported as a hand-history document that third-party tools can read.
//!
//! ## Core Modules
//!
//! - [`game`]: Hand state machine, seat math, bet sizing, and validation
//! - [`export`]: Hand-history document and persistence transport
//! - [`table`]: Session holding the roster, pending stakes, and current hand
//!
//! ## Example
//!
//! ```
//! use live_poker::game::{GameConfig, HandState, Transition, entities::{PlayerAction, SeatedPlayer}};
//!
//! let roster = vec![
//!     SeatedPlayer::new(1, 0, "alice", 100),
//!     SeatedPlayer::new(2, 1, "bob", 100),
//!     SeatedPlayer::new(3, 2, "carol", 100),
//! ];
//! let mut hand = HandState::start(GameConfig::default(), &roster).unwrap();
//! assert_eq!(hand.pot(), 15);
//!
//! let applied = hand.apply(0, PlayerAction::Raise(30)).unwrap();
//! assert_eq!(applied.transition, Transition::NextToAct { seat: 1 });
//! ```

/// Hand export and persistence.
pub mod export;

/// Core hand engine.
pub mod game;
pub use game::{
    GameConfig, HandError, HandResult, HandState, Transition,
    constants::{self, TABLE_SIZE},
    entities::{self, PlayerAction, SeatedPlayer, Street},
};

/// Live table session.
pub mod table;
pub use table::LiveTable;
