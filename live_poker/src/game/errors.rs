//! Hand engine error types.

use thiserror::Error;

use super::{
    constants::MAX_CHIPS,
    entities::{Chips, PlayerId, Seat, Street},
};

/// Errors raised while starting or driving a hand. Every variant is a
/// rejection: the hand state is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    /// Action addressed to a seat that isn't on turn
    #[error("seat {} is not on turn (seat {} is)", .seat + 1, .on_turn + 1)]
    NotPlayersTurn { seat: Seat, on_turn: Seat },

    /// Bet or raise larger than the player's stack plus their live bet
    #[error("cannot put in {amount}, only {available} available")]
    InsufficientStack { amount: Chips, available: Chips },

    /// Turn advancement found nobody to act
    #[error("no live seat to act after seat {}", .from + 1)]
    NoLiveRecipient { from: Seat },

    /// Action submitted after the hand finished
    #[error("hand is over")]
    HandOver,

    #[error("cannot check facing {to_call} to call")]
    CannotCheck { to_call: Chips },

    #[error("nothing to call")]
    NothingToCall,

    /// A bet is already live this street, so it must be a raise
    #[error("cannot bet, there is already a bet")]
    BetNotAllowed,

    /// Nothing has been bet this street, so it must be a bet
    #[error("cannot raise, nothing has been bet")]
    RaiseNotAllowed,

    #[error("{amount} is below the minimum of {minimum}")]
    BetTooSmall { amount: Chips, minimum: Chips },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("invalid seat {}", .0 + 1)]
    InvalidSeat(Seat),

    #[error("seat {} is taken", .0 + 1)]
    SeatTaken(Seat),

    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),

    #[error("need at least two players with chips to start a hand")]
    NotEnoughPlayers,

    #[error("the {0} hasn't been reached")]
    StreetNotReached(Street),

    #[error("stack of {0} is above the table limit of {max}", max = MAX_CHIPS)]
    StackTooLarge(Chips),

    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}

/// Result type for hand operations
pub type HandResult<T> = Result<T, HandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_are_displayed_one_indexed() {
        let err = HandError::NotPlayersTurn { seat: 0, on_turn: 3 };
        assert_eq!(err.to_string(), "seat 1 is not on turn (seat 4 is)");
        assert_eq!(HandError::SeatTaken(8).to_string(), "seat 9 is taken");
    }

    #[test]
    fn test_street_not_reached_message() {
        let err = HandError::StreetNotReached(Street::River);
        assert_eq!(err.to_string(), "the river hasn't been reached");
    }
}
