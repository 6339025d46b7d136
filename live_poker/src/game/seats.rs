//! Seat arithmetic on the fixed nine-seat ring.
//!
//! Every function here is pure. Seat lists passed in are the seats still
//! eligible for whatever is being asked (live players, players who can act);
//! their order doesn't matter.

use serde::{Deserialize, Serialize};

use super::{constants::TABLE_SIZE, entities::Seat};

#[must_use]
pub const fn small_blind_seat(dealer: Seat) -> Seat {
    (dealer + 1) % TABLE_SIZE
}

#[must_use]
pub const fn big_blind_seat(dealer: Seat) -> Seat {
    (dealer + 2) % TABLE_SIZE
}

/// Under the gun: the seat after the big blind.
#[must_use]
pub const fn preflop_first_to_act(dealer: Seat) -> Seat {
    (dealer + 3) % TABLE_SIZE
}

/// First seat in `seats`, scanning clockwise from `start` inclusive.
#[must_use]
pub fn first_seat_from(start: Seat, seats: &[Seat]) -> Option<Seat> {
    (0..TABLE_SIZE)
        .map(|offset| (start + offset) % TABLE_SIZE)
        .find(|seat| seats.contains(seat))
}

/// First seat to act after the flop: the first eligible seat clockwise from
/// the small blind position. Falls back to the dealer if nobody is eligible.
#[must_use]
pub fn postflop_first_to_act(dealer: Seat, seats: &[Seat]) -> Seat {
    first_seat_from(small_blind_seat(dealer), seats).unwrap_or(dealer)
}

/// Next eligible seat clockwise after `from`. Returns `from` itself when no
/// other seat is eligible, which means the hand should already be over.
#[must_use]
pub fn next_live_seat(from: Seat, seats: &[Seat]) -> Seat {
    (1..TABLE_SIZE)
        .map(|offset| (from + offset) % TABLE_SIZE)
        .find(|seat| seats.contains(seat))
        .unwrap_or(from)
}

/// Blind seats and preflop action for one hand.
///
/// Blind positions are only set when a funded player actually sits there;
/// an empty blind seat posts nothing. Heads-up with the button occupied, the
/// button posts the small blind and acts first preflop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayPositions {
    pub dealer: Seat,
    pub small_blind: Option<Seat>,
    pub big_blind: Option<Seat>,
    /// Preflop action begins at the first seat that can act, scanning
    /// clockwise from here.
    pub starting_action: Seat,
}

impl PlayPositions {
    /// Resolve positions for the seats dealt into a hand.
    ///
    /// # Arguments
    ///
    /// * `dealer` - Zero-indexed button seat
    /// * `funded` - Seats of players with chips, in any order
    #[must_use]
    pub fn resolve(dealer: Seat, funded: &[Seat]) -> Self {
        if funded.len() == 2 && funded.contains(&dealer) {
            let other = funded.iter().copied().find(|&seat| seat != dealer);
            return Self {
                dealer,
                small_blind: Some(dealer),
                big_blind: other,
                starting_action: dealer,
            };
        }

        let occupied = |seat: Seat| funded.contains(&seat).then_some(seat);
        Self {
            dealer,
            small_blind: occupied(small_blind_seat(dealer)),
            big_blind: occupied(big_blind_seat(dealer)),
            starting_action: preflop_first_to_act(dealer),
        }
    }

    #[must_use]
    pub fn is_heads_up(&self) -> bool {
        self.small_blind == Some(self.dealer)
    }
}
