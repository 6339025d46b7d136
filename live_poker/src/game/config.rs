//! Game configuration for a single hand.

use serde::{Deserialize, Serialize};

use super::{
    constants::{DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, MAX_CHIPS, TABLE_SIZE},
    entities::{Chips, Seat},
    errors::{HandError, HandResult},
};

/// Stakes and button position for a hand. Fixed once the hand starts; a
/// changed config only takes effect at the next hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,

    /// Dead ante posted by every player dealt in.
    pub ante: Chips,

    /// Extra dead ante posted by the big blind. Only collected in tournaments.
    pub big_blind_ante: Chips,

    pub is_tournament: bool,

    /// Zero-indexed button seat.
    pub dealer_seat: Seat,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            ante: 0,
            big_blind_ante: 0,
            is_tournament: false,
            dealer_seat: 0,
        }
    }
}

impl GameConfig {
    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `HandError::InvalidConfig` when a blind is zero, the big blind
    /// isn't larger than the small blind, a stake is above [`MAX_CHIPS`], or
    /// the button is off the table.
    pub fn validate(&self) -> HandResult<()> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(HandError::InvalidConfig(
                "blinds must be greater than zero".to_string(),
            ));
        }
        if self.big_blind <= self.small_blind {
            return Err(HandError::InvalidConfig(
                "big blind must be larger than small blind".to_string(),
            ));
        }
        if [self.big_blind, self.ante, self.big_blind_ante]
            .iter()
            .any(|&stake| stake > MAX_CHIPS)
        {
            return Err(HandError::InvalidConfig(format!(
                "stakes can't be above {MAX_CHIPS}"
            )));
        }
        if self.dealer_seat >= TABLE_SIZE {
            return Err(HandError::InvalidConfig(format!(
                "dealer seat must be between 1 and {TABLE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Big blind ante actually collected this hand.
    #[must_use]
    pub fn effective_big_blind_ante(&self) -> Chips {
        if self.is_tournament {
            self.big_blind_ante
        } else {
            0
        }
    }

    #[must_use]
    pub fn with_dealer(mut self, dealer_seat: Seat) -> Self {
        self.dealer_seat = dealer_seat;
        self
    }
}
