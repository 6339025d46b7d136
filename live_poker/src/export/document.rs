//! Hand-history document consumed by third-party analysis tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::entities::{BettingRound, Chips, PlayerId};

/// Document format version written in every export.
pub const SPEC_VERSION: &str = "1.4.6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameType {
    Holdem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetType {
    #[serde(rename = "NL")]
    NoLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimit {
    pub bet_cap: Chips,
    pub bet_type: BetType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub id: PlayerId,
    pub player_bounty: Chips,
    pub starting_stack: Chips,
    /// One-indexed.
    pub seat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerWin {
    pub player_id: PlayerId,
    pub win_amount: Chips,
    pub contributed_rake: Chips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotEntry {
    pub number: usize,
    pub amount: Chips,
    pub rake: Chips,
    /// Only filled in when the hand ended by fold-out.
    #[serde(default)]
    pub player_wins: Vec<PlayerWin>,
}

/// One exported hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHistory {
    pub spec_version: String,
    pub network_name: String,
    pub site_name: String,
    pub game_type: GameType,
    pub table_name: String,
    pub table_size: usize,
    pub game_number: String,
    pub start_date_utc: DateTime<Utc>,
    pub currency: String,
    pub ante_amount: Chips,
    pub small_blind_amount: Chips,
    pub big_blind_amount: Chips,
    pub bet_limit: BetLimit,
    /// One-indexed.
    pub dealer_seat: usize,
    pub hero_player_id: PlayerId,
    pub players: Vec<PlayerEntry>,
    pub rounds: Vec<BettingRound>,
    pub pots: Vec<PotEntry>,
}

impl HandHistory {
    /// Total won across every pot.
    #[must_use]
    pub fn total_awarded(&self) -> Chips {
        self.pots
            .iter()
            .flat_map(|pot| pot.player_wins.iter())
            .map(|win| win.win_amount)
            .sum()
    }
}
