//! Turns a hand ledger into a hand-history document.

use log::debug;

use super::{
    document::{BetLimit, BetType, GameType, HandHistory, PlayerEntry, PlayerWin, PotEntry, SPEC_VERSION},
    settings::ExportSettings,
};
use crate::game::{
    constants::TABLE_SIZE,
    hand::{HandOutcome, HandState},
};

/// Build the hand-history document for `hand`.
///
/// Works in any phase, so a hand can be saved before it finishes. An empty
/// in-progress street (no actions, no cards) is left out. The single main
/// pot is awarded only when the hand ended by fold-out.
///
/// # Arguments
///
/// * `hand` - The hand to export
/// * `settings` - Table-level header fields
///
/// # Returns
///
/// * `HandHistory` - The document, ready to serialize
#[must_use]
pub fn export_hand(hand: &HandState, settings: &ExportSettings) -> HandHistory {
    let config = hand.config();

    let players = hand
        .players()
        .iter()
        .map(|player| PlayerEntry {
            name: player.name.clone(),
            id: player.id,
            player_bounty: 0,
            starting_stack: player.starting_stack,
            seat: player.seat + 1,
        })
        .collect();

    let rounds = hand
        .completed_rounds()
        .iter()
        .chain(hand.current_round().filter(|round| !round.is_empty()))
        .cloned()
        .collect();

    let player_wins = match hand.outcome() {
        Some(HandOutcome::FoldOut { winner }) => vec![PlayerWin {
            player_id: winner,
            win_amount: hand.pot(),
            contributed_rake: 0,
        }],
        _ => Vec::new(),
    };

    let started_at = hand.started_at();
    debug!("exporting hand {}", started_at.timestamp_millis());

    HandHistory {
        spec_version: SPEC_VERSION.to_string(),
        network_name: settings.network_name.clone(),
        site_name: settings.site_name.clone(),
        game_type: GameType::Holdem,
        table_name: settings.table_name.clone(),
        table_size: TABLE_SIZE,
        game_number: started_at.timestamp_millis().to_string(),
        start_date_utc: started_at,
        currency: settings.currency.clone(),
        ante_amount: config.ante,
        small_blind_amount: config.small_blind,
        big_blind_amount: config.big_blind,
        bet_limit: BetLimit {
            bet_cap: 0,
            bet_type: BetType::NoLimit,
        },
        dealer_seat: config.dealer_seat + 1,
        hero_player_id: settings.hero_player_id,
        players,
        rounds,
        pots: vec![PotEntry {
            number: 0,
            amount: hand.pot(),
            rake: 0,
            player_wins,
        }],
    }
}
