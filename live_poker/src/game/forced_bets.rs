//! Opening deductions: blinds and antes.

use log::debug;

use super::{
    config::GameConfig,
    entities::{ActionKind, ActionRecord, Chips, Player, Seat},
    seats::PlayPositions,
};

/// Result of posting the forced bets for a new hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedBets {
    /// One record per non-zero post, in posting order.
    pub records: Vec<ActionRecord>,
    /// Sum of every post.
    pub pot: Chips,
    /// Highest live blind in front of anyone.
    pub current_bet: Chips,
}

/// Post blinds and antes.
///
/// Posting order is small blind, big blind, each player's ante in seat order,
/// then the big blind ante (tournaments only). A short stack posts whatever
/// it has left and is all-in. Blinds are live bets and count toward
/// `committed`; antes are dead money and only count toward `contributed`.
///
/// # Arguments
///
/// * `players` - Everyone dealt into the hand, sorted by seat
/// * `config` - Stakes for the hand
/// * `positions` - Resolved blind seats
/// * `next_sequence` - Hand-wide record counter, advanced per record
pub fn post_forced_bets(
    players: &mut [Player],
    config: &GameConfig,
    positions: &PlayPositions,
    next_sequence: &mut u32,
) -> ForcedBets {
    let mut posted = ForcedBets::default();

    let mut post = |players: &mut [Player], seat: Seat, kind: ActionKind, amount: Chips| {
        let Some(player) = players.iter_mut().find(|p| p.seat == seat) else {
            return;
        };
        let paid = player.pay(amount);
        if paid == 0 {
            return;
        }
        if matches!(kind, ActionKind::PostSmallBlind | ActionKind::PostBigBlind) {
            player.committed += paid;
        }
        debug!("{} {kind} {paid}", player.name);
        posted.pot += paid;
        posted.records.push(ActionRecord {
            sequence: *next_sequence,
            player_id: player.id,
            kind,
            amount: paid,
            is_all_in: player.chips == 0,
            cards: None,
        });
        *next_sequence += 1;
    };

    if let Some(seat) = positions.small_blind {
        post(players, seat, ActionKind::PostSmallBlind, config.small_blind);
    }
    if let Some(seat) = positions.big_blind {
        post(players, seat, ActionKind::PostBigBlind, config.big_blind);
    }
    if config.ante > 0 {
        let seats: Vec<Seat> = players.iter().map(|p| p.seat).collect();
        for seat in seats {
            post(players, seat, ActionKind::PostAnte, config.ante);
        }
    }
    let big_blind_ante = config.effective_big_blind_ante();
    if let (Some(seat), true) = (positions.big_blind, big_blind_ante > 0) {
        post(players, seat, ActionKind::PostBigBlindAnte, big_blind_ante);
    }

    posted.current_bet = players.iter().map(|p| p.committed).max().unwrap_or(0);
    posted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::SeatedPlayer;

    fn players(stacks: &[(Seat, Chips)]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &(seat, stack))| {
                Player::new(&SeatedPlayer::new(i as u64 + 1, seat, &format!("p{seat}"), stack))
            })
            .collect()
    }

    fn post(players: &mut [Player], config: &GameConfig) -> ForcedBets {
        let seats: Vec<Seat> = players.iter().map(|p| p.seat).collect();
        let positions = PlayPositions::resolve(config.dealer_seat, &seats);
        let mut sequence = 1;
        post_forced_bets(players, config, &positions, &mut sequence)
    }

    #[test]
    fn test_blinds_only() {
        let mut players = players(&[(0, 100), (1, 100), (2, 100)]);
        let posted = post(&mut players, &GameConfig::default());

        assert_eq!(posted.pot, 15);
        assert_eq!(posted.current_bet, 10);
        assert_eq!(players[1].committed, 5);
        assert_eq!(players[2].committed, 10);
        assert_eq!(players[0].committed, 0);

        let kinds: Vec<ActionKind> = posted.records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ActionKind::PostSmallBlind, ActionKind::PostBigBlind]);
        assert_eq!(posted.records[0].sequence, 1);
        assert_eq!(posted.records[1].sequence, 2);
    }

    #[test]
    fn test_antes_are_dead_money() {
        let mut players = players(&[(0, 100), (1, 100), (2, 100)]);
        let config = GameConfig {
            ante: 1,
            ..Default::default()
        };
        let posted = post(&mut players, &config);

        assert_eq!(posted.pot, 18);
        assert_eq!(players[0].committed, 0);
        assert_eq!(players[0].contributed, 1);
        assert_eq!(players[2].committed, 10);
        assert_eq!(players[2].contributed, 11);
        assert_eq!(posted.records.len(), 5);
        assert_eq!(posted.records[2].kind, ActionKind::PostAnte);
    }

    #[test]
    fn test_big_blind_ante_in_tournament() {
        let mut players = players(&[(0, 100), (1, 100), (2, 100)]);
        let config = GameConfig {
            big_blind_ante: 10,
            is_tournament: true,
            ..Default::default()
        };
        let posted = post(&mut players, &config);

        assert_eq!(posted.pot, 25);
        assert_eq!(players[2].chips, 80);
        let last = posted.records.last().unwrap();
        assert_eq!(last.kind, ActionKind::PostBigBlindAnte);
        assert_eq!(last.amount, 10);
    }

    #[test]
    fn test_short_stack_posts_all_in() {
        let mut players = players(&[(0, 100), (1, 3), (2, 100)]);
        let posted = post(&mut players, &GameConfig::default());

        assert_eq!(players[1].chips, 0);
        assert_eq!(players[1].committed, 3);
        assert!(posted.records[0].is_all_in);
        assert_eq!(posted.records[0].amount, 3);
        assert_eq!(posted.pot, 13);
    }

    #[test]
    fn test_stack_exhausted_by_blind_skips_ante() {
        let mut players = players(&[(0, 100), (1, 100), (2, 10)]);
        let config = GameConfig {
            ante: 2,
            ..Default::default()
        };
        let posted = post(&mut players, &config);

        let big_blind_records = posted
            .records
            .iter()
            .filter(|r| r.player_id == players[2].id)
            .count();
        assert_eq!(big_blind_records, 1);
        assert_eq!(players[2].chips, 0);
        assert_eq!(posted.pot, 19);
    }

    #[test]
    fn test_empty_small_blind_seat() {
        let mut players = players(&[(0, 100), (2, 100), (4, 100)]);
        let posted = post(&mut players, &GameConfig::default());

        assert_eq!(posted.pot, 10);
        assert_eq!(posted.records.len(), 1);
        assert_eq!(posted.records[0].kind, ActionKind::PostBigBlind);
    }
}
