//! No-limit bet sizing, action validation, and betting-round closure.

use serde::{Deserialize, Serialize};

use super::{
    entities::{ActionKind, Chips, Player, PlayerAction, Street},
    errors::{HandError, HandResult},
};

/// Inputs to the no-limit sizing rules for the current street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSizing {
    pub street: Street,
    /// Highest live bet on the street.
    pub current_bet: Chips,
    pub big_blind: Chips,
    /// Increment of the largest bet or raise this street, zero if none.
    pub last_raise_size: Chips,
}

impl BetSizing {
    #[must_use]
    pub fn min_bet(&self) -> Chips {
        self.big_blind
    }

    /// Smallest legal raise-to total.
    ///
    /// Preflop with only the big blind live, that's two big blinds. Otherwise
    /// a raise must be at least as large as the largest increment so far,
    /// and never smaller than one big blind.
    #[must_use]
    pub fn min_raise_to(&self) -> Chips {
        if self.current_bet == 0 {
            self.min_bet()
        } else if self.street == Street::Preflop && self.current_bet == self.big_blind {
            self.big_blind.saturating_mul(2)
        } else {
            self.current_bet
                .saturating_add(self.last_raise_size.max(self.big_blind))
        }
    }

    /// Raise size to carry forward after the current bet moves to `new_bet`.
    /// An incomplete all-in raise never shrinks it.
    #[must_use]
    pub fn raise_size_after(&self, new_bet: Chips) -> Chips {
        self.last_raise_size
            .max(new_bet.saturating_sub(self.current_bet))
    }
}

/// The effect a validated action will have on its player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wager {
    pub kind: ActionKind,
    /// Chips moving from stack to pot.
    pub paid: Chips,
    /// Player's live bet once the action lands.
    pub committed: Chips,
    pub is_all_in: bool,
}

impl Wager {
    /// Amount stamped on the action record: the resulting street total for
    /// calls, bets, and raises, zero for checks and folds.
    #[must_use]
    pub fn record_amount(&self) -> Chips {
        match self.kind {
            ActionKind::Call | ActionKind::Bet | ActionKind::Raise => self.committed,
            _ => 0,
        }
    }

    /// Whether this moves the current bet.
    #[must_use]
    pub fn is_aggressive(&self) -> bool {
        matches!(self.kind, ActionKind::Bet | ActionKind::Raise)
    }
}

/// Validate `action` for `player` without touching any state.
///
/// # Errors
///
/// Returns the matching `HandError` when the action is illegal here. Bets
/// and raises beyond the player's stack are rejected, not clamped.
pub fn validate(player: &Player, action: PlayerAction, sizing: &BetSizing) -> HandResult<Wager> {
    let to_call = sizing.current_bet.saturating_sub(player.committed);
    let available = player.max_commitment();
    let stay = |kind| Wager {
        kind,
        paid: 0,
        committed: player.committed,
        is_all_in: false,
    };

    match action {
        PlayerAction::Fold => Ok(stay(ActionKind::Fold)),
        PlayerAction::Check => {
            if to_call > 0 {
                return Err(HandError::CannotCheck { to_call });
            }
            Ok(stay(ActionKind::Check))
        }
        PlayerAction::Call => {
            if to_call == 0 {
                return Err(HandError::NothingToCall);
            }
            let paid = to_call.min(player.chips);
            Ok(Wager {
                kind: ActionKind::Call,
                paid,
                committed: player.committed + paid,
                is_all_in: paid == player.chips,
            })
        }
        PlayerAction::Bet(amount) => {
            if sizing.current_bet > 0 {
                return Err(HandError::BetNotAllowed);
            }
            sized(ActionKind::Bet, amount, sizing.min_bet(), player)
        }
        PlayerAction::Raise(amount) => {
            if sizing.current_bet == 0 {
                return Err(HandError::RaiseNotAllowed);
            }
            if amount <= sizing.current_bet && amount <= available {
                return Err(HandError::BetTooSmall {
                    amount,
                    minimum: sizing.min_raise_to(),
                });
            }
            sized(ActionKind::Raise, amount, sizing.min_raise_to(), player)
        }
    }
}

fn sized(kind: ActionKind, amount: Chips, minimum: Chips, player: &Player) -> HandResult<Wager> {
    let available = player.max_commitment();
    if amount > available {
        return Err(HandError::InsufficientStack { amount, available });
    }
    let is_all_in = amount == available;
    if amount < minimum && !is_all_in {
        return Err(HandError::BetTooSmall { amount, minimum });
    }
    Ok(Wager {
        kind,
        paid: amount - player.committed,
        committed: amount,
        is_all_in,
    })
}

/// Where the street stands after an action settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// At most one live player left.
    HandOver,
    /// Betting on this street is finished.
    Closed,
    /// Someone still has to act.
    Open,
}

/// Decide whether the street's betting is finished.
///
/// The street closes once every live player has acted (or is all-in) and has
/// matched the highest live bet (or is all-in). It also closes when at most
/// one live player can still act and they've matched the highest bet, since
/// nobody is left to bet against.
#[must_use]
pub fn round_status(players: &[Player]) -> RoundStatus {
    let live: Vec<&Player> = players.iter().filter(|p| p.is_live()).collect();
    if live.len() <= 1 {
        return RoundStatus::HandOver;
    }

    let highest = live.iter().map(|p| p.committed).max().unwrap_or(0);
    let settled = |p: &&Player| p.committed == highest || p.chips == 0;

    let everyone_acted = live
        .iter()
        .all(|p| (p.last_action.is_some() || p.chips == 0) && settled(p));
    if everyone_acted {
        return RoundStatus::Closed;
    }

    let actionable: Vec<&&Player> = live.iter().filter(|p| p.can_act()).collect();
    if actionable.len() < 2 && actionable.iter().all(|p| p.committed == highest) {
        return RoundStatus::Closed;
    }

    RoundStatus::Open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{ActionRecord, SeatedPlayer};

    fn sizing(street: Street, current_bet: Chips, last_raise_size: Chips) -> BetSizing {
        BetSizing {
            street,
            current_bet,
            big_blind: 10,
            last_raise_size,
        }
    }

    fn player(stack: Chips, committed: Chips) -> Player {
        let mut player = Player::new(&SeatedPlayer::new(1, 0, "alice", stack + committed));
        player.chips = stack;
        player.committed = committed;
        player.contributed = committed;
        player
    }

    fn acted(mut player: Player) -> Player {
        player.last_action = Some(ActionRecord {
            sequence: 1,
            player_id: player.id,
            kind: ActionKind::Check,
            amount: 0,
            is_all_in: false,
            cards: None,
        });
        player
    }

    // === Sizing ===

    #[test]
    fn test_min_raise_saturates_on_huge_stakes() {
        let preflop = BetSizing {
            street: Street::Preflop,
            current_bet: Chips::MAX,
            big_blind: Chips::MAX,
            last_raise_size: 0,
        };
        assert_eq!(preflop.min_raise_to(), Chips::MAX);

        let flop = BetSizing {
            street: Street::Flop,
            current_bet: Chips::MAX - 5,
            big_blind: 10,
            last_raise_size: 20,
        };
        assert_eq!(flop.min_raise_to(), Chips::MAX);
    }

    #[test]
    fn test_min_bet_is_big_blind() {
        let s = sizing(Street::Flop, 0, 0);
        assert_eq!(s.min_bet(), 10);
        assert_eq!(s.min_raise_to(), 10);
    }

    #[test]
    fn test_preflop_min_raise_over_big_blind() {
        assert_eq!(sizing(Street::Preflop, 10, 0).min_raise_to(), 20);
    }

    #[test]
    fn test_min_raise_follows_last_increment() {
        // Facing 10, raised to 30: the next raise must be to at least 50.
        let s = sizing(Street::Preflop, 10, 0);
        let after = sizing(Street::Preflop, 30, s.raise_size_after(30));
        assert_eq!(after.last_raise_size, 20);
        assert_eq!(after.min_raise_to(), 50);
    }

    #[test]
    fn test_min_raise_floor_is_big_blind() {
        assert_eq!(sizing(Street::Turn, 4, 0).min_raise_to(), 14);
    }

    #[test]
    fn test_incomplete_raise_keeps_increment() {
        let s = sizing(Street::Flop, 50, 40);
        assert_eq!(s.raise_size_after(60), 40);
    }

    // === Validation ===

    #[test]
    fn test_check_facing_bet_rejected() {
        let p = player(100, 0);
        let err = validate(&p, PlayerAction::Check, &sizing(Street::Flop, 20, 20)).unwrap_err();
        assert_eq!(err, HandError::CannotCheck { to_call: 20 });
    }

    #[test]
    fn test_call_records_street_total() {
        let p = player(95, 5);
        let wager = validate(&p, PlayerAction::Call, &sizing(Street::Preflop, 10, 0)).unwrap();
        assert_eq!(wager.paid, 5);
        assert_eq!(wager.committed, 10);
        assert_eq!(wager.record_amount(), 10);
        assert!(!wager.is_all_in);
    }

    #[test]
    fn test_short_call_is_all_in() {
        let p = player(7, 0);
        let wager = validate(&p, PlayerAction::Call, &sizing(Street::Flop, 50, 50)).unwrap();
        assert_eq!(wager.paid, 7);
        assert!(wager.is_all_in);
    }

    #[test]
    fn test_call_with_nothing_to_call() {
        let p = player(100, 10);
        let err = validate(&p, PlayerAction::Call, &sizing(Street::Preflop, 10, 0)).unwrap_err();
        assert_eq!(err, HandError::NothingToCall);
    }

    #[test]
    fn test_bet_rules() {
        let p = player(100, 0);
        let open = sizing(Street::Flop, 0, 0);
        assert_eq!(
            validate(&p, PlayerAction::Bet(5), &open).unwrap_err(),
            HandError::BetTooSmall {
                amount: 5,
                minimum: 10
            }
        );
        assert_eq!(
            validate(&p, PlayerAction::Bet(150), &open).unwrap_err(),
            HandError::InsufficientStack {
                amount: 150,
                available: 100
            }
        );
        assert_eq!(
            validate(&p, PlayerAction::Bet(20), &sizing(Street::Flop, 10, 10)).unwrap_err(),
            HandError::BetNotAllowed
        );
        let wager = validate(&p, PlayerAction::Bet(100), &open).unwrap();
        assert!(wager.is_all_in);
        assert_eq!(wager.record_amount(), 100);
    }

    #[test]
    fn test_short_all_in_bet_allowed() {
        let p = player(6, 0);
        let wager = validate(&p, PlayerAction::Bet(6), &sizing(Street::River, 0, 0)).unwrap();
        assert!(wager.is_all_in);
        assert_eq!(wager.paid, 6);
    }

    #[test]
    fn test_raise_rules() {
        let p = player(95, 5);
        let facing = sizing(Street::Preflop, 10, 0);
        assert_eq!(
            validate(&p, PlayerAction::Raise(15), &facing).unwrap_err(),
            HandError::BetTooSmall {
                amount: 15,
                minimum: 20
            }
        );
        assert_eq!(
            validate(&p, PlayerAction::Raise(10), &facing).unwrap_err(),
            HandError::BetTooSmall {
                amount: 10,
                minimum: 20
            }
        );
        assert_eq!(
            validate(&p, PlayerAction::Raise(20), &sizing(Street::Flop, 0, 0)).unwrap_err(),
            HandError::RaiseNotAllowed
        );
        let wager = validate(&p, PlayerAction::Raise(30), &facing).unwrap();
        assert_eq!(wager.paid, 25);
        assert_eq!(wager.committed, 30);
        assert!(wager.is_aggressive());
    }

    #[test]
    fn test_all_in_raise_below_minimum_allowed() {
        let p = player(10, 5);
        let wager = validate(&p, PlayerAction::Raise(15), &sizing(Street::Preflop, 10, 0)).unwrap();
        assert!(wager.is_all_in);
        assert_eq!(wager.committed, 15);
    }

    // === Round Status ===

    #[test]
    fn test_single_live_player_ends_hand() {
        let mut folded = player(100, 0);
        folded.pending_fold = true;
        assert_eq!(round_status(&[folded, player(100, 0)]), RoundStatus::HandOver);
    }

    #[test]
    fn test_open_until_everyone_acts() {
        let players = [acted(player(90, 10)), player(90, 10)];
        assert_eq!(round_status(&players), RoundStatus::Open);

        let players = [acted(player(90, 10)), acted(player(90, 10))];
        assert_eq!(round_status(&players), RoundStatus::Closed);
    }

    #[test]
    fn test_open_when_bet_unmatched() {
        let players = [acted(player(70, 30)), acted(player(90, 10))];
        assert_eq!(round_status(&players), RoundStatus::Open);
    }

    #[test]
    fn test_all_in_short_counts_as_settled() {
        let players = [acted(player(70, 30)), player(0, 12), acted(player(70, 30))];
        assert_eq!(round_status(&players), RoundStatus::Closed);
    }

    #[test]
    fn test_nobody_left_to_bet_against() {
        // One player all-in, the other has matched without acting.
        let players = [player(0, 0), player(100, 0)];
        assert_eq!(round_status(&players), RoundStatus::Closed);

        // Still has to call the all-in.
        let players = [player(0, 20), player(100, 10)];
        assert_eq!(round_status(&players), RoundStatus::Open);
    }
}
