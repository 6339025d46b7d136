//! The hand ledger and the single entry point for narrated actions.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

use super::{
    betting::{self, BetSizing, RoundStatus},
    config::GameConfig,
    constants::{MAX_CHIPS, MIN_PLAYERS, TABLE_SIZE},
    entities::{
        ActionKind, ActionRecord, BettingRound, CardToken, Chips, Player, PlayerAction, PlayerId,
        Seat, SeatedPlayer, Street,
    },
    errors::{HandError, HandResult},
    forced_bets::post_forced_bets,
    seats::{PlayPositions, first_seat_from},
};

/// Settled phase of a hand. `Processing` and street transitions happen
/// inside a single `apply` call and are never observed from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandPhase {
    AwaitingAction(Seat),
    Complete,
    Exported,
}

/// How a finished hand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    /// Everyone else folded; the survivor takes the whole pot uncontested.
    FoldOut { winner: PlayerId },
    /// Betting finished on the river, or every remaining player is all-in.
    Showdown,
}

/// What an action moved the hand to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    NextToAct { seat: Seat },
    StreetAdvanced { street: Street, seat: Seat },
    HandComplete(HandOutcome),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextToAct { seat } => write!(f, "seat {} to act", seat + 1),
            Self::StreetAdvanced { street, seat } => {
                write!(f, "{street}, seat {} to act", seat + 1)
            }
            Self::HandComplete(HandOutcome::FoldOut { winner }) => {
                write!(f, "hand complete, player {winner} wins uncontested")
            }
            Self::HandComplete(HandOutcome::Showdown) => write!(f, "hand complete, showdown"),
        }
    }
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub record: ActionRecord,
    pub transition: Transition,
    /// Set after a fold. The player is already out of the hand's decisions;
    /// call `HandState::finalize_fold` once the caller's fold delay passes.
    pub pending_fold: Option<PlayerId>,
}

/// Legal choices for the player on turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOptions {
    pub seat: Seat,
    pub player_id: PlayerId,
    /// Chips a call would cost, capped at the stack. Zero means check.
    pub to_call: Chips,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Smallest legal bet-to or raise-to total, capped at `max_amount`.
    pub min_amount: Chips,
    /// All-in total.
    pub max_amount: Chips,
}

impl ActionOptions {
    #[must_use]
    pub fn can_check(&self) -> bool {
        self.to_call == 0
    }
}

impl fmt::Display for ActionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fold")?;
        if self.can_check() {
            write!(f, " | check")?;
        } else {
            write!(f, " | call {}", self.to_call)?;
        }
        if self.can_bet {
            write!(f, " | bet {}..={}", self.min_amount, self.max_amount)?;
        }
        if self.can_raise {
            write!(f, " | raise {}..={}", self.min_amount, self.max_amount)?;
        }
        Ok(())
    }
}

/// Everything the engine knows about the hand in progress.
///
/// Only methods on this type mutate the ledger. Callers read snapshots
/// through the accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandState {
    pub(crate) config: GameConfig,
    pub(crate) positions: PlayPositions,
    /// Everyone dealt in, sorted by seat.
    pub(crate) players: Vec<Player>,
    pub(crate) street: Street,
    pub(crate) completed: Vec<BettingRound>,
    pub(crate) current: Option<BettingRound>,
    pub(crate) pot: Chips,
    pub(crate) current_bet: Chips,
    pub(crate) last_raise_size: Chips,
    pub(crate) next_sequence: u32,
    pub(crate) phase: HandPhase,
    pub(crate) outcome: Option<HandOutcome>,
    pub(crate) started_at: DateTime<Utc>,
}

impl HandState {
    /// Start a hand now. See [`HandState::start_at`].
    ///
    /// # Errors
    ///
    /// Same as [`HandState::start_at`].
    pub fn start(config: GameConfig, roster: &[SeatedPlayer]) -> HandResult<Self> {
        Self::start_at(config, roster, Utc::now())
    }

    /// Deal a new hand: seat everyone with chips, post forced bets, and put
    /// the first player on turn.
    ///
    /// # Arguments
    ///
    /// * `config` - Stakes and button for this hand
    /// * `roster` - Seated players; zero stacks sit the hand out
    /// * `started_at` - Hand start time, used for the exported header
    ///
    /// # Errors
    ///
    /// Fails on an invalid config, a bad or shared seat, a repeated player
    /// id, a stack above [`MAX_CHIPS`], or fewer than two funded players.
    pub fn start_at(
        config: GameConfig,
        roster: &[SeatedPlayer],
        started_at: DateTime<Utc>,
    ) -> HandResult<Self> {
        config.validate()?;

        let mut seats = HashSet::new();
        let mut ids = HashSet::new();
        for seated in roster {
            if seated.seat >= TABLE_SIZE {
                return Err(HandError::InvalidSeat(seated.seat));
            }
            if !seats.insert(seated.seat) {
                return Err(HandError::SeatTaken(seated.seat));
            }
            if !ids.insert(seated.id) {
                return Err(HandError::DuplicatePlayer(seated.id));
            }
            if seated.stack > MAX_CHIPS {
                return Err(HandError::StackTooLarge(seated.stack));
            }
        }

        let mut players: Vec<Player> = roster
            .iter()
            .filter(|seated| seated.stack > 0)
            .map(Player::new)
            .collect();
        if players.len() < MIN_PLAYERS {
            return Err(HandError::NotEnoughPlayers);
        }
        players.sort_by_key(|p| p.seat);

        let funded: Vec<Seat> = players.iter().map(|p| p.seat).collect();
        let positions = PlayPositions::resolve(config.dealer_seat, &funded);

        let mut next_sequence = 1;
        let posted = post_forced_bets(&mut players, &config, &positions, &mut next_sequence);

        let mut preflop = BettingRound::new(Street::Preflop);
        preflop.actions = posted.records;

        let mut hand = Self {
            config,
            positions,
            players,
            street: Street::Preflop,
            completed: Vec::new(),
            current: Some(preflop),
            pot: posted.pot,
            current_bet: posted.current_bet,
            last_raise_size: 0,
            next_sequence,
            phase: HandPhase::Complete,
            outcome: None,
            started_at,
        };
        info!(
            "new hand: {} players, button seat {}, pot {}",
            hand.players.len(),
            hand.config.dealer_seat + 1,
            hand.pot
        );

        if betting::round_status(&hand.players) == RoundStatus::Closed {
            // Forced bets already put everyone who could act all-in.
            hand.close_street()?;
        } else {
            let actionable = hand.actionable_seats();
            let seat = first_seat_from(hand.positions.starting_action, &actionable)
                .ok_or(HandError::NoLiveRecipient {
                    from: hand.positions.starting_action,
                })?;
            hand.put_on_turn(seat);
        }
        Ok(hand)
    }

    /// Apply one narrated action for the player on turn.
    ///
    /// Phase one validates and lands the action's direct effect. Phase two
    /// decides, with any folding player already treated as folded, whether
    /// the turn moves on, the street closes, or the hand is over.
    ///
    /// # Errors
    ///
    /// Any validation failure is returned with the hand left untouched.
    pub fn apply(&mut self, seat: Seat, action: PlayerAction) -> HandResult<Applied> {
        let HandPhase::AwaitingAction(on_turn) = self.phase else {
            return Err(HandError::HandOver);
        };
        if seat != on_turn {
            warn!("seat {} acted out of turn, seat {} is up", seat + 1, on_turn + 1);
            return Err(HandError::NotPlayersTurn { seat, on_turn });
        }
        let idx = self.player_index(seat)?;
        let sizing = self.sizing();
        let wager = betting::validate(&self.players[idx], action, &sizing).inspect_err(|err| {
            warn!("rejected {action} from seat {}: {err}", seat + 1);
        })?;

        // Phase one: the action's direct effect.
        let closes_preflop = action == PlayerAction::Check
            && self.street == Street::Preflop
            && self.positions.big_blind == Some(seat)
            && self.current_bet == self.config.big_blind
            && self.players[idx].committed == self.config.big_blind;

        let player = &mut self.players[idx];
        player.chips -= wager.paid;
        player.contributed += wager.paid;
        player.committed = wager.committed;
        player.on_turn = false;
        let pending_fold = (wager.kind == ActionKind::Fold).then(|| {
            player.pending_fold = true;
            player.id
        });
        let record = ActionRecord {
            sequence: self.next_sequence,
            player_id: player.id,
            kind: wager.kind,
            amount: wager.record_amount(),
            is_all_in: wager.is_all_in,
            cards: None,
        };
        player.last_action = Some(record.clone());
        debug!(
            "{} {}: stack {}, in {}",
            player.name, action, player.chips, player.committed
        );

        self.next_sequence += 1;
        self.pot += wager.paid;
        if wager.is_aggressive() && wager.committed > self.current_bet {
            self.last_raise_size = sizing.raise_size_after(wager.committed);
            self.current_bet = wager.committed;
        }
        if let Some(round) = self.current.as_mut() {
            round.actions.push(record.clone());
        }

        // Phase two: where the hand goes from here.
        let transition = self.settle(seat, closes_preflop)?;
        Ok(Applied {
            record,
            transition,
            pending_fold,
        })
    }

    /// Finish a fold announced earlier. Idempotent, and a no-op for a player
    /// who never folded.
    ///
    /// # Errors
    ///
    /// Returns `HandError::UnknownPlayer` if the player isn't in this hand.
    pub fn finalize_fold(&mut self, player_id: PlayerId) -> HandResult<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(HandError::UnknownPlayer(player_id))?;
        if player.pending_fold {
            player.pending_fold = false;
            player.folded = true;
            debug!("{} fold finalized", player.name);
        }
        Ok(())
    }

    /// Finish every announced fold at once.
    pub fn finalize_pending_folds(&mut self) {
        for player in self.players.iter_mut().filter(|p| p.pending_fold) {
            player.pending_fold = false;
            player.folded = true;
        }
    }

    /// Record a player's hole cards. Doesn't need the player on turn.
    ///
    /// # Errors
    ///
    /// Fails once the hand is exported, or for a player not in the hand.
    pub fn deal_hole_cards(
        &mut self,
        player_id: PlayerId,
        cards: Vec<CardToken>,
    ) -> HandResult<&ActionRecord> {
        if self.phase == HandPhase::Exported {
            return Err(HandError::HandOver);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(HandError::UnknownPlayer(player_id))?;
        player.hole_cards.clone_from(&cards);

        let record = ActionRecord {
            sequence: self.next_sequence,
            player_id,
            kind: ActionKind::DealCards,
            amount: 0,
            is_all_in: false,
            cards: Some(cards),
        };
        let round = match self.current.as_mut() {
            Some(round) => round,
            None => self
                .completed
                .last_mut()
                .ok_or(HandError::StreetNotReached(self.street))?,
        };
        self.next_sequence += 1;
        round.actions.push(record);
        round
            .actions
            .last()
            .ok_or(HandError::StreetNotReached(self.street))
    }

    /// Set the board cards dealt on `street`, replacing any already recorded.
    ///
    /// # Errors
    ///
    /// Fails once the hand is exported, or if the hand never reached `street`.
    pub fn deal_community_cards(&mut self, street: Street, cards: Vec<CardToken>) -> HandResult<()> {
        if self.phase == HandPhase::Exported {
            return Err(HandError::HandOver);
        }
        let round = self
            .current
            .iter_mut()
            .chain(self.completed.iter_mut())
            .find(|round| round.street == street)
            .ok_or(HandError::StreetNotReached(street))?;
        debug!("{street}: {}", cards.join(" "));
        round.cards = cards;
        Ok(())
    }

    /// Legal choices for the player on turn, if anyone is.
    #[must_use]
    pub fn options(&self) -> Option<ActionOptions> {
        let HandPhase::AwaitingAction(seat) = self.phase else {
            return None;
        };
        let player = self.player(seat)?;
        let sizing = self.sizing();
        let max_amount = player.max_commitment();
        let can_bet = self.current_bet == 0 && player.chips > 0;
        let can_raise = self.current_bet > 0 && max_amount > self.current_bet;
        let minimum = if can_bet {
            sizing.min_bet()
        } else {
            sizing.min_raise_to()
        };
        Some(ActionOptions {
            seat,
            player_id: player.id,
            to_call: self
                .current_bet
                .saturating_sub(player.committed)
                .min(player.chips),
            can_bet,
            can_raise,
            min_amount: minimum.min(max_amount),
            max_amount,
        })
    }

    /// Mark the hand as persisted. No further actions are accepted.
    pub fn mark_exported(&mut self) {
        for player in &mut self.players {
            player.on_turn = false;
        }
        self.phase = HandPhase::Exported;
        info!("hand exported");
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn positions(&self) -> &PlayPositions {
        &self.positions
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    #[must_use]
    pub fn player_by_id(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    #[must_use]
    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<HandOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seat of the player on turn.
    #[must_use]
    pub fn on_turn(&self) -> Option<Seat> {
        match self.phase {
            HandPhase::AwaitingAction(seat) => Some(seat),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, HandPhase::Complete | HandPhase::Exported)
    }

    #[must_use]
    pub fn completed_rounds(&self) -> &[BettingRound] {
        &self.completed
    }

    #[must_use]
    pub fn current_round(&self) -> Option<&BettingRound> {
        self.current.as_ref()
    }

    /// Archived rounds followed by the one in progress.
    pub fn rounds(&self) -> impl Iterator<Item = &BettingRound> {
        self.completed.iter().chain(self.current.iter())
    }

    #[must_use]
    pub fn sizing(&self) -> BetSizing {
        BetSizing {
            street: self.street,
            current_bet: self.current_bet,
            big_blind: self.config.big_blind,
            last_raise_size: self.last_raise_size,
        }
    }

    pub(crate) fn player_index(&self, seat: Seat) -> HandResult<usize> {
        self.players
            .iter()
            .position(|p| p.seat == seat)
            .ok_or(HandError::InvalidSeat(seat))
    }

    /// Seats of live players who still have chips to act with.
    pub(crate) fn actionable_seats(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|p| p.can_act())
            .map(|p| p.seat)
            .collect()
    }

    pub(crate) fn put_on_turn(&mut self, seat: Seat) {
        for player in &mut self.players {
            player.on_turn = player.seat == seat;
        }
        self.phase = HandPhase::AwaitingAction(seat);
    }
}

impl fmt::Display for HandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | pot {} | to call {}", self.street, self.pot, self.current_bet)?;
        let board: Vec<&str> = self
            .rounds()
            .flat_map(|round| round.cards.iter().map(String::as_str))
            .collect();
        if !board.is_empty() {
            writeln!(f, "board: {}", board.join(" "))?;
        }
        for player in &self.players {
            let button = if player.seat == self.positions.dealer {
                "(D)"
            } else {
                "   "
            };
            writeln!(f, "{button} {player}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(stacks: &[(Seat, Chips)]) -> Vec<SeatedPlayer> {
        stacks
            .iter()
            .map(|&(seat, stack)| {
                SeatedPlayer::new(seat as PlayerId + 1, seat, &format!("p{}", seat + 1), stack)
            })
            .collect()
    }

    fn three_handed() -> HandState {
        HandState::start(GameConfig::default(), &roster(&[(0, 100), (1, 100), (2, 100)])).unwrap()
    }

    // === Start ===

    #[test]
    fn test_start_posts_blinds_and_targets_button_three_handed() {
        let hand = three_handed();
        assert_eq!(hand.pot(), 15);
        assert_eq!(hand.current_bet(), 10);
        // Seat 3 (dealer + 3) is empty, so action wraps to the button.
        assert_eq!(hand.on_turn(), Some(0));
        assert!(hand.player(0).unwrap().on_turn);
    }

    #[test]
    fn test_start_requires_two_funded_players() {
        let err = HandState::start(GameConfig::default(), &roster(&[(0, 100), (1, 0)])).unwrap_err();
        assert_eq!(err, HandError::NotEnoughPlayers);
    }

    #[test]
    fn test_start_rejects_bad_roster() {
        let mut players = roster(&[(0, 100), (1, 100)]);
        players.push(SeatedPlayer::new(9, 1, "dup", 100));
        assert_eq!(
            HandState::start(GameConfig::default(), &players).unwrap_err(),
            HandError::SeatTaken(1)
        );

        let players = roster(&[(0, 100), (9, 100)]);
        assert_eq!(
            HandState::start(GameConfig::default(), &players).unwrap_err(),
            HandError::InvalidSeat(9)
        );
    }

    #[test]
    fn test_zero_stack_sits_out() {
        let hand = HandState::start(
            GameConfig::default(),
            &roster(&[(0, 100), (1, 0), (2, 100), (3, 100)]),
        )
        .unwrap();
        assert_eq!(hand.players().len(), 3);
        assert!(hand.player(1).is_none());
        // Small blind seat is empty so only the big blind posts.
        assert_eq!(hand.pot(), 10);
    }

    // === Apply ===

    #[test]
    fn test_out_of_turn_rejected_without_change() {
        let mut hand = three_handed();
        let before = hand.pot();
        let err = hand.apply(2, PlayerAction::Fold).unwrap_err();
        assert_eq!(err, HandError::NotPlayersTurn { seat: 2, on_turn: 0 });
        assert_eq!(hand.pot(), before);
        assert!(hand.player(2).unwrap().is_live());
    }

    #[test]
    fn test_invalid_action_leaves_sequence_untouched() {
        let mut hand = three_handed();
        assert!(hand.apply(0, PlayerAction::Check).is_err());
        let applied = hand.apply(0, PlayerAction::Call).unwrap();
        assert_eq!(applied.record.sequence, 3);
    }

    #[test]
    fn test_fold_is_pending_until_finalized() {
        let mut hand = three_handed();
        let applied = hand.apply(0, PlayerAction::Fold).unwrap();
        assert_eq!(applied.pending_fold, Some(1));
        assert_eq!(applied.transition, Transition::NextToAct { seat: 1 });

        let player = hand.player(0).unwrap();
        assert!(player.pending_fold);
        assert!(!player.folded);
        assert!(!player.on_turn);

        hand.finalize_fold(1).unwrap();
        hand.finalize_fold(1).unwrap();
        let player = hand.player(0).unwrap();
        assert!(player.folded);
        assert!(!player.pending_fold);
    }

    #[test]
    fn test_finalize_fold_unknown_player() {
        let mut hand = three_handed();
        assert_eq!(hand.finalize_fold(42), Err(HandError::UnknownPlayer(42)));
    }

    #[test]
    fn test_actions_after_completion_rejected() {
        let mut hand = three_handed();
        hand.apply(0, PlayerAction::Fold).unwrap();
        let applied = hand.apply(1, PlayerAction::Fold).unwrap();
        assert_eq!(
            applied.transition,
            Transition::HandComplete(HandOutcome::FoldOut { winner: 3 })
        );
        assert_eq!(hand.apply(2, PlayerAction::Check), Err(HandError::HandOver));
    }

    // === Options ===

    #[test]
    fn test_options_preflop_facing_big_blind() {
        let hand = three_handed();
        let options = hand.options().unwrap();
        assert_eq!(options.seat, 0);
        assert_eq!(options.to_call, 10);
        assert!(!options.can_check());
        assert!(options.can_raise);
        assert!(!options.can_bet);
        assert_eq!(options.min_amount, 20);
        assert_eq!(options.max_amount, 100);
    }

    #[test]
    fn test_options_none_when_complete() {
        let mut hand = three_handed();
        hand.apply(0, PlayerAction::Fold).unwrap();
        hand.apply(1, PlayerAction::Fold).unwrap();
        assert!(hand.options().is_none());
    }

    // === Cards ===

    #[test]
    fn test_hole_cards_recorded_in_current_round() {
        let mut hand = three_handed();
        let record = hand
            .deal_hole_cards(1, vec!["Ah".to_string(), "Kd".to_string()])
            .unwrap();
        assert_eq!(record.kind, ActionKind::DealCards);
        assert_eq!(record.sequence, 3);
        assert_eq!(hand.player(0).unwrap().hole_cards, vec!["Ah", "Kd"]);
        assert_eq!(hand.on_turn(), Some(0));
    }

    #[test]
    fn test_community_cards_need_the_street() {
        let mut hand = three_handed();
        let err = hand
            .deal_community_cards(Street::Flop, vec!["2c".into(), "7d".into(), "Ts".into()])
            .unwrap_err();
        assert_eq!(err, HandError::StreetNotReached(Street::Flop));
    }

    #[test]
    fn test_exported_hand_is_frozen() {
        let mut hand = three_handed();
        hand.mark_exported();
        assert_eq!(hand.apply(0, PlayerAction::Fold), Err(HandError::HandOver));
        assert!(hand.deal_hole_cards(1, vec![]).is_err());
        assert!(hand.on_turn().is_none());
    }
}
