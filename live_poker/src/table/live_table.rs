//! A live table session: the roster between hands and the hand in progress.

use log::{info, warn};
use std::collections::BTreeMap;

use crate::{
    export::{ExportError, ExportResult, ExportSettings, HandHistory, HandStore, export_hand},
    game::{
        Applied, GameConfig, HandError, HandOutcome, HandPhase, HandResult, HandState,
        constants::{MAX_CHIPS, TABLE_SIZE},
        entities::{CardToken, Chips, PlayerAction, PlayerId, Seat, SeatedPlayer, Street},
    },
};

/// Ties the dealer button, the seated roster, pending stakes, and saves
/// together around one [`HandState`] at a time.
#[derive(Debug, Clone, Default)]
pub struct LiveTable {
    roster: BTreeMap<Seat, SeatedPlayer>,
    config: GameConfig,
    /// Applied when the next hand starts.
    pending_config: Option<GameConfig>,
    settings: ExportSettings,
    hand: Option<HandState>,
}

impl LiveTable {
    #[must_use]
    pub fn new(config: GameConfig, settings: ExportSettings) -> Self {
        Self {
            config,
            settings,
            ..Default::default()
        }
    }

    /// Seat a player between hands.
    ///
    /// # Errors
    ///
    /// Fails for an off-table or occupied seat, or an id already seated.
    pub fn seat_player(&mut self, player: SeatedPlayer) -> HandResult<()> {
        if player.seat >= TABLE_SIZE {
            return Err(HandError::InvalidSeat(player.seat));
        }
        if self.roster.contains_key(&player.seat) {
            return Err(HandError::SeatTaken(player.seat));
        }
        if self.roster.values().any(|p| p.id == player.id) {
            return Err(HandError::DuplicatePlayer(player.id));
        }
        if player.stack > MAX_CHIPS {
            return Err(HandError::StackTooLarge(player.stack));
        }
        info!("{} sits in seat {}", player.name, player.seat + 1);
        self.roster.insert(player.seat, player);
        Ok(())
    }

    /// Remove a player from the roster. A hand in progress keeps them.
    ///
    /// # Errors
    ///
    /// Returns `HandError::UnknownPlayer` if nobody has that id.
    pub fn unseat_player(&mut self, player_id: PlayerId) -> HandResult<SeatedPlayer> {
        let seat = self.seat_of(player_id)?;
        self.roster
            .remove(&seat)
            .ok_or(HandError::UnknownPlayer(player_id))
    }

    /// Set a seated player's stack for the next hand.
    ///
    /// # Errors
    ///
    /// Returns `HandError::UnknownPlayer` if nobody has that id, or
    /// `HandError::StackTooLarge` above [`MAX_CHIPS`].
    pub fn set_stack(&mut self, player_id: PlayerId, stack: Chips) -> HandResult<()> {
        let seat = self.seat_of(player_id)?;
        if stack > MAX_CHIPS {
            return Err(HandError::StackTooLarge(stack));
        }
        if let Some(player) = self.roster.get_mut(&seat) {
            player.stack = stack;
        }
        Ok(())
    }

    /// Stage stakes for the next hand. The hand in progress keeps its own.
    ///
    /// # Errors
    ///
    /// Returns `HandError::InvalidConfig` if the config doesn't validate.
    pub fn set_config(&mut self, config: GameConfig) -> HandResult<()> {
        config.validate()?;
        self.pending_config = Some(config);
        Ok(())
    }

    /// Move the dealer button. Any hand in progress is discarded and a new
    /// one starts from the current roster.
    ///
    /// # Errors
    ///
    /// Fails if the seat is off the table, leaving everything as it was, or
    /// if fewer than two seated players have chips, in which case the old
    /// hand is still discarded.
    pub fn move_button(&mut self, dealer: Seat) -> HandResult<&HandState> {
        if dealer >= TABLE_SIZE {
            return Err(HandError::InvalidSeat(dealer));
        }
        if let Some(old) = self.hand.take() {
            if !old.is_complete() {
                warn!("discarding unfinished hand");
            }
            self.roll_stacks(&old);
        }
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
        self.config.dealer_seat = dealer;

        let roster: Vec<SeatedPlayer> = self.roster.values().cloned().collect();
        let hand = HandState::start(self.config.clone(), &roster)?;
        Ok(self.hand.insert(hand))
    }

    /// Apply an action for the player on turn.
    ///
    /// # Errors
    ///
    /// Returns `HandError::HandOver` without a hand, otherwise whatever
    /// [`HandState::apply`] rejects.
    pub fn act(&mut self, seat: Seat, action: PlayerAction) -> HandResult<Applied> {
        self.hand_mut()?.apply(seat, action)
    }

    /// # Errors
    ///
    /// Returns `HandError::HandOver` without a hand.
    pub fn finalize_fold(&mut self, player_id: PlayerId) -> HandResult<()> {
        self.hand_mut()?.finalize_fold(player_id)
    }

    /// # Errors
    ///
    /// Returns `HandError::HandOver` without a hand.
    pub fn deal_hole_cards(&mut self, player_id: PlayerId, cards: Vec<CardToken>) -> HandResult<()> {
        self.hand_mut()?.deal_hole_cards(player_id, cards).map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `HandError::HandOver` without a hand.
    pub fn deal_community_cards(&mut self, street: Street, cards: Vec<CardToken>) -> HandResult<()> {
        self.hand_mut()?.deal_community_cards(street, cards)
    }

    /// Build the document for the current hand without saving it.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NoHand` without a hand.
    pub fn export(&self) -> ExportResult<HandHistory> {
        let hand = self.hand.as_ref().ok_or(ExportError::NoHand)?;
        Ok(export_hand(hand, &self.settings))
    }

    /// Export the current hand and send it to `store`.
    ///
    /// Pending folds are finalized first. On success the hand is marked
    /// exported; on failure it stays unexported so the save can be retried.
    ///
    /// # Errors
    ///
    /// `ExportError::NoHand` / `AlreadyExported`, or whatever the store
    /// returns.
    pub async fn save(&mut self, store: &dyn HandStore) -> ExportResult<HandHistory> {
        let hand = self.hand.as_mut().ok_or(ExportError::NoHand)?;
        if hand.phase() == HandPhase::Exported {
            return Err(ExportError::AlreadyExported);
        }
        hand.finalize_pending_folds();
        let history = export_hand(hand, &self.settings);

        match store.save(&history).await {
            Ok(()) => {
                hand.mark_exported();
                Ok(history)
            }
            Err(err) => {
                warn!("save failed, hand kept for retry: {err}");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    /// Seated players in seat order.
    pub fn roster(&self) -> impl Iterator<Item = &SeatedPlayer> {
        self.roster.values()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn pending_config(&self) -> Option<&GameConfig> {
        self.pending_config.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    fn hand_mut(&mut self) -> HandResult<&mut HandState> {
        self.hand.as_mut().ok_or(HandError::HandOver)
    }

    fn seat_of(&self, player_id: PlayerId) -> HandResult<Seat> {
        self.roster
            .values()
            .find(|p| p.id == player_id)
            .map(|p| p.seat)
            .ok_or(HandError::UnknownPlayer(player_id))
    }

    /// Carry a finished hand's stacks into the roster. Pots aren't split by
    /// the engine, so only a fold-out winner is paid; showdown stacks are
    /// left to the operator.
    fn roll_stacks(&mut self, hand: &HandState) {
        if !hand.is_complete() {
            return;
        }
        let winner = match hand.outcome() {
            Some(HandOutcome::FoldOut { winner }) => Some(winner),
            _ => None,
        };
        if winner.is_none() {
            return;
        }
        for player in hand.players() {
            if let Some(seated) = self.roster.get_mut(&player.seat) {
                if seated.id != player.id {
                    continue;
                }
                seated.stack = if Some(player.id) == winner {
                    player.chips + hand.pot()
                } else {
                    player.chips
                };
            }
        }
    }
}
