use serde::{Deserialize, Serialize};
use std::fmt;

/// Type alias for whole chips. All bets, stacks, and pots are whole chip
/// counts; live tables don't deal in fractions of the smallest chip.
pub type Chips = u64;

/// Type alias for seat positions on the nine-seat ring (0..=8).
pub type Seat = usize;

/// Identifier the operator assigns to a player. It is carried verbatim into
/// the exported hand history.
pub type PlayerId = u64;

/// Card tokens are opaque strings typed by the operator ("Ah", "Td", ...).
pub type CardToken = String;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Self::Preflop, Self::Flop, Self::Turn, Self::River];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 1,
            Self::Turn => 2,
            Self::River => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// An action the operator narrates for the player on turn.
///
/// On the wire this is `{ "kind": "fold" }` or `{ "kind": "raise", "amount": 30 }`.
/// `Bet` and `Raise` carry the total the player is putting in front of them
/// this street (the bet-to / raise-to amount), never the increment. Whether
/// the action is all-in is derived by the engine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds".to_string(),
            Self::Check => "checks".to_string(),
            Self::Call => "calls".to_string(),
            Self::Bet(amount) => format!("bets {amount}"),
            Self::Raise(amount) => format!("raises to {amount}"),
        };
        write!(f, "{repr}")
    }
}

/// Kinds of records that can appear in a betting round's audit trail.
/// Serialized with the action names hand-history tools expect.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    #[serde(rename = "Post SB")]
    PostSmallBlind,
    #[serde(rename = "Post BB")]
    PostBigBlind,
    #[serde(rename = "Post Ante")]
    PostAnte,
    #[serde(rename = "Post BB Ante")]
    PostBigBlindAnte,
    #[serde(rename = "Dealt Cards")]
    DealCards,
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionKind {
    /// Forced bets are posted by the engine, never narrated.
    #[must_use]
    pub const fn is_forced(self) -> bool {
        matches!(
            self,
            Self::PostSmallBlind | Self::PostBigBlind | Self::PostAnte | Self::PostBigBlindAnte
        )
    }
}

impl From<PlayerAction> for ActionKind {
    fn from(value: PlayerAction) -> Self {
        match value {
            PlayerAction::Fold => Self::Fold,
            PlayerAction::Check => Self::Check,
            PlayerAction::Call => Self::Call,
            PlayerAction::Bet(_) => Self::Bet,
            PlayerAction::Raise(_) => Self::Raise,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::PostSmallBlind => "posts small blind",
            Self::PostBigBlind => "posts big blind",
            Self::PostAnte => "posts ante",
            Self::PostBigBlindAnte => "posts big blind ante",
            Self::DealCards => "is dealt",
            Self::Fold => "folds",
            Self::Check => "checks",
            Self::Call => "calls",
            Self::Bet => "bets",
            Self::Raise => "raises to",
        };
        write!(f, "{repr}")
    }
}

/// One entry in a betting round's audit trail.
///
/// `amount` depends on `kind`: the posted amount for forced bets, the
/// player's street total after the action for calls, the bet-to / raise-to
/// total for bets and raises, and zero otherwise.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionRecord {
    #[serde(rename = "action_number")]
    pub sequence: u32,
    pub player_id: PlayerId,
    #[serde(rename = "action")]
    pub kind: ActionKind,
    pub amount: Chips,
    #[serde(rename = "is_allin")]
    pub is_all_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardToken>>,
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} player {} {}", self.sequence, self.player_id, self.kind)?;
        match (&self.cards, self.amount) {
            (Some(cards), _) => write!(f, " [{}]", cards.join(" "))?,
            (None, 0) => {}
            (None, amount) => write!(f, " {amount}")?,
        }
        if self.is_all_in {
            write!(f, " (all-in)")?;
        }
        Ok(())
    }
}

/// A single street's record: its actions in order and the board cards dealt
/// on it. Serializes as a hand-history round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BettingRound {
    pub id: usize,
    pub street: Street,
    pub actions: Vec<ActionRecord>,
    pub cards: Vec<CardToken>,
}

impl BettingRound {
    #[must_use]
    pub fn new(street: Street) -> Self {
        Self {
            id: street.index(),
            street,
            actions: Vec::new(),
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.cards.is_empty()
    }
}

/// A player sitting at the table between hands. Only players with a
/// non-zero stack are dealt into the next hand.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatedPlayer {
    pub id: PlayerId,
    pub seat: Seat,
    pub name: String,
    pub stack: Chips,
}

impl SeatedPlayer {
    #[must_use]
    pub fn new(id: PlayerId, seat: Seat, name: &str, stack: Chips) -> Self {
        Self {
            id,
            seat,
            name: name.trim().to_string(),
            stack,
        }
    }
}

/// Per-hand ledger entry for a player dealt into the hand. Only the engine
/// mutates these; callers get read-only snapshots.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub seat: Seat,
    pub name: String,
    /// Chips owned entering the hand.
    pub starting_stack: Chips,
    /// Chips still behind. Never increases during a hand.
    pub chips: Chips,
    /// Live bet in front of the player on the current street.
    pub committed: Chips,
    /// Everything the player has put in the pot this hand, antes included.
    pub contributed: Chips,
    pub folded: bool,
    /// Fold announced but not yet finalized. The player is already out of
    /// turn order and out of every betting decision.
    pub pending_fold: bool,
    /// Most recent voluntary action on the current street.
    pub last_action: Option<ActionRecord>,
    pub on_turn: bool,
    pub hole_cards: Vec<CardToken>,
}

impl Player {
    #[must_use]
    pub fn new(seated: &SeatedPlayer) -> Self {
        Self {
            id: seated.id,
            seat: seated.seat,
            name: seated.name.clone(),
            starting_stack: seated.stack,
            chips: seated.stack,
            committed: 0,
            contributed: 0,
            folded: false,
            pending_fold: false,
            last_action: None,
            on_turn: false,
            hole_cards: Vec::new(),
        }
    }

    /// Still contesting the pot.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.folded && !self.pending_fold
    }

    #[must_use]
    pub fn is_all_in(&self) -> bool {
        self.is_live() && self.chips == 0
    }

    /// Live with chips behind, so they may still be asked to act.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.is_live() && self.chips > 0
    }

    /// The most this player can have in front of them this street.
    #[must_use]
    pub fn max_commitment(&self) -> Chips {
        self.chips + self.committed
    }

    /// Moves `amount` from the stack into the pot. Returns what was actually
    /// paid, which is less than `amount` when the stack runs out.
    pub(crate) fn pay(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.contributed += paid;
        paid
    }

    pub(crate) fn reset_for_street(&mut self) {
        self.committed = 0;
        self.last_action = None;
        self.on_turn = false;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.folded {
            "folded"
        } else if self.pending_fold {
            "folding"
        } else if self.chips == 0 {
            "all-in"
        } else if self.on_turn {
            "to act"
        } else {
            ""
        };
        write!(
            f,
            "seat {} {:<12} stack {:>6} in {:>6} {state}",
            self.seat + 1,
            self.name,
            self.chips,
            self.committed
        )
    }
}
