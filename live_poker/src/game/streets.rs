//! Street progression and hand completion.

use log::info;

use super::{
    betting::{self, RoundStatus},
    entities::{BettingRound, Seat},
    errors::{HandError, HandResult},
    hand::{HandOutcome, HandPhase, HandState, Transition},
    seats::{next_live_seat, postflop_first_to_act},
};

impl HandState {
    /// Decide where the hand goes after the player at `from` acted.
    pub(crate) fn settle(&mut self, from: Seat, closes_preflop: bool) -> HandResult<Transition> {
        match betting::round_status(&self.players) {
            RoundStatus::HandOver => Ok(self.complete()),
            RoundStatus::Closed => self.close_street(),
            RoundStatus::Open if closes_preflop => self.close_street(),
            RoundStatus::Open => {
                let next = next_live_seat(from, &self.actionable_seats());
                if next == from {
                    return Err(HandError::NoLiveRecipient { from });
                }
                self.put_on_turn(next);
                Ok(Transition::NextToAct { seat: next })
            }
        }
    }

    /// Archive the current street and open the next one.
    ///
    /// Streets with nobody left to bet are archived empty until the river,
    /// so board cards can still be attached to each of them.
    pub(crate) fn close_street(&mut self) -> HandResult<Transition> {
        loop {
            if let Some(round) = self.current.take() {
                self.completed.push(round);
            }

            let Some(street) = self.street.next() else {
                return Ok(self.complete());
            };
            self.street = street;
            self.current = Some(BettingRound::new(street));
            self.current_bet = 0;
            self.last_raise_size = 0;
            for player in &mut self.players {
                player.reset_for_street();
            }

            match betting::round_status(&self.players) {
                RoundStatus::HandOver => return Ok(self.complete()),
                RoundStatus::Closed => {
                    info!("{street}: no betting left, running it out");
                    continue;
                }
                RoundStatus::Open => {
                    let seat = postflop_first_to_act(self.positions.dealer, &self.actionable_seats());
                    self.put_on_turn(seat);
                    info!("{street}: seat {} to act, pot {}", seat + 1, self.pot);
                    return Ok(Transition::StreetAdvanced { street, seat });
                }
            }
        }
    }

    /// Finish the hand. A lone live player wins by fold-out; anything else
    /// goes to showdown.
    pub(crate) fn complete(&mut self) -> Transition {
        if let Some(round) = self.current.take() {
            self.completed.push(round);
        }
        for player in &mut self.players {
            player.on_turn = false;
        }

        let mut live = self.players.iter().filter(|p| p.is_live());
        let outcome = match (live.next(), live.next()) {
            (Some(winner), None) => HandOutcome::FoldOut { winner: winner.id },
            _ => HandOutcome::Showdown,
        };
        match outcome {
            HandOutcome::FoldOut { winner } => {
                info!("hand complete: player {winner} wins {} uncontested", self.pot);
            }
            HandOutcome::Showdown => info!("hand complete: showdown for {}", self.pot),
        }

        self.outcome = Some(outcome);
        self.phase = HandPhase::Complete;
        Transition::HandComplete(outcome)
    }
}
