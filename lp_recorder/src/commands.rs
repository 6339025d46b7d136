use live_poker::{
    GameConfig,
    entities::{CardToken, Chips, PlayerAction, PlayerId, Seat, Street},
};
use std::fmt;

/// Operator commands understood by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Seat a player between hands.
    Seat {
        seat: Seat,
        id: PlayerId,
        name: String,
        stack: Chips,
    },
    Unseat(PlayerId),
    Stack {
        id: PlayerId,
        stack: Chips,
    },
    /// Stakes for the next hand. The button seat is ignored.
    Config(GameConfig),
    /// Move the button, which starts a new hand.
    Button(Seat),
    /// Action for `seat`, or for whoever is on turn.
    Act {
        seat: Option<Seat>,
        action: PlayerAction,
    },
    Hole {
        id: PlayerId,
        cards: Vec<CardToken>,
    },
    Board {
        street: Street,
        cards: Vec<CardToken>,
    },
    Show,
    Export,
    Save,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was typed.
    Empty,
    /// A numeric argument didn't parse.
    InvalidNumber { what: &'static str, value: String },
    /// Seat outside 1-9.
    InvalidSeat(String),
    /// Board street must be flop, turn, or river.
    InvalidStreet(String),
    /// Required arguments missing; carries the usage line.
    Usage(&'static str),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Type a command, or 'help' to see them all"),
            Self::InvalidNumber { what, value } => {
                write!(f, "Invalid {what} '{value}'. Must be a whole number")
            }
            Self::InvalidSeat(value) => {
                write!(f, "Invalid seat '{value}'. Seats are numbered 1 to 9")
            }
            Self::InvalidStreet(value) => write!(
                f,
                "Invalid street '{value}'. Use 'flop', 'turn', or 'river'"
            ),
            Self::Usage(usage) => write!(f, "Usage: {usage}"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one line of operator input.
///
/// Seats are typed one-indexed and returned zero-indexed. An action may be
/// prefixed with the acting seat (`4 raise 60`); without it the action goes
/// to whoever is on turn.
///
/// # Examples
///
/// ```
/// use lp_recorder::commands::{Command, parse_command};
/// use live_poker::entities::PlayerAction;
///
/// assert_eq!(
///     parse_command("raise 60"),
///     Ok(Command::Act { seat: None, action: PlayerAction::Raise(60) })
/// );
/// assert_eq!(
///     parse_command("4 fold"),
///     Ok(Command::Act { seat: Some(3), action: PlayerAction::Fold })
/// );
/// assert_eq!(parse_command("button 1"), Ok(Command::Button(0)));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    let Some((&first, rest)) = parts.split_first() else {
        return Err(ParseError::Empty);
    };

    if first.chars().all(|c| c.is_ascii_digit()) {
        let seat = parse_seat(first)?;
        let action = match rest.split_first() {
            Some((&verb, args)) => parse_action(verb, args)?,
            None => None,
        };
        return action
            .map(|action| Command::Act {
                seat: Some(seat),
                action,
            })
            .ok_or(ParseError::Usage("SEAT fold|check|call|bet N|raise N"));
    }

    if let Some(action) = parse_action(first, rest)? {
        return Ok(Command::Act { seat: None, action });
    }

    match first {
        "seat" => parse_seat_command(rest),
        "unseat" => match rest {
            [id] => Ok(Command::Unseat(parse_number("player id", id)?)),
            _ => Err(ParseError::Usage("unseat ID")),
        },
        "stack" => match rest {
            [id, stack] => Ok(Command::Stack {
                id: parse_number("player id", id)?,
                stack: parse_number("stack", stack)?,
            }),
            _ => Err(ParseError::Usage("stack ID CHIPS")),
        },
        "config" => parse_config_command(rest),
        "button" => match rest {
            [seat] => Ok(Command::Button(parse_seat(seat)?)),
            _ => Err(ParseError::Usage("button SEAT")),
        },
        "hole" => match rest {
            [id, cards @ ..] if !cards.is_empty() => Ok(Command::Hole {
                id: parse_number("player id", id)?,
                cards: cards.iter().map(|c| c.to_string()).collect(),
            }),
            _ => Err(ParseError::Usage("hole ID CARD...")),
        },
        "board" => match rest {
            [street, cards @ ..] if !cards.is_empty() => Ok(Command::Board {
                street: parse_street(street)?,
                cards: cards.iter().map(|c| c.to_string()).collect(),
            }),
            _ => Err(ParseError::Usage("board flop|turn|river CARD...")),
        },
        "show" => Ok(Command::Show),
        "export" => Ok(Command::Export),
        "save" => Ok(Command::Save),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    }
}

/// Parse an action verb. Returns `None` if `verb` isn't an action.
fn parse_action(verb: &str, args: &[&str]) -> Result<Option<PlayerAction>, ParseError> {
    let action = match (verb, args) {
        ("fold", []) => PlayerAction::Fold,
        ("check", []) => PlayerAction::Check,
        ("call", []) => PlayerAction::Call,
        ("bet", [amount]) => PlayerAction::Bet(parse_number("bet amount", amount)?),
        ("raise", [amount]) => PlayerAction::Raise(parse_number("raise amount", amount)?),
        ("bet", _) => return Err(ParseError::Usage("bet AMOUNT")),
        ("raise", _) => return Err(ParseError::Usage("raise TOTAL")),
        ("fold" | "check" | "call", _) => return Err(ParseError::Usage("fold|check|call")),
        _ => return Ok(None),
    };
    Ok(Some(action))
}

/// Parse "seat SEAT ID NAME STACK"
fn parse_seat_command(args: &[&str]) -> Result<Command, ParseError> {
    match args {
        [seat, id, name, stack] => Ok(Command::Seat {
            seat: parse_seat(seat)?,
            id: parse_number("player id", id)?,
            name: name.to_string(),
            stack: parse_number("stack", stack)?,
        }),
        _ => Err(ParseError::Usage("seat SEAT ID NAME STACK")),
    }
}

/// Parse "config SB BB [ANTE] [BB_ANTE]". A big blind ante makes it a
/// tournament.
fn parse_config_command(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "config SB BB [ANTE] [BB_ANTE]";
    let numbers = args
        .iter()
        .map(|value| parse_number("amount", value))
        .collect::<Result<Vec<Chips>, _>>()?;
    let (small_blind, big_blind, ante, big_blind_ante) = match numbers.as_slice() {
        [sb, bb] => (*sb, *bb, 0, 0),
        [sb, bb, ante] => (*sb, *bb, *ante, 0),
        [sb, bb, ante, bb_ante] => (*sb, *bb, *ante, *bb_ante),
        _ => return Err(ParseError::Usage(USAGE)),
    };
    Ok(Command::Config(GameConfig {
        small_blind,
        big_blind,
        ante,
        big_blind_ante,
        is_tournament: big_blind_ante > 0,
        dealer_seat: 0,
    }))
}

fn parse_number<T: std::str::FromStr>(what: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|_| ParseError::InvalidNumber {
        what,
        value: value.to_string(),
    })
}

/// One-indexed input, zero-indexed result.
fn parse_seat(value: &str) -> Result<Seat, ParseError> {
    match value.parse::<Seat>() {
        Ok(seat @ 1..=9) => Ok(seat - 1),
        _ => Err(ParseError::InvalidSeat(value.to_string())),
    }
}

fn parse_street(value: &str) -> Result<Street, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "flop" => Ok(Street::Flop),
        "turn" => Ok(Street::Turn),
        "river" => Ok(Street::River),
        _ => Err(ParseError::InvalidStreet(value.to_string())),
    }
}
