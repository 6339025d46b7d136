//! Record live poker hands from the terminal.
//!
//! Each line of input is one command: seat players, move the button to start
//! a hand, narrate the action, and save the hand when it's over.

use anyhow::{Context, Result};
use live_poker::{
    LiveTable, SeatedPlayer,
    export::HttpHandStore,
    game::GameConfig,
};
use log::{debug, info};
use lp_recorder::{
    commands::{Command, parse_command},
    config::{Overrides, RecorderConfig},
};
use pico_args::Arguments;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Record live poker hands and save them to a hand server

USAGE:
  lp_recorder [OPTIONS]

OPTIONS:
  --api-url    URL     Hand server base URL        [default: env LP_API_URL or http://localhost:5005/api]
  --token      TOKEN   Bearer token for saves      [default: env LP_API_TOKEN]
  --timeout    SECS    Save request timeout        [default: env LP_API_TIMEOUT_SECS or 10]
  --fold-delay MS      Pause before a fold lands   [default: env LP_FOLD_DELAY_MS or 800]
  --table      NAME    Table name in exports       [default: env LP_TABLE_NAME or Live Table]

FLAGS:
  -h, --help           Print help information

ENVIRONMENT:
  LP_SITE_NAME, LP_NETWORK_NAME, LP_CURRENCY, LP_HERO_ID
  (A .env file in the working directory is read first)
";

const COMMANDS: &str = "\
  seat SEAT ID NAME STACK     Seat a player (seats 1-9)
  unseat ID                   Remove a player
  stack ID CHIPS              Correct a stack between hands
  config SB BB [ANTE] [BBA]   Stakes for the next hand
  button SEAT                 Move the button and start a hand
  [SEAT] fold|check|call      Action for the player on turn (or SEAT)
  [SEAT] bet N | raise TOTAL
  hole ID CARD...             Record hole cards
  board STREET CARD...        Record flop, turn, or river cards
  show                        Print the table
  export                      Print the hand document
  save                        Save the hand to the server
  quit                        Leave
";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        api_url: pargs.opt_value_from_str("--api-url")?,
        api_token: pargs.opt_value_from_str("--token")?,
        timeout_secs: pargs.opt_value_from_str("--timeout")?,
        fold_delay_ms: pargs.opt_value_from_str("--fold-delay")?,
        table_name: pargs.opt_value_from_str("--table")?,
    };

    env_logger::builder().format_target(false).init();

    let config = RecorderConfig::from_env(overrides).context("Invalid configuration")?;
    info!("Saving hands to {}", config.api_url);

    run(config).await
}

async fn run(config: RecorderConfig) -> Result<()> {
    let mut store = HttpHandStore::new(&config.api_url, config.timeout)
        .context("Failed to build HTTP client")?;
    if let Some(token) = &config.api_token {
        store = store.with_token(token.clone());
    }
    let mut table = LiveTable::new(GameConfig::default(), config.export.clone());

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!("command: {command:?}");
        if command == Command::Quit {
            break;
        }
        execute(&mut table, &store, &config, command).await?;
    }
    Ok(())
}

/// Run one command against the table, printing the result.
///
/// Rejections from the table are printed and the session goes on; only
/// terminal I/O problems end it.
async fn execute(
    table: &mut LiveTable,
    store: &HttpHandStore,
    config: &RecorderConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Seat {
            seat,
            id,
            name,
            stack,
        } => match table.seat_player(SeatedPlayer::new(id, seat, &name, stack)) {
            Ok(()) => println!("{name} seated in seat {}", seat + 1),
            Err(err) => println!("{err}"),
        },
        Command::Unseat(id) => match table.unseat_player(id) {
            Ok(player) => println!("{} left the table", player.name),
            Err(err) => println!("{err}"),
        },
        Command::Stack { id, stack } => match table.set_stack(id, stack) {
            Ok(()) => println!("Stack set to {stack}"),
            Err(err) => println!("{err}"),
        },
        Command::Config(stakes) => match table.set_config(stakes) {
            Ok(()) => println!("Stakes change from the next hand"),
            Err(err) => println!("{err}"),
        },
        Command::Button(seat) => match table.move_button(seat) {
            Ok(hand) => print!("{hand}"),
            Err(err) => println!("{err}"),
        },
        Command::Act { seat, action } => {
            let Some(seat) = seat.or_else(|| table.hand().and_then(|hand| hand.on_turn())) else {
                println!("Nobody is on turn");
                return Ok(());
            };
            match table.act(seat, action) {
                Ok(applied) => {
                    println!("{}: {}", applied.record.kind, applied.transition);
                    if let Some(player_id) = applied.pending_fold {
                        tokio::time::sleep(config.fold_delay).await;
                        if let Err(err) = table.finalize_fold(player_id) {
                            println!("{err}");
                        }
                    }
                    if let Some(options) = table.hand().and_then(|hand| hand.options()) {
                        println!("seat {}: {options}", options.seat + 1);
                    }
                }
                Err(err) => println!("{err}"),
            }
        }
        Command::Hole { id, cards } => {
            if let Err(err) = table.deal_hole_cards(id, cards) {
                println!("{err}");
            }
        }
        Command::Board { street, cards } => {
            if let Err(err) = table.deal_community_cards(street, cards) {
                println!("{err}");
            }
        }
        Command::Show => {
            for player in table.roster() {
                println!(
                    "  seat {}: {} ({}) {}",
                    player.seat + 1,
                    player.name,
                    player.id,
                    player.stack
                );
            }
            match table.hand() {
                Some(hand) => print!("{hand}"),
                None => println!("No hand in progress"),
            }
        }
        Command::Export => match table.export() {
            Ok(history) => println!(
                "{}",
                serde_json::to_string_pretty(&history).context("Failed to encode hand")?
            ),
            Err(err) => println!("{}", err.client_message()),
        },
        Command::Save => match table.save(store).await {
            Ok(history) => println!("Hand {} saved", history.game_number),
            Err(err) => println!("{}", err.client_message()),
        },
        Command::Help => print!("{COMMANDS}"),
        Command::Quit => {}
    }
    Ok(())
}
