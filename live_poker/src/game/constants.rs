use super::entities::Chips;

/// Live tables are recorded on a fixed nine-seat ring.
pub const TABLE_SIZE: usize = 9;

/// A hand needs at least two funded players.
pub const MIN_PLAYERS: usize = 2;

/// Largest stack or stake the ledger accepts. A full table of maximum
/// stacks still fits in `Chips`.
pub const MAX_CHIPS: Chips = 1_000_000_000_000;

pub const DEFAULT_SMALL_BLIND: Chips = 5;
pub const DEFAULT_BIG_BLIND: Chips = 2 * DEFAULT_SMALL_BLIND;
