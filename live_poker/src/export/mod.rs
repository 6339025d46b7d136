//! Hand-history export and persistence.
//!
//! ## Example
//!
//! ```no_run
//! use live_poker::export::{ExportSettings, HandStore, HttpHandStore, export_hand};
//! use live_poker::game::{GameConfig, HandState, entities::SeatedPlayer};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roster = vec![
//!         SeatedPlayer::new(1, 0, "hero", 500),
//!         SeatedPlayer::new(2, 4, "villain", 500),
//!     ];
//!     let hand = HandState::start(GameConfig::default(), &roster)?;
//!
//!     let store = HttpHandStore::new("http://localhost:5005/api", Duration::from_secs(10))?;
//!     store.save(&export_hand(&hand, &ExportSettings::default())).await?;
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod errors;
pub mod exporter;
pub mod settings;
pub mod store;

pub use document::{HandHistory, PlayerEntry, PlayerWin, PotEntry, SPEC_VERSION};
pub use errors::{ExportError, ExportResult};
pub use exporter::export_hand;
pub use settings::ExportSettings;
pub use store::{DEFAULT_API_URL, DEFAULT_TIMEOUT, HandStore, HttpHandStore, MemoryHandStore};
