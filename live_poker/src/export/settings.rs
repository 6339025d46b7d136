//! Header fields that come from the table rather than the hand.

use serde::{Deserialize, Serialize};

use crate::game::entities::PlayerId;

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Room or venue name
    pub site_name: String,

    /// Network name (default: "Live Game")
    pub network_name: String,

    /// Table name (default: "Live Table")
    pub table_name: String,

    /// Currency code (default: "USD")
    pub currency: String,

    /// Player id of the operator's own seat (default: 1)
    pub hero_player_id: PlayerId,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            site_name: "Live Poker".to_string(),
            network_name: "Live Game".to_string(),
            table_name: "Live Table".to_string(),
            currency: "USD".to_string(),
            hero_player_id: 1,
        }
    }
}
