//! Persistence transport for exported hands.
//!
//! A save is a single request with no retry; failures go back to the caller
//! so the operator can retry or re-authenticate.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{StatusCode, header::CONTENT_TYPE};
use std::time::Duration;
use tokio::sync::Mutex;

use super::{
    document::HandHistory,
    errors::{ExportError, ExportResult},
};

/// Default hand server base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5005/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Somewhere a finished hand can be saved
#[async_trait]
pub trait HandStore: Send + Sync {
    /// Persist one hand history document
    async fn save(&self, history: &HandHistory) -> ExportResult<()>;
}

/// Saves hands with a JSON `POST {base_url}/hands`
pub struct HttpHandStore {
    base_url: String,
    client: reqwest::Client,
    access_token: Option<String>,
}

impl HttpHandStore {
    /// Create a new store
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Transport` if the HTTP client can't be built.
    pub fn new(base_url: &str, timeout: Duration) -> ExportResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            access_token: None,
        })
    }

    /// Attach a bearer token to every save
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn hands_url(&self) -> String {
        format!("{}/hands", self.base_url)
    }
}

#[async_trait]
impl HandStore for HttpHandStore {
    async fn save(&self, history: &HandHistory) -> ExportResult<()> {
        let url = self.hands_url();
        debug!("saving hand {} to {url}", history.game_number);

        let body = encode(history)?;
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ExportError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(ExportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("saved hand {}", history.game_number);
        Ok(())
    }
}

/// JSON request body for one hand.
pub(crate) fn encode(history: &HandHistory) -> ExportResult<Vec<u8>> {
    Ok(serde_json::to_vec(history)?)
}

/// Keeps saved hands in memory
#[derive(Default)]
pub struct MemoryHandStore {
    hands: Mutex<Vec<HandHistory>>,
}

impl MemoryHandStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hand saved so far, oldest first
    pub async fn hands(&self) -> Vec<HandHistory> {
        self.hands.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.hands.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hands.lock().await.is_empty()
    }
}

#[async_trait]
impl HandStore for MemoryHandStore {
    async fn save(&self, history: &HandHistory) -> ExportResult<()> {
        self.hands.lock().await.push(history.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        export::{ExportSettings, export_hand},
        game::{GameConfig, HandState, entities::SeatedPlayer},
    };

    #[test]
    fn test_hands_url_strips_trailing_slash() {
        let store = HttpHandStore::new("http://localhost:5005/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(store.hands_url(), "http://localhost:5005/api/hands");
    }

    #[test]
    fn test_request_body_is_the_document() {
        let roster = vec![
            SeatedPlayer::new(1, 0, "hero", 100),
            SeatedPlayer::new(2, 1, "villain", 100),
        ];
        let hand = HandState::start(GameConfig::default(), &roster).unwrap();
        let history = export_hand(&hand, &ExportSettings::default());

        let body = encode(&history).unwrap();
        let back: HandHistory = serde_json::from_slice(&body).unwrap();
        assert_eq!(back, history);
    }

    #[tokio::test]
    async fn test_memory_store_keeps_order() {
        let store = MemoryHandStore::new();
        assert!(store.is_empty().await);
        let roster = vec![
            SeatedPlayer::new(1, 0, "hero", 100),
            SeatedPlayer::new(2, 1, "villain", 100),
        ];
        for dealer in [0, 1] {
            let hand = HandState::start(GameConfig::default().with_dealer(dealer), &roster).unwrap();
            store
                .save(&export_hand(&hand, &ExportSettings::default()))
                .await
                .unwrap();
        }
        let hands = store.hands().await;
        assert_eq!(store.len().await, 2);
        assert_eq!(hands[0].dealer_seat, 1);
        assert_eq!(hands[1].dealer_seat, 2);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines; the connection is refused.
        let store = HttpHandStore::new("http://127.0.0.1:9/api", Duration::from_secs(2))
            .unwrap()
            .with_token("secret");
        let roster = vec![
            SeatedPlayer::new(1, 0, "hero", 100),
            SeatedPlayer::new(2, 1, "villain", 100),
        ];
        let hand = HandState::start(GameConfig::default(), &roster).unwrap();
        let history = export_hand(&hand, &ExportSettings::default());
        let err = store.save(&history).await.unwrap_err();
        assert!(matches!(err, ExportError::Transport(_)));
        assert!(err.is_retryable());
    }
}
