//! Asynchronous user messages.
//!
//! The backend records user-facing fault messages for async failures
//! (e.g. a share that went to `error` during creation). Tests wait for
//! the message referencing a resource instead of scraping backend logs.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{Message, MessageEnvelope, MessagesEnvelope};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `GET /messages/{id}`
    pub async fn get_message(&self, message_id: &str) -> Result<Message, ApiError> {
        let raw = self
            .rest
            .get(&format!("messages/{message_id}"), StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<MessageEnvelope>(&raw)?.message)
    }

    /// `GET /messages`, optionally with query filters.
    pub async fn list_messages(&self, query: &[(&str, &str)]) -> Result<Vec<Message>, ApiError> {
        let mut opts = RequestOpts::default();
        for (key, value) in query {
            opts = opts.with_query(*key, *value);
        }
        let raw = self.rest.get("messages", StatusCode::OK, opts).await?;
        Ok(serde_json::from_str::<MessagesEnvelope>(&raw)?.messages)
    }

    /// `DELETE /messages/{id}`
    pub async fn delete_message(&self, message_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("messages/{message_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Block until a message referencing `resource_id` appears.
    ///
    /// Messages have no status attribute to poll, so this carries its own
    /// loop with the same pacing and second-granularity budget as
    /// [`crate::wait::wait_for_status`].
    pub async fn wait_for_message(&self, resource_id: &str) -> Result<Message, WaitError> {
        let config = self.wait_config();
        let start = tokio::time::Instant::now();
        loop {
            let mut messages = self.list_messages(&[("resource_id", resource_id)]).await?;
            if !messages.is_empty() {
                return Ok(messages.remove(0));
            }
            let elapsed_secs = start.elapsed().as_secs();
            if elapsed_secs >= config.timeout.as_secs() {
                return Err(WaitError::Timeout {
                    resource: format!("message for resource {resource_id}"),
                    target: "present".to_string(),
                    budget_secs: config.timeout.as_secs(),
                    elapsed_secs,
                    last_status: "absent".to_string(),
                });
            }
            tokio::time::sleep(config.interval).await;
        }
    }

    /// Whether the message no longer exists.
    pub async fn message_deleted(&self, message_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_message(message_id).await.map(|_| ()))
    }

    /// Block until the message no longer exists.
    pub async fn wait_for_message_deletion(&self, message_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("message {message_id}"),
            self.wait_config(),
            move || async move { self.message_deleted(message_id).await },
        )
        .await
    }
}
