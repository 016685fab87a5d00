//! Posts a message to a HipChat room.
//!
//! One request per call, no retries. Success and failure are decided by the
//! JSON body: an `error.message` field means the API rejected the message.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SendError};

/// Outcome of a delivery attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The API accepted the message.
    Sent,
    /// The message was empty, so nothing was sent.
    Skipped,
}

/// Request body for `POST /v2/room/{room}/message`.
#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// Builds the room notification endpoint.
///
/// The room is inserted as given; the API accepts both IDs and names.
#[must_use]
pub fn room_message_url(base_url: &str, room: &str) -> String {
    format!("{base_url}/v2/room/{room}/message")
}

/// HipChat message sender bound to a resolved configuration.
#[derive(Debug)]
pub struct Sender<'a> {
    client: Client,
    config: &'a Config,
}

impl<'a> Sender<'a> {
    /// Creates a sender for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &'a Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("hipcat/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SendError::from)?;

        Ok(Self { client, config })
    }

    /// Sends `message` to `room`.
    ///
    /// An empty message is not sent and yields [`Delivery::Skipped`]. The
    /// access token is only resolved when a request is actually made.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the access token is missing, and a
    /// send error if the request fails or the API reports an error.
    pub async fn send(&self, room: &str, message: &str) -> Result<Delivery> {
        if message.is_empty() {
            debug!(room, "empty message, nothing to send");
            return Ok(Delivery::Skipped);
        }

        let token = self.config.access_token()?;
        let url = room_message_url(self.config.base_url(), room);
        debug!(%url, bytes = message.len(), "posting message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&MessageBody { message })
            .send()
            .await
            .map_err(SendError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(SendError::from)?;
        debug!(status = status.as_u16(), "received response");

        interpret_response(status, &body)?;
        Ok(Delivery::Sent)
    }
}

/// Decides whether a response body signals failure.
///
/// A JSON `error` object fails with its `message`. A JSON body without one
/// succeeds whatever the status. A body that is not JSON fails only when the
/// status is not a success.
fn interpret_response(status: StatusCode, body: &str) -> std::result::Result<(), SendError> {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("error") {
            Some(error) => {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| error.to_string(), str::to_string);
                Err(SendError::Api(message))
            }
            None => Ok(()),
        },
        Err(_) if status.is_success() => Ok(()),
        Err(_) => Err(SendError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        }),
    }
}
