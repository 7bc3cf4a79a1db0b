//! Azure Queue Storage client speaking the REST "Put Message" operation,
//! authorized with Shared Key.

use async_trait::async_trait;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqsign::{AzureStorageCredential, AzureStorageSigner};
use url::Url;

use super::{MessageQueue, QueueError};
use crate::config::StorageConfig;

const XML_CONTENT_TYPE: &str = "application/xml";

pub struct AzureQueueClient {
    http: reqwest::Client,
    signer: AzureStorageSigner,
    credential: AzureStorageCredential,
    queue_name: String,
    messages_url: Url,
}

impl AzureQueueClient {
    pub fn new(storage: &StorageConfig, queue_name: &str) -> Result<Self, QueueError> {
        let raw = format!("{}/{}/messages", storage.queue_endpoint, queue_name);
        let messages_url = Url::parse(&raw).map_err(|e| QueueError::InvalidEndpoint {
            endpoint: storage.queue_endpoint.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(storage.queue_request_timeout)
            .build()?;

        Ok(Self {
            http,
            signer: AzureStorageSigner::new(),
            credential: AzureStorageCredential::SharedKey(
                storage.account_name.clone(),
                storage.account_key.to_base64(),
            ),
            queue_name: queue_name.to_string(),
            messages_url,
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Request head of a Put Message call carrying `content_length` body
    /// bytes, signed with the account's Shared Key.
    fn signed_parts(&self, content_length: usize) -> Result<http::request::Parts, QueueError> {
        let mut request = http::Request::post(self.messages_url.as_str())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header(CONTENT_LENGTH, content_length)
            .body(())?;

        self.signer
            .sign(&mut request, &self.credential)
            .map_err(|e| QueueError::Signing(e.to_string()))?;

        let (parts, ()) = request.into_parts();
        Ok(parts)
    }
}

/// The Put Message body. Message text is restricted to the base64 alphabet,
/// which needs no XML escaping.
fn message_body(message_text: &str) -> Result<String, QueueError> {
    if let Some(c) = message_text
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')))
    {
        return Err(QueueError::InvalidMessage(format!(
            "unexpected character {:?}",
            c
        )));
    }

    Ok(format!(
        "<QueueMessage><MessageText>{}</MessageText></QueueMessage>",
        message_text
    ))
}

#[async_trait]
impl MessageQueue for AzureQueueClient {
    async fn send_message(&self, message_text: &str) -> Result<(), QueueError> {
        let body = message_body(message_text)?;
        let parts = self.signed_parts(body.len())?;

        // reqwest derives Content-Length from the body itself
        let mut request = self.http.post(self.messages_url.clone()).body(body);
        for (name, value) in parts.headers.iter() {
            if *name != CONTENT_LENGTH {
                request = request.header(name.as_str(), value.as_bytes());
            }
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueueError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(queue = %self.queue_name, status = %status, "Queue accepted message");

        Ok(())
    }
}
