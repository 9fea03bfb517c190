//! # Comment Submission
//!
//! The composer hands finished comments to a [`SubmissionEndpoint`]. The
//! endpoint is the only part of threadline that talks to the outside world;
//! everything else works on the in-memory feed.
//!
//! - [`LoggingEndpoint`]: no backend, logs the payload and accepts it.
//! - [`HttpEndpoint`]: `POST {base_url}/comments` with a JSON body.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file picked from disk or a sticker. Only metadata travels; files are
/// never read or uploaded.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    File { path: String, name: String },
    Sticker { sticker: String },
}

impl Attachment {
    pub fn file(path: &str) -> Self {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Attachment::File {
            path: path.to_string(),
            name,
        }
    }

    pub fn sticker(sticker: &str) -> Self {
        Attachment::Sticker {
            sticker: sticker.to_string(),
        }
    }

    /// Short label for the composer and comment footers.
    pub fn label(&self) -> String {
        match self {
            Attachment::File { name, .. } => format!("📎 {name}"),
            Attachment::Sticker { sticker } => format!("Sticker {sticker}"),
        }
    }
}

/// What the composer sends.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CommentPayload {
    pub user_id: Option<Uuid>,
    pub guest: Option<String>,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub attachment: Option<Attachment>,
    pub comment: String,
}

/// What the endpoint answers with once a comment is stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubmitReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum SubmitError {
    Network(String),
    Status { status: u16, body: String },
    Decode(String),
    Timeout(u64),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Network(e) => write!(f, "network error: {e}"),
            SubmitError::Status { status, body } => {
                write!(f, "endpoint returned {status}: {body}")
            }
            SubmitError::Decode(e) => write!(f, "unreadable response: {e}"),
            SubmitError::Timeout(secs) => write!(f, "no response after {secs}s"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    fn name(&self) -> &str;

    async fn submit(&self, payload: &CommentPayload) -> Result<SubmitReceipt, SubmitError>;
}

/// Accepts every comment locally and writes it to the log.
pub struct LoggingEndpoint;

#[async_trait]
impl SubmissionEndpoint for LoggingEndpoint {
    fn name(&self) -> &str {
        "log"
    }

    async fn submit(&self, payload: &CommentPayload) -> Result<SubmitReceipt, SubmitError> {
        let json = serde_json::to_string(payload)
            .map_err(|e| SubmitError::Decode(e.to_string()))?;
        info!("Comment submitted: {}", json);
        Ok(SubmitReceipt {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        })
    }
}

pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEndpoint {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn comments_url(&self) -> String {
        format!("{}/comments", self.base_url)
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpEndpoint {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(&self, payload: &CommentPayload) -> Result<SubmitReceipt, SubmitError> {
        let url = self.comments_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SubmitReceipt>()
            .await
            .map_err(|e| SubmitError::Decode(e.to_string()))
    }
}
