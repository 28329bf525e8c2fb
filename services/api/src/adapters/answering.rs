//! services/api/src/adapters/answering.rs
//!
//! This module contains the HTTP adapter for the external Answering Service.
//! It implements the `AnsweringService` port from the `core` crate. The
//! service's retrieval and indexing behavior is opaque to us; we only relay
//! requests and responses over its small HTTP/JSON surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use policy_portal_core::domain::{Answer, Citation, UploadedDocument};
use policy_portal_core::ports::{AnsweringService, PortError, PortResult};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct AskPayload<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct AskReply {
    answer: String,
    #[serde(default)]
    sources: Vec<SourceRecord>,
}

/// The citation shape the Answering Service emits; `source` is the stored
/// document name.
#[derive(Deserialize)]
struct SourceRecord {
    source: String,
    page: Option<u32>,
}

impl SourceRecord {
    fn to_domain(self) -> Citation {
        Citation {
            document_name: self.source,
            page: self.page,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnsweringService` over plain HTTP/JSON.
#[derive(Clone)]
pub struct HttpAnsweringAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnsweringAdapter {
    /// Creates a new `HttpAnsweringAdapter` rooted at the service's base URL.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

//=========================================================================================
// `AnsweringService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnsweringService for HttpAnsweringAdapter {
    async fn ask(&self, question: &str) -> PortResult<Answer> {
        let response = self
            .client
            .post(self.endpoint("ask"))
            .json(&AskPayload { question })
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Answering service /ask returned {}", response.status());
            return Err(PortError::Upstream(format!(
                "ask returned status {}",
                response.status()
            )));
        }

        let reply: AskReply = response
            .json()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        Ok(Answer {
            answer: reply.answer,
            sources: reply
                .sources
                .into_iter()
                .map(SourceRecord::to_domain)
                .collect(),
        })
    }

    async fn upload_document(&self, document: UploadedDocument) -> PortResult<()> {
        let part = reqwest::multipart::Part::bytes(document.content)
            .file_name(document.file_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            warn!(
                "Answering service /upload returned {} for '{}'",
                response.status(),
                document.file_name
            );
            return Err(PortError::Upstream(format!(
                "upload of '{}' returned status {}",
                document.file_name,
                response.status()
            )));
        }
        Ok(())
    }

    async fn reingest(&self) -> PortResult<()> {
        let response = self
            .client
            .post(self.endpoint("reingest"))
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Answering service /reingest returned {}", response.status());
            return Err(PortError::Upstream(format!(
                "reingest returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
