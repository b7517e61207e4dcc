//! Client side of the dashboard backend: the `/upload/` and `/chatbot/`
//! endpoints behind a trait so the state machines can run against the real
//! HTTP service or a scripted stand-in.

use crate::context::Server;
use crate::error::BackendError;
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

pub mod http;
pub mod wire;

#[cfg(test)]
pub mod testing;

pub use http::HttpBackend;
pub use wire::{CategoryOption, ChatContext, ChatReply, ChatRequest, UploadOutcome};

/// A log file picked by the user. Bytes are shared so resubmissions after a
/// selection round do not copy the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl LogFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.log")
            .to_string();
        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The answer to a disambiguation round, sent back with the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSelection {
    Metric(String),
    Category(String),
    Columns(Vec<String>),
}

impl ResolvedSelection {
    /// Multipart field carrying this selection.
    pub fn form_field(&self) -> (&'static str, String) {
        match self {
            Self::Metric(metric) => ("selected_metric", metric.clone()),
            Self::Category(category) => ("selected_category", category.clone()),
            Self::Columns(columns) => ("selected_columns", columns.join(",")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: LogFile,
    pub dashboard_name: String,
    pub server: Server,
    pub selection: Option<ResolvedSelection>,
}

impl UploadRequest {
    /// Text fields of the multipart body, in submission order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("dashboard_name", self.dashboard_name.clone()),
            ("server_name", self.server.as_str().to_string()),
        ];
        if let Some(selection) = &self.selection {
            fields.push(selection.form_field());
        }
        fields
    }
}

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, BackendError>;

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, BackendError>;
}
