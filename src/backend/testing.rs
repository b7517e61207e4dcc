use super::{ChatReply, ChatRequest, DashboardBackend, UploadOutcome, UploadRequest};
use crate::error::BackendError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory backend that replays scripted results and records requests.
#[derive(Default)]
pub struct ScriptedBackend {
    uploads: Mutex<VecDeque<Result<UploadOutcome, BackendError>>>,
    chats: Mutex<VecDeque<Result<ChatReply, BackendError>>>,
    upload_requests: Mutex<Vec<UploadRequest>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_upload(&self, result: Result<UploadOutcome, BackendError>) -> &Self {
        self.uploads
            .lock()
            .expect("upload script lock poisoned")
            .push_back(result);
        self
    }

    pub fn push_chat(&self, result: Result<ChatReply, BackendError>) -> &Self {
        self.chats
            .lock()
            .expect("chat script lock poisoned")
            .push_back(result);
        self
    }

    pub fn upload_requests(&self) -> Vec<UploadRequest> {
        self.upload_requests
            .lock()
            .expect("upload log lock poisoned")
            .clone()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests
            .lock()
            .expect("chat log lock poisoned")
            .clone()
    }
}

#[async_trait]
impl DashboardBackend for ScriptedBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, BackendError> {
        self.upload_requests
            .lock()
            .expect("upload log lock poisoned")
            .push(request);
        self.uploads
            .lock()
            .expect("upload script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted upload".to_string())))
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, BackendError> {
        self.chat_requests
            .lock()
            .expect("chat log lock poisoned")
            .push(request);
        self.chats
            .lock()
            .expect("chat script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".to_string())))
    }
}
