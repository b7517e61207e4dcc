use crate::backend::{ChatReply, UploadOutcome};
use crate::error::BackendError;

/// Results handed from background tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    UploadFinished(Result<UploadOutcome, BackendError>),
    ChatFinished(Result<ChatReply, BackendError>),
}
