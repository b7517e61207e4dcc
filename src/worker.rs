use crate::backend::{ChatRequest, DashboardBackend, UploadRequest};
use crate::event::AppEvent;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;

/// Runs backend calls on the tokio runtime and reports each result as an
/// `AppEvent`. Callers gate concurrency; this type does not queue.
#[derive(Clone)]
pub struct BackendWorker {
    backend: Arc<dyn DashboardBackend>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl BackendWorker {
    pub fn new(
        backend: Arc<dyn DashboardBackend>,
        tx: mpsc::Sender<AppEvent>,
        runtime_handle: Handle,
    ) -> Self {
        Self {
            backend,
            tx,
            runtime_handle,
        }
    }

    pub fn upload(&self, request: UploadRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let result = backend.upload(request).await;
            if tx.send(AppEvent::UploadFinished(result)).is_err() {
                tracing::warn!("upload finished after the window closed");
            }
        });
    }

    pub fn chat(&self, request: ChatRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let result = backend.chat(request).await;
            if tx.send(AppEvent::ChatFinished(result)).is_err() {
                tracing::warn!("chat reply arrived after the window closed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::BackendWorker;
    use crate::backend::testing::ScriptedBackend;
    use crate::backend::{ChatReply, LogFile, UploadOutcome, UploadRequest};
    use crate::chat::ChatSession;
    use crate::context::{DashboardContext, Server};
    use crate::event::AppEvent;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    #[tokio::test]
    async fn results_are_delivered_over_the_channel() {
        let backend = ScriptedBackend::new();
        backend
            .push_upload(Ok(UploadOutcome::Created {
                dashboard_name: Some("Test".to_string()),
                dashboard_url: None,
            }))
            .push_chat(Ok(ChatReply {
                response: Some("ok".to_string()),
            }));
        let (tx, rx) = mpsc::channel();
        let worker = BackendWorker::new(Arc::new(backend), tx, tokio::runtime::Handle::current());

        worker.upload(UploadRequest {
            file: LogFile::new("log.csv", vec![1u8, 2]),
            dashboard_name: "Test".to_string(),
            server: Server::Air,
            selection: None,
        });
        let event = tokio::task::spawn_blocking(move || {
            rx.recv_timeout(Duration::from_secs(5)).map(|event| (event, rx))
        })
        .await
        .expect("blocking task should join")
        .expect("upload event should arrive");
        let (event, rx) = event;
        assert!(matches!(
            event,
            AppEvent::UploadFinished(Ok(UploadOutcome::Created { .. }))
        ));

        let mut session = ChatSession::new();
        let context = DashboardContext::new();
        let request = session
            .begin_send("hello", &context)
            .expect("message is not blank");
        worker.chat(request);
        let event = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .expect("blocking task should join")
            .expect("chat event should arrive");
        match event {
            AppEvent::ChatFinished(result) => session.finish_send(result),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(session.messages().last().map(|m| m.text.as_str()), Some("ok"));
    }
}
