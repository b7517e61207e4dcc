use super::wire::{classify_chat, classify_upload};
use super::{ChatReply, ChatRequest, DashboardBackend, UploadOutcome, UploadRequest};
use crate::config::AppConfig;
use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// reqwest-backed client for the dashboard service. No timeout is set here;
/// the transport defaults apply.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    upload_url: String,
    chatbot_url: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            upload_url: config.upload_url(),
            chatbot_url: config.chatbot_url(),
        }
    }

    fn upload_form(request: &UploadRequest) -> Form {
        let file = Part::bytes(request.file.bytes.to_vec()).file_name(request.file.name.clone());
        request
            .text_fields()
            .into_iter()
            .fold(Form::new().part("file", file), |form, (name, value)| {
                form.text(name, value)
            })
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, BackendError> {
        tracing::debug!(
            url = %self.upload_url,
            file = %request.file.name,
            bytes = request.file.len(),
            "posting upload"
        );
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(Self::upload_form(&request))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_upload(status, &body)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, BackendError> {
        tracing::debug!(
            url = %self.chatbot_url,
            analysis_type = request.analysis_type.as_str(),
            "posting chat message"
        );
        let response = self
            .client
            .post(&self.chatbot_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_chat(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::HttpBackend;
    use crate::backend::{
        ChatContext, ChatRequest, DashboardBackend, LogFile, ResolvedSelection, UploadOutcome,
        UploadRequest,
    };
    use crate::chat::AnalysisMode;
    use crate::config::AppConfig;
    use crate::context::{DashboardSelection, Server};
    use crate::error::BackendError;
    use reqwest::Client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answers exactly one request with a canned response and hands back the
    /// raw request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("loopback listener should bind");
        let addr = listener.local_addr().expect("listener has an address");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("client should connect");
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("response should be written");
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = stream.read(&mut chunk).await.expect("request should be readable");
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
            if request_complete(&buf) {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok());
        match content_length {
            Some(length) => buf.len() >= header_end + 4 + length,
            None if headers.contains("transfer-encoding: chunked") => buf.ends_with(b"0\r\n\r\n"),
            None => true,
        }
    }

    fn backend_at(base: String) -> HttpBackend {
        let client = Client::builder()
            .no_proxy()
            .build()
            .expect("client should build");
        HttpBackend::with_client(client, &AppConfig { backend_url: base })
    }

    #[test]
    fn endpoints_follow_configured_base() {
        let config = AppConfig {
            backend_url: "http://dash.internal:9000".to_string(),
        };
        let backend = HttpBackend::new(&config);
        assert_eq!(backend.upload_url, "http://dash.internal:9000/upload/");
        assert_eq!(backend.chatbot_url, "http://dash.internal:9000/chatbot/");
    }

    #[tokio::test]
    async fn upload_sends_file_part_and_form_fields() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"metric_selection_required","available_metrics":["tps"]}"#,
        )
        .await;
        let backend = backend_at(base);

        let outcome = backend
            .upload(UploadRequest {
                file: LogFile::new("log.csv", b"ts,cpu\n1,2\n".to_vec()),
                dashboard_name: "Test".to_string(),
                server: Server::Air,
                selection: Some(ResolvedSelection::Metric("tps".to_string())),
            })
            .await
            .expect("upload should succeed");
        assert_eq!(
            outcome,
            UploadOutcome::MetricSelectionRequired(vec!["tps".to_string()])
        );

        let request = server.await.expect("server task should join");
        assert!(request.starts_with("POST /upload/ "));
        assert!(request.contains(r#"name="file"; filename="log.csv""#));
        assert!(request.contains("ts,cpu\n1,2\n"));
        assert!(request.contains(r#"name="dashboard_name""#));
        assert!(request.contains(r#"name="server_name""#));
        assert!(request.contains("AIR"));
        assert!(request.contains(r#"name="selected_metric""#));
    }

    #[tokio::test]
    async fn rejected_upload_carries_detail() {
        let (base, server) =
            serve_once("500 Internal Server Error", r#"{"detail":"bad file"}"#).await;
        let backend = backend_at(base);

        let err = backend
            .upload(UploadRequest {
                file: LogFile::new("log.csv", vec![1u8]),
                dashboard_name: "Test".to_string(),
                server: Server::Sdp,
                selection: None,
            })
            .await
            .expect_err("500 should fail");
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 500,
                detail: Some("bad file".to_string()),
            }
        );
        server.await.expect("server task should join");
    }

    #[tokio::test]
    async fn chat_posts_json_and_maps_failed_status() {
        let (base, server) = serve_once("503 Service Unavailable", "{}").await;
        let backend = backend_at(base);
        let selection = DashboardSelection {
            server: Some(Server::Occ),
            dashboard: "Test".to_string(),
            ..Default::default()
        };

        let err = backend
            .chat(ChatRequest {
                message: "hi".to_string(),
                analysis_type: AnalysisMode::General,
                context: ChatContext::snapshot(&selection, AnalysisMode::General),
            })
            .await
            .expect_err("503 should fail");
        assert_eq!(err, BackendError::Status(503));

        let request = server.await.expect("server task should join");
        assert!(request.starts_with("POST /chatbot/ "));
        assert!(request.contains(r#""message":"hi""#));
        assert!(request.contains(r#""analysis_type":"general""#));
        assert!(request.contains(r#""server":"OCC""#));
    }
}
