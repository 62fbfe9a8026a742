//! LLM Client — OpenAI-compatible chat completions.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for chat completions.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// OpenAI or anything speaking the same `/v1/chat/completions` dialect.
    OpenAiCompatible { base_url: String, api_key: String },
    /// No collaborator. All calls return `NotConfigured`.
    None,
}

/// The chat client.
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The API key stays out of debug output.
        let provider = match &self.provider {
            LlmProvider::OpenAiCompatible { base_url, .. } => base_url.as_str(),
            LlmProvider::None => "none",
        };
        f.debug_struct("LlmClient")
            .field("provider", &provider)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
        }
    }

    /// Create a client with no backend (all calls fail → local fallback).
    #[must_use]
    pub fn none() -> Self {
        Self {
            provider: LlmProvider::None,
            http: Client::new(),
            model: String::new(),
            max_retries: 0,
        }
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a reply.
    ///
    /// Returns `Err` if no provider is configured, the provider cannot be
    /// reached, or the response is not a usable completion. The caller should
    /// fall back to a local reply on error.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::NotConfigured(
                "no chat provider or API key configured".into(),
            )),
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                self.generate_openai(base_url, api_key, request).await
            }
        }
    }

    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        if self.model.is_empty() {
            return Err(LlmError::ConfigError("model name is empty".into()));
        }

        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let attempts = self.max_retries + 1;
        let mut last_error = LlmError::RequestFailed("no attempt made".into());
        for attempt in 0..attempts {
            if attempt > 0 {
                debug!("Retrying chat call (attempt {}/{})", attempt + 1, attempts);
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .bearer_auth(api_key)
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;

            #[allow(clippy::cast_possible_truncation)]
            let latency_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
                        return self.parse_completion(&json, latency_ms);
                    }

                    last_error = LlmError::RequestFailed(format!("HTTP {status}"));
                    warn!("Chat API returned error: HTTP {}", status);
                    if is_permanent(status) {
                        return Err(last_error);
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        warn!("Chat request timed out after {}ms", request.timeout_ms);
                        last_error = LlmError::Timeout(request.timeout_ms);
                    } else {
                        warn!("Chat request failed: {}", e);
                        last_error = LlmError::from(e);
                    }
                }
            }
        }

        if attempts == 1 {
            return Err(last_error);
        }
        Err(LlmError::RetriesExhausted {
            attempts,
            last_error: last_error.to_string(),
        })
    }

    fn parse_completion(
        &self,
        json: &serde_json::Value,
        latency_ms: u64,
    ) -> Result<LlmResponse, LlmError> {
        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".into())
            })?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::MalformedResponse("empty completion".into()));
        }

        #[allow(clippy::cast_possible_truncation)]
        let tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32;
        let model = json["model"]
            .as_str()
            .map_or_else(|| self.model.clone(), str::to_string);

        debug!(latency_ms, tokens, model = %model, "Chat completion received");

        Ok(LlmResponse {
            text,
            tokens_generated: tokens,
            latency_ms,
            model,
        })
    }
}

/// Client errors that will not change on retry. Rate limiting is the exception.
fn is_permanent(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    use super::*;

    /// Read one HTTP request (headers plus `Content-Length` body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve the canned `(status line, body)` responses in order, one per
    /// connection, forwarding each raw request to the returned channel.
    async fn stub_server(
        responses: Vec<(&'static str, String)>,
    ) -> (String, mpsc::UnboundedReceiver<String>, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = mpsc::unbounded_channel();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_task = Arc::clone(&hits);

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                hits_task.fetch_add(1, Ordering::SeqCst);
                let request = read_request(&mut stream).await;
                let _ = tx.send(request);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{addr}"), rx, hits)
    }

    fn completion(content: &str) -> String {
        json!({
            "model": "gpt-4o-mini",
            "choices": [{ "message": { "role": "assistant", "content": content } }],
            "usage": { "completion_tokens": 12 }
        })
        .to_string()
    }

    fn client_for(base_url: String, max_retries: u32) -> LlmClient {
        LlmClient::new(
            LlmProvider::OpenAiCompatible {
                base_url,
                api_key: "sk-test".into(),
            },
            "gpt-4o-mini",
            max_retries,
        )
    }

    fn request() -> LlmRequest {
        LlmRequest::new("You are Jimbruz.", "hello").with_timeout(2_000)
    }

    #[tokio::test]
    async fn none_provider_is_not_configured() {
        let client = LlmClient::none();
        assert!(!client.is_available());
        let err = client.generate(&request()).await.expect_err("should fail");
        assert!(matches!(err, LlmError::NotConfigured(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn successful_completion_is_trimmed() {
        let (url, mut requests, _) =
            stub_server(vec![("200 OK", completion("  The snow is quiet.\n"))]).await;
        let client = client_for(url, 0);

        let resp = client.generate(&request()).await.expect("generate");
        assert_eq!(resp.text, "The snow is quiet.");
        assert_eq!(resp.tokens_generated, 12);
        assert_eq!(resp.model, "gpt-4o-mini");

        let raw = requests.recv().await.expect("request captured");
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains("\"temperature\":0.85"));
        assert!(raw.contains("\"max_tokens\":200"));
        assert!(raw.contains("You are Jimbruz."));
    }

    #[tokio::test]
    async fn missing_choices_is_malformed() {
        let (url, _rx, _) = stub_server(vec![("200 OK", json!({ "choices": [] }).to_string())]).await;
        let err = client_for(url, 0)
            .generate(&request())
            .await
            .expect_err("should fail");
        assert!(matches!(err, LlmError::MalformedResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (url, _rx, _) = stub_server(vec![("200 OK", "<html>oops</html>".to_string())]).await;
        let err = client_for(url, 0)
            .generate(&request())
            .await
            .expect_err("should fail");
        assert!(matches!(err, LlmError::MalformedResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn blank_content_is_malformed() {
        let (url, _rx, _) = stub_server(vec![("200 OK", completion("   "))]).await;
        let err = client_for(url, 0)
            .generate(&request())
            .await
            .expect_err("should fail");
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let (url, _rx, hits) = stub_server(vec![
            ("503 Service Unavailable", "{}".to_string()),
            ("200 OK", completion("Second time lucky.")),
        ])
        .await;
        let resp = client_for(url, 1)
            .generate(&request())
            .await
            .expect("generate after retry");
        assert_eq!(resp.text, "Second time lucky.");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_report_attempts() {
        let (url, _rx, hits) = stub_server(vec![
            ("500 Internal Server Error", "{}".to_string()),
            ("500 Internal Server Error", "{}".to_string()),
        ])
        .await;
        let err = client_for(url, 1)
            .generate(&request())
            .await
            .expect_err("should fail");
        match err {
            LlmError::RetriesExhausted { attempts, last_error } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let (url, _rx, hits) = stub_server(vec![
            ("401 Unauthorized", "{}".to_string()),
            ("200 OK", completion("should never be served")),
        ])
        .await;
        let err = client_for(url, 3)
            .generate(&request())
            .await
            .expect_err("should fail");
        assert!(matches!(err, LlmError::RequestFailed(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        // Bind then drop to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let err = client_for(format!("http://{addr}"), 0)
            .generate(&request())
            .await
            .expect_err("should fail");
        assert!(err.is_transient(), "got {err:?}");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = client_for("https://api.example.com".into(), 0);
        let dbg = format!("{client:?}");
        assert!(dbg.contains("api.example.com"));
        assert!(!dbg.contains("sk-test"));
    }
}
