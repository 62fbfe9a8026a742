//! Companion — the pet together with its chat collaborator.
//!
//! Everything except `ask` is a straight pass-through to [`Pet`]. `ask`
//! tries the collaborator first and falls back to a local reply on any
//! error; either way exactly one memory entry is written.

use jimbruz_core::memory::MemoryEntry;
use jimbruz_core::pet::Pet;
use jimbruz_core::types::{Answer, AnswerSource, Reaction, Status};
use jimbruz_llm::prompt;
use jimbruz_llm::{LlmClient, LlmError, LlmRequest};
use tracing::{debug, info, warn};

/// Request shaping for collaborator calls.
#[derive(Debug, Clone, Copy)]
pub struct ChatSettings {
    /// Sampling temperature.
    pub temperature: f32,
    /// Response length cap.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            temperature: 0.85,
            max_tokens: 200,
            timeout_ms: 15_000,
        }
    }
}

/// A pet you can talk to.
#[derive(Debug)]
pub struct Companion {
    pet: Pet,
    llm: LlmClient,
    chat: ChatSettings,
    persona: String,
}

impl Companion {
    /// Pair a pet with a chat client.
    #[must_use]
    pub fn new(pet: Pet, llm: LlmClient, chat: ChatSettings) -> Self {
        let persona = prompt::persona(pet.name(), pet.species());
        Self {
            pet,
            llm,
            chat,
            persona,
        }
    }

    /// The underlying pet.
    #[must_use]
    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    /// Mutable access to the underlying pet.
    pub fn pet_mut(&mut self) -> &mut Pet {
        &mut self.pet
    }

    /// Whether a collaborator will be tried at all.
    #[must_use]
    pub fn has_collaborator(&self) -> bool {
        self.llm.is_available()
    }

    /// Offer food.
    pub fn feed(&mut self) -> Reaction {
        self.pet.feed()
    }

    /// Try to play.
    pub fn play(&mut self) -> Reaction {
        self.pet.play()
    }

    /// Let the pet rest.
    pub fn sleep(&mut self) -> Reaction {
        self.pet.sleep()
    }

    /// Current stats and mood.
    #[must_use]
    pub fn status(&self) -> Status {
        self.pet.status()
    }

    /// Store a note.
    pub fn remember(&mut self, note: &str) -> Reaction {
        self.pet.remember(note)
    }

    /// Recent memories for listing.
    #[must_use]
    pub fn memories(&self) -> Vec<MemoryEntry> {
        self.pet.memories()
    }

    /// Ask a free-text question. Never fails; always returns non-empty text.
    pub async fn ask(&mut self, prompt: &str) -> Answer {
        let answer = match self.ask_collaborator(prompt).await {
            Ok(text) => Answer::new(text, AnswerSource::Collaborator),
            Err(LlmError::NotConfigured(reason)) => {
                debug!(%reason, "No collaborator, using local reply");
                self.pet.fallback_answer(prompt)
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Collaborator failed, using local reply");
                self.pet.fallback_answer(prompt)
            }
        };

        self.pet.record_answer(prompt, &answer);
        info!(source = answer.source.tag(), "ask answered");
        answer
    }

    async fn ask_collaborator(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.llm.is_available() {
            return Err(LlmError::NotConfigured("collaborator disabled".into()));
        }

        let request = LlmRequest::new(self.persona.clone(), self.pet.chat_context(prompt))
            .with_temperature(self.chat.temperature)
            .with_max_tokens(self.chat.max_tokens)
            .with_timeout(self.chat.timeout_ms);

        let response = self.llm.generate(&request).await?;
        debug!(
            latency_ms = response.latency_ms,
            tokens = response.tokens_generated,
            model = %response.model,
            "Collaborator replied"
        );
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use jimbruz_core::config::JimbruzConfig;
    use jimbruz_core::fallback;
    use jimbruz_llm::LlmProvider;
    use rand::rngs::mock::StepRng;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn companion_with(llm: LlmClient) -> (tempfile::TempDir, Companion) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = JimbruzConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        let pet = Pet::open_with_rng(&config, StepRng::new(0, 0)).expect("open");
        let chat = ChatSettings {
            timeout_ms: 2_000,
            ..ChatSettings::default()
        };
        (dir, Companion::new(pet, llm, chat))
    }

    fn openai_at(base_url: String) -> LlmClient {
        LlmClient::new(
            LlmProvider::OpenAiCompatible {
                base_url,
                api_key: "sk-test".into(),
            },
            "gpt-4o-mini",
            0,
        )
    }

    /// Answer one request with `body` and hand the raw request back.
    async fn serve_once(body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            // Requests here are small; read until the JSON body closes.
            while !buf.ends_with(b"}") {
                let n = stream.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn no_collaborator_falls_back() {
        let (_dir, mut companion) = companion_with(LlmClient::none());
        assert!(!companion.has_collaborator());

        let answer = companion.ask("tell me a joke").await;
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert_eq!(answer.text, fallback::JOKE_REPLY);

        let memories = companion.memories();
        assert_eq!(memories.len(), 1);
        assert_eq!(
            memories[0].note,
            format!("Q:tell me a joke -> {} (fallback)", fallback::JOKE_REPLY)
        );
    }

    #[tokio::test]
    async fn unreachable_collaborator_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let (_dir, mut companion) = companion_with(openai_at(format!("http://{addr}")));
        let answer = companion.ask("hello there").await;
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert!(!answer.text.is_empty());
        assert_eq!(companion.memories().len(), 1);
    }

    #[tokio::test]
    async fn collaborator_reply_is_used_and_logged() {
        let body = serde_json_body("The frost remembers you.");
        let (url, server) = serve_once(body).await;
        let (_dir, mut companion) = companion_with(openai_at(url));
        companion.feed();

        let answer = companion.ask("do you remember me?").await;
        assert_eq!(answer.source, AnswerSource::Collaborator);
        assert_eq!(answer.text, "The frost remembers you.");

        let raw = server.await.expect("server task");
        assert!(raw.contains("do you remember me? Recent memories: Accepted food."));
        assert!(raw.contains("You are Jimbruz: a shy, wise"));

        let notes: Vec<String> = companion.memories().into_iter().map(|e| e.note).collect();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1], "Q:do you remember me? -> The frost remembers you. (ai)");
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let (url, _server) = serve_once("{\"choices\": []}".to_string()).await;
        let (_dir, mut companion) = companion_with(openai_at(url));

        let answer = companion.ask("what's your name").await;
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert_eq!(answer.text, fallback::NAME_REPLY);
        assert_eq!(companion.memories().len(), 1);
    }

    #[tokio::test]
    async fn status_is_untouched_by_ask() {
        let (_dir, mut companion) = companion_with(LlmClient::none());
        let before = companion.status();
        companion.ask("anything").await;
        assert_eq!(companion.status(), before);
    }

    fn serde_json_body(content: &str) -> String {
        format!(
            "{{\"model\":\"gpt-4o-mini\",\"choices\":[{{\"message\":{{\"role\":\"assistant\",\"content\":\"{content}\"}}}}]}}"
        )
    }
}
