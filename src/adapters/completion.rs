use crate::adapters::TextGenerator;
use crate::error::{ReelgenError, ReelgenResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://api.openai.com/v1";

/// Text generation via an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiChat {
    agent: ureq::Agent,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .new_agent();

        Self {
            agent,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl TextGenerator for OpenAiChat {
    fn complete(&self, prompt: &str) -> ReelgenResult<String> {
        let url = format!("{API_BASE}/chat/completions");
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| ReelgenError::Completion(e.to_string()))?;

        debug!("chat completion via {}", self.model);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| ReelgenError::Completion(format!("chat request failed: {e}")))?;

        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| ReelgenError::Completion(format!("failed to read response: {e}")))?;

        extract_content(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull the first choice's message content out of a chat-completions
/// response body. An empty or missing payload is an error, not "".
fn extract_content(body: &str) -> ReelgenResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ReelgenError::Completion(format!("unexpected response shape: {e}")))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(ReelgenError::Completion(
            "provider returned an empty completion".into(),
        ));
    }
    Ok(content)
}
