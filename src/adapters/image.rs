use crate::adapters::ImageGenerator;
use crate::error::{ReelgenError, ReelgenResult};
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const API_BASE: &str = "https://api.openai.com/v1";
// Portrait, for short-form frames.
const IMAGE_SIZE: &str = "1024x1792";

/// Image generation via the OpenAI images endpoint. Each call writes one
/// PNG with a fresh unique name under the images directory.
pub struct OpenAiImage {
    agent: ureq::Agent,
    api_key: String,
    model: String,
}

impl OpenAiImage {
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

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImagePayload>,
}

#[derive(Deserialize)]
struct ImagePayload {
    b64_json: Option<String>,
}

impl ImageGenerator for OpenAiImage {
    fn generate(&self, prompt: &str, output_dir: &Path) -> ReelgenResult<PathBuf> {
        let url = format!("{API_BASE}/images/generations");
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": IMAGE_SIZE,
            "response_format": "b64_json",
        });

        debug!("image generation via {}", self.model);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(body.to_string().as_bytes())
            .map_err(|e| ReelgenError::Image(format!("image request failed: {e}")))?;

        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| ReelgenError::Image(format!("failed to read response: {e}")))?;

        let bytes = extract_image_bytes(&text)?;

        let output_path = output_dir.join(format!("{}.png", Uuid::new_v4()));
        std::fs::write(&output_path, &bytes)
            .map_err(|e| ReelgenError::Image(format!("failed to write image: {e}")))?;

        Ok(output_path)
    }
}

/// Decode the first base64 image payload from an images-generation
/// response body.
fn extract_image_bytes(body: &str) -> ReelgenResult<Vec<u8>> {
    let parsed: ImagesResponse = serde_json::from_str(body)
        .map_err(|e| ReelgenError::Image(format!("unexpected response shape: {e}")))?;

    let encoded = parsed
        .data
        .into_iter()
        .next()
        .and_then(|payload| payload.b64_json)
        .ok_or_else(|| ReelgenError::Image("provider returned no image payload".into()))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| ReelgenError::Image(format!("invalid base64 image payload: {e}")))
}
