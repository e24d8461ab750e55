use crate::error::{ReelgenError, ReelgenResult};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Text-generation model aliases accepted in `config.json`. Unknown names
/// fall back to the default model rather than failing.
const SUPPORTED_TEXT_MODELS: &[(&str, &str)] = &[
    ("gpt4", "gpt-4"),
    ("gpt4o", "gpt-4o"),
    ("gpt4o_mini", "gpt-4o-mini"),
    ("gpt35_turbo", "gpt-3.5-turbo"),
];

const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const DEFAULT_IMAGE_COUNT: usize = 3;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_SONG_VOLUME: f64 = 0.15;

/// Map a model alias to the provider model id.
pub fn resolve_model(name: &str) -> String {
    let key = name.trim().to_lowercase();
    SUPPORTED_TEXT_MODELS
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, id)| (*id).to_string())
        .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string())
}

/// Handle on `config.json`. Holds the path only: every accessor re-reads the
/// file, so an edit between calls is observed immediately.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
}

impl Config {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read and parse the whole document. Missing file and malformed JSON
    /// are both errors; absent keys are not.
    fn read(&self) -> ReelgenResult<serde_json::Map<String, Value>> {
        if !self.path.exists() {
            return Err(ReelgenError::ConfigNotFound(self.path.clone()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ReelgenError::ConfigParse(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(ReelgenError::ConfigParse(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// One up-front read so a broken config fails at startup, not mid-run.
    pub fn validate(&self) -> ReelgenResult<()> {
        self.read().map(|_| ())
    }

    /// Raw accessor: the value for `key`, or None when absent.
    pub fn get(&self, key: &str) -> ReelgenResult<Option<Value>> {
        Ok(self.read()?.get(key).cloned())
    }

    pub fn verbose(&self) -> ReelgenResult<bool> {
        Ok(self
            .get("verbose")?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub fn text_model(&self) -> ReelgenResult<String> {
        Ok(self
            .get("llm")?
            .and_then(|v| v.as_str().map(resolve_model))
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()))
    }

    pub fn image_prompt_model(&self) -> ReelgenResult<String> {
        match self.get("image_prompt_llm")? {
            Some(v) => Ok(v
                .as_str()
                .map(resolve_model)
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string())),
            None => self.text_model(),
        }
    }

    pub fn image_model(&self) -> ReelgenResult<String> {
        Ok(self
            .get("image_model")?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()))
    }

    pub fn image_count(&self) -> ReelgenResult<usize> {
        Ok(self
            .get("image_count")?
            .and_then(|v| v.as_u64())
            .map(|n| n.max(1) as usize)
            .unwrap_or(DEFAULT_IMAGE_COUNT))
    }

    pub fn voice(&self) -> ReelgenResult<Option<String>> {
        Ok(self
            .get("voice")?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn made_for_kids(&self) -> ReelgenResult<bool> {
        Ok(self
            .get("is_for_kids")?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub fn request_timeout(&self) -> ReelgenResult<u64> {
        Ok(self
            .get("request_timeout")?
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn song_volume(&self) -> ReelgenResult<f64> {
        Ok(self
            .get("song_volume")?
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_SONG_VOLUME))
    }
}

/// API credentials from `secrets.json`. Loaded once at process start;
/// absence or malformed content is fatal.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub openai_api_key: String,
    pub eleven_api_key: String,
    pub youtube_token: String,
    #[serde(default)]
    pub eleven_voice_id: Option<String>,
}

impl Credentials {
    pub fn load(path: &Path) -> ReelgenResult<Self> {
        if !path.exists() {
            return Err(ReelgenError::CredentialsNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let creds: Credentials = serde_json::from_str(&content)
            .map_err(|e| ReelgenError::CredentialsParse(e.to_string()))?;

        for (name, value) in [
            ("openai_api_key", &creds.openai_api_key),
            ("eleven_api_key", &creds.eleven_api_key),
            ("youtube_token", &creds.youtube_token),
        ] {
            if value.trim().is_empty() {
                return Err(ReelgenError::CredentialsParse(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(creds)
    }
}
