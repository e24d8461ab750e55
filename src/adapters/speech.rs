use crate::adapters::SpeechSynthesizer;
use crate::error::{ReelgenError, ReelgenResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

const API_BASE: &str = "https://api.elevenlabs.io/v1";
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM"; // Rachel
const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Narration synthesis via the ElevenLabs cloud API
/// (`POST /v1/text-to-speech/{voice_id}`). Single blocking call, whole-file
/// MP3 write, no retry.
pub struct ElevenLabsSpeech {
    api_key: String,
    voice_id: String,
}

impl ElevenLabsSpeech {
    pub fn new(api_key: String, voice_id: Option<String>) -> Self {
        Self {
            api_key,
            voice_id: voice_id.unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
        }
    }
}

impl SpeechSynthesizer for ElevenLabsSpeech {
    fn synthesize(&self, text: &str, output_path: &Path) -> ReelgenResult<PathBuf> {
        let url = format!(
            "{API_BASE}/text-to-speech/{}?output_format=mp3_44100_128",
            self.voice_id
        );

        let body = serde_json::json!({
            "text": text,
            "model_id": DEFAULT_MODEL_ID,
        });

        let response = ureq::post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .send(body.to_string().as_bytes())
            .map_err(|e| ReelgenError::Speech(format!("ElevenLabs request failed: {e}")))?;

        let bytes = response
            .into_body()
            .read_to_vec()
            .map_err(|e| ReelgenError::Speech(format!("failed to read audio response: {e}")))?;

        if bytes.is_empty() {
            return Err(ReelgenError::Speech(
                "provider returned an empty audio payload".into(),
            ));
        }

        std::fs::write(output_path, &bytes)
            .map_err(|e| ReelgenError::Speech(format!("failed to write audio: {e}")))?;

        Ok(output_path.to_path_buf())
    }

    fn engine_name(&self) -> &str {
        "elevenlabs"
    }

    fn cache_salt(&self) -> String {
        format!("{}\0{DEFAULT_MODEL_ID}", self.voice_id)
    }
}

/// Synthesize with a content-addressed cache: identical text through the
/// same engine/voice reuses the audio already on disk.
pub fn synthesize_cached(
    engine: &dyn SpeechSynthesizer,
    text: &str,
    cache_dir: &Path,
    output_path: &Path,
) -> ReelgenResult<PathBuf> {
    let hash = cache_key(engine.engine_name(), &engine.cache_salt(), text);
    let cached = cache_dir.join(format!("{hash}.mp3"));

    if cached.exists() {
        debug!("narration cache hit: {hash}");
        std::fs::copy(&cached, output_path)?;
        return Ok(output_path.to_path_buf());
    }

    let result = engine.synthesize(text, output_path)?;
    std::fs::create_dir_all(cache_dir)?;
    std::fs::copy(&result, &cached)?;
    Ok(result)
}

/// Deterministic key over every input that affects the audio content.
fn cache_key(engine_name: &str, salt: &str, text: &str) -> String {
    let input = format!("{engine_name}\0{salt}\0{text}");
    let digest = Sha256::digest(input.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSynth {
        calls: Cell<usize>,
    }

    impl SpeechSynthesizer for FakeSynth {
        fn synthesize(&self, _text: &str, output_path: &Path) -> ReelgenResult<PathBuf> {
            self.calls.set(self.calls.get() + 1);
            std::fs::write(output_path, b"audio-bytes")?;
            Ok(output_path.to_path_buf())
        }

        fn engine_name(&self) -> &str {
            "fake"
        }
    }

    #[test]
    fn test_cache_key_deterministic() {
        let a = cache_key("elevenlabs", "rachel", "Hello world");
        let b = cache_key("elevenlabs", "rachel", "Hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // SHA-256 hex
    }

    #[test]
    fn test_cache_key_varies_on_text_salt_engine() {
        let base = cache_key("elevenlabs", "rachel", "Hello");
        assert_ne!(base, cache_key("elevenlabs", "rachel", "Goodbye"));
        assert_ne!(base, cache_key("elevenlabs", "adam", "Hello"));
        assert_ne!(base, cache_key("edge", "rachel", "Hello"));
    }

    #[test]
    fn test_synthesize_cached_reuses_audio() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("narration");
        let engine = FakeSynth {
            calls: Cell::new(0),
        };

        let first = dir.path().join("first.mp3");
        synthesize_cached(&engine, "same text", &cache_dir, &first).unwrap();
        assert_eq!(engine.calls.get(), 1);
        assert!(first.exists());

        // Second call with the same text: served from cache
        let second = dir.path().join("second.mp3");
        synthesize_cached(&engine, "same text", &cache_dir, &second).unwrap();
        assert_eq!(engine.calls.get(), 1);
        assert_eq!(std::fs::read(&second).unwrap(), b"audio-bytes");

        // Different text: synthesized again
        let third = dir.path().join("third.mp3");
        synthesize_cached(&engine, "other text", &cache_dir, &third).unwrap();
        assert_eq!(engine.calls.get(), 2);
    }

    #[test]
    fn test_default_voice_applied() {
        let engine = ElevenLabsSpeech::new("key".into(), None);
        assert!(engine.cache_salt().contains(DEFAULT_VOICE_ID));

        let engine = ElevenLabsSpeech::new("key".into(), Some("custom".into()));
        assert!(engine.cache_salt().contains("custom"));
    }
}
