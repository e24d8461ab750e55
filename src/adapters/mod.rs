//! One adapter per external capability. Each exposes a single blocking
//! request/response operation behind a trait so workflows and tests can
//! swap providers for mocks.
//!
//! Failure is always a typed error. No adapter reports success with an
//! empty payload; callers never have to sniff sentinel values.

pub mod completion;
pub mod image;
pub mod speech;
pub mod upload;

use crate::compose::{Composer, FfmpegComposer};
use crate::context::AppContext;
use crate::error::ReelgenResult;
use std::path::{Path, PathBuf};

/// Text generation: one prompt in, one completion out.
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> ReelgenResult<String>;

    /// Provider model id, for reporting.
    fn model(&self) -> &str;
}

/// Speech synthesis: writes audio for `text` to `output_path`.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, output_path: &Path) -> ReelgenResult<PathBuf>;

    fn engine_name(&self) -> &str;

    /// Inputs beyond the text that change the audio content (voice, model).
    /// Folded into the synthesis cache key.
    fn cache_salt(&self) -> String {
        String::new()
    }
}

/// Image generation: writes one image per call under `output_dir`.
pub trait ImageGenerator {
    fn generate(&self, prompt: &str, output_dir: &Path) -> ReelgenResult<PathBuf>;
}

/// Everything the upload needs besides the file itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub made_for_kids: bool,
}

/// Video publication: returns the public watch URL.
pub trait VideoUploader {
    fn upload(&self, video_path: &Path, metadata: &VideoMetadata) -> ReelgenResult<String>;
}

/// The full set of live adapters a workflow runs against.
pub struct Adapters {
    pub text: Box<dyn TextGenerator>,
    pub prompt_text: Box<dyn TextGenerator>,
    pub speech: Box<dyn SpeechSynthesizer>,
    pub image: Box<dyn ImageGenerator>,
    pub uploader: Box<dyn VideoUploader>,
    pub composer: Box<dyn Composer>,
}

impl Adapters {
    /// Build production adapters from config and credentials. Reads the
    /// config once here; a broken config fails before any request is made.
    pub fn from_context(ctx: &AppContext) -> ReelgenResult<Self> {
        let timeout = ctx.config.request_timeout()?;
        let voice = ctx
            .config
            .voice()?
            .or_else(|| ctx.credentials.eleven_voice_id.clone());

        Ok(Self {
            text: Box::new(completion::OpenAiChat::new(
                ctx.credentials.openai_api_key.clone(),
                ctx.config.text_model()?,
                timeout,
            )),
            prompt_text: Box::new(completion::OpenAiChat::new(
                ctx.credentials.openai_api_key.clone(),
                ctx.config.image_prompt_model()?,
                timeout,
            )),
            speech: Box::new(speech::ElevenLabsSpeech::new(
                ctx.credentials.eleven_api_key.clone(),
                voice,
            )),
            image: Box::new(image::OpenAiImage::new(
                ctx.credentials.openai_api_key.clone(),
                ctx.config.image_model()?,
                timeout,
            )),
            uploader: Box::new(upload::YouTubeUploader::new(
                ctx.credentials.youtube_token.clone(),
            )),
            composer: Box::new(FfmpegComposer::portrait(ctx.config.song_volume()?)),
        })
    }
}
