//! The video generation pipeline: a fixed linear sequence of adapter
//! calls from a niche/language seed to a composed MP4. No branching, no
//! retries, no parallelism; each step's output is the next step's input,
//! and the first failure aborts the run.

use crate::adapters::speech::synthesize_cached;
use crate::adapters::{ImageGenerator, SpeechSynthesizer, TextGenerator, VideoMetadata};
use crate::compose::Composer;
use crate::error::{ReelgenError, ReelgenResult};
use crate::prompts::PromptRegistry;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Working state of one pipeline run. Never persisted; only the video
/// path (and the record the workflow appends after upload) outlive it.
#[derive(Debug, Default)]
pub struct Session {
    pub niche: String,
    pub language: String,
    pub topic: String,
    pub script: String,
    pub title: String,
    pub description: String,
    pub image_prompts: Vec<String>,
    pub images: Vec<PathBuf>,
    pub audio_path: Option<PathBuf>,
    pub video_path: Option<PathBuf>,
}

impl Session {
    fn new(niche: &str, language: &str) -> Self {
        Self {
            niche: niche.to_string(),
            language: language.to_string(),
            ..Default::default()
        }
    }

    pub fn metadata(&self, made_for_kids: bool) -> VideoMetadata {
        VideoMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: vec!["Shorts".to_string(), self.niche.clone()],
            made_for_kids,
        }
    }
}

pub struct Pipeline<'a> {
    pub text: &'a dyn TextGenerator,
    /// Image prompts may be produced by a different model than the rest.
    pub prompt_text: &'a dyn TextGenerator,
    pub speech: &'a dyn SpeechSynthesizer,
    pub image: &'a dyn ImageGenerator,
    pub composer: &'a dyn Composer,
    pub prompts: &'a PromptRegistry<'a>,
    pub image_count: usize,
    pub images_dir: PathBuf,
    pub narration_cache_dir: PathBuf,
    /// Transient audio/video artifacts land here.
    pub scratch_dir: PathBuf,
    pub song: Option<PathBuf>,
}

impl Pipeline<'_> {
    pub fn run(&self, niche: &str, language: &str) -> ReelgenResult<Session> {
        let mut session = Session::new(niche, language);

        self.generate_topic(&mut session)?;
        self.generate_script(&mut session)?;
        self.generate_metadata(&mut session)?;
        self.generate_image_prompts(&mut session)?;
        self.generate_images(&mut session)?;
        self.synthesize_narration(&mut session)?;
        self.compose(&mut session)?;

        Ok(session)
    }

    fn generate_topic(&self, session: &mut Session) -> ReelgenResult<()> {
        let prompt = self.prompts.topic(&session.niche)?;
        session.topic = self.text.complete(&prompt)?;
        debug!("topic: {}", session.topic);
        Ok(())
    }

    fn generate_script(&self, session: &mut Session) -> ReelgenResult<()> {
        let prompt = self.prompts.script(&session.topic, &session.language)?;
        // Models like to decorate scripts with markdown emphasis; the
        // narrator would read the asterisks out loud.
        session.script = self.text.complete(&prompt)?.replace('*', "");
        Ok(())
    }

    fn generate_metadata(&self, session: &mut Session) -> ReelgenResult<()> {
        session.title = self.text.complete(&self.prompts.title(&session.topic)?)?;
        session.description = self
            .text
            .complete(&self.prompts.description(&session.script)?)?;
        Ok(())
    }

    fn generate_image_prompts(&self, session: &mut Session) -> ReelgenResult<()> {
        let prompt = self.prompts.image_prompts(&session.script, self.image_count)?;
        let raw = self.prompt_text.complete(&prompt)?;
        session.image_prompts = parse_image_prompts(&raw, self.image_count)?;
        Ok(())
    }

    /// One image per prompt, sequential, accumulated in prompt order.
    fn generate_images(&self, session: &mut Session) -> ReelgenResult<()> {
        for prompt in &session.image_prompts {
            let path = self.image.generate(prompt, &self.images_dir)?;
            session.images.push(path);
        }
        Ok(())
    }

    fn synthesize_narration(&self, session: &mut Session) -> ReelgenResult<()> {
        let output = self
            .scratch_dir
            .join(format!("narration-{}.mp3", Uuid::new_v4()));
        let path = synthesize_cached(
            self.speech,
            &session.script,
            &self.narration_cache_dir,
            &output,
        )?;
        session.audio_path = Some(path);
        Ok(())
    }

    fn compose(&self, session: &mut Session) -> ReelgenResult<()> {
        let audio = session
            .audio_path
            .as_deref()
            .ok_or_else(|| ReelgenError::Compose("no narration to compose".into()))?;
        let output = self.scratch_dir.join(format!("short-{}.mp4", Uuid::new_v4()));
        let path = self
            .composer
            .compose(&session.images, audio, self.song.as_deref(), &output)?;
        session.video_path = Some(path);
        Ok(())
    }
}

/// Parse the image-prompt completion into a list of prompts.
///
/// The payload must be a JSON array of strings; a surrounding markdown
/// code fence is tolerated, anything else is a fatal parse failure. The
/// list is truncated to `count`, and an empty list is rejected.
fn parse_image_prompts(raw: &str, count: usize) -> ReelgenResult<Vec<String>> {
    let payload = strip_code_fence(raw);
    let mut prompts: Vec<String> = serde_json::from_str(payload)
        .map_err(|e| ReelgenError::ImagePromptParse(e.to_string()))?;

    if prompts.is_empty() {
        return Err(ReelgenError::ImagePromptParse(
            "provider returned an empty prompt list".into(),
        ));
    }
    prompts.truncate(count);
    Ok(prompts)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}
