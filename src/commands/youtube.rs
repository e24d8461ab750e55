//! The YouTube short workflow: drive the pipeline for an account, then
//! optionally publish the result and record it on the account.

use crate::adapters::Adapters;
use crate::context::AppContext;
use crate::error::{ReelgenError, ReelgenResult};
use crate::pipeline::{Pipeline, Session};
use crate::prompts::PromptRegistry;
use crate::status;
use crate::store::{Account, Provider, Store, VideoRecord};

/// Run the generation pipeline for `account`. The store is untouched;
/// a failed run leaves no trace beyond scratch files.
pub fn generate_short(
    ctx: &AppContext,
    adapters: &Adapters,
    account: &Account,
) -> ReelgenResult<Session> {
    let prompts = PromptRegistry::new()?;
    let pipeline = Pipeline {
        text: adapters.text.as_ref(),
        prompt_text: adapters.prompt_text.as_ref(),
        speech: adapters.speech.as_ref(),
        image: adapters.image.as_ref(),
        composer: adapters.composer.as_ref(),
        prompts: &prompts,
        image_count: ctx.config.image_count()?,
        images_dir: ctx.workspace.images_dir(),
        narration_cache_dir: ctx.workspace.narration_dir(),
        scratch_dir: ctx.workspace.cache_dir(),
        song: ctx.workspace.choose_song()?,
    };

    status::info(&format!(
        "Generating a short for {} ({})...",
        account.nickname, account.niche
    ));
    let session = pipeline.run(&account.niche, &account.language)?;

    if let Some(video) = &session.video_path {
        status::success(&format!("Short ready: {}", video.display()));
    }
    Ok(session)
}

/// Upload the session's video and append a record to the account.
/// Returns the public watch URL.
pub fn upload_short(
    ctx: &AppContext,
    adapters: &Adapters,
    account: &Account,
    session: &Session,
) -> ReelgenResult<String> {
    let video = session
        .video_path
        .as_deref()
        .ok_or_else(|| ReelgenError::Upload("session has no composed video".into()))?;

    let metadata = session.metadata(ctx.config.made_for_kids()?);
    let url = adapters.uploader.upload(video, &metadata)?;

    let store = Store::new(ctx.workspace.cache_dir());
    store.append_video(
        Provider::YouTube,
        &account.id,
        VideoRecord::new(metadata.title, Some(url.clone())),
    )?;

    status::success(&format!("Video published: {url}"));
    Ok(url)
}
