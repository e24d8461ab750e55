use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelgenError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Credentials file not found: {0}")]
    CredentialsNotFound(PathBuf),

    #[error("Failed to parse credentials: {0}")]
    CredentialsParse(String),

    #[error("Store file error in {path}: {message}")]
    StoreParse { path: PathBuf, message: String },

    #[error("Text generation error: {0}")]
    Completion(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Image generation error: {0}")]
    Image(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Composition error: {0}")]
    Compose(String),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("Failed to parse image prompts: {0}")]
    ImagePromptParse(String),

    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("No account found with id: {0}")]
    UnknownAccount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelgenError {
    /// Return an actionable hint for the user, if applicable.
    pub fn hint(&self) -> Option<String> {
        match self {
            ReelgenError::ConfigNotFound(_) => Some(
                "Create a config.json in the root directory (a flat JSON object). \
                 Keys: llm, image_model, image_count, voice, is_for_kids, request_timeout."
                    .into(),
            ),
            ReelgenError::ConfigParse(_) => Some(
                "Check config.json syntax — it must be a single flat JSON object.".into(),
            ),
            ReelgenError::CredentialsNotFound(_) => Some(
                "Create a secrets.json in the root directory with openai_api_key, \
                 eleven_api_key and youtube_token fields."
                    .into(),
            ),
            ReelgenError::CredentialsParse(_) => Some(
                "secrets.json must be a JSON object with non-empty openai_api_key, \
                 eleven_api_key and youtube_token string fields."
                    .into(),
            ),
            ReelgenError::StoreParse { path, .. } => Some(format!(
                "{} is corrupt. Fix the JSON by hand or delete the file to start \
                 with an empty collection.",
                path.display()
            )),
            ReelgenError::Compose(_) => Some(
                "Ensure FFmpeg is installed and on your PATH. Install via: \
                 brew install ffmpeg (macOS) or apt install ffmpeg (Linux)."
                    .into(),
            ),
            ReelgenError::Speech(_) => Some(
                "Check the eleven_api_key in secrets.json and your ElevenLabs quota.".into(),
            ),
            ReelgenError::Upload(_) => Some(
                "Check that youtube_token in secrets.json is a valid OAuth token with \
                 the youtube.upload scope; tokens expire and need refreshing."
                    .into(),
            ),
            ReelgenError::UnknownWorkflow(_) => {
                Some("Supported workflows: youtube.".into())
            }
            ReelgenError::UnknownAccount(_) => Some(
                "Run 'reelgen menu' and create an account first; then pass its id.".into(),
            ),
            _ => None,
        }
    }
}

pub type ReelgenResult<T> = Result<T, ReelgenError>;
