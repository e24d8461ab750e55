use crate::config::{Config, Credentials};
use crate::error::ReelgenResult;
use crate::workspace::Workspace;
use std::path::PathBuf;

/// Everything built once at process start and passed by reference from
/// there on. No component reads globals or the environment after this.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub workspace: Workspace,
    pub config: Config,
    pub credentials: Credentials,
    /// True when this process created the cache dir for the first time.
    pub first_run: bool,
}

impl AppContext {
    /// Resolve the workspace, create its layout, and load config and
    /// credentials. Config or credential problems are fatal here, before
    /// any workflow starts.
    pub fn init(root: Option<PathBuf>) -> ReelgenResult<Self> {
        let workspace = Workspace::discover(root)?;
        let first_run = workspace.is_first_run();
        workspace.ensure_layout()?;

        let credentials = Credentials::load(&workspace.credentials_file())?;
        let config = Config::new(workspace.config_file());
        config.validate()?;

        Ok(Self {
            workspace,
            config,
            credentials,
            first_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelgenError;

    #[test]
    fn test_init_requires_credentials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let err = AppContext::init(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ReelgenError::CredentialsNotFound(_)));
    }

    #[test]
    fn test_init_requires_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("secrets.json"),
            r#"{"openai_api_key": "k", "eleven_api_key": "k", "youtube_token": "k"}"#,
        )
        .unwrap();

        let err = AppContext::init(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ReelgenError::ConfigNotFound(_)));
    }

    #[test]
    fn test_init_builds_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(
            dir.path().join("secrets.json"),
            r#"{"openai_api_key": "k", "eleven_api_key": "k", "youtube_token": "k"}"#,
        )
        .unwrap();

        let ctx = AppContext::init(Some(dir.path().to_path_buf())).unwrap();
        assert!(ctx.workspace.cache_dir().is_dir());
        assert!(ctx.workspace.images_dir().is_dir());
    }
}
