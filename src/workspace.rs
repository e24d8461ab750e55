use crate::error::ReelgenResult;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::debug;

const CACHE_DIR: &str = ".reelgen";
const IMAGES_DIR: &str = "images";
const NARRATION_DIR: &str = "narration";
const SONGS_DIR: &str = "songs";

/// On-disk layout of a reelgen root directory.
///
/// ```text
/// <root>/
///   config.json          flat JSON configuration
///   secrets.json         API credentials
///   songs/               optional background music (user-supplied MP3s)
///   .reelgen/            cache dir: store files + transient artifacts
///     youtube.json
///     twitter.json
///     products.json
///     images/            generated images
///     narration/         content-addressed synthesis cache
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the root: explicit flag, then REELGEN_ROOT, then cwd.
    pub fn discover(root: Option<PathBuf>) -> ReelgenResult<Self> {
        let root = match root {
            Some(p) => p,
            None => match std::env::var_os("REELGEN_ROOT") {
                Some(p) => PathBuf::from(p),
                None => std::env::current_dir()?,
            },
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.cache_dir().join(IMAGES_DIR)
    }

    pub fn narration_dir(&self) -> PathBuf {
        self.cache_dir().join(NARRATION_DIR)
    }

    pub fn songs_dir(&self) -> PathBuf {
        self.root.join(SONGS_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("secrets.json")
    }

    /// True before `ensure_layout` has ever run against this root.
    pub fn is_first_run(&self) -> bool {
        !self.cache_dir().exists()
    }

    /// Create any missing directories.
    pub fn ensure_layout(&self) -> ReelgenResult<()> {
        for dir in [
            self.cache_dir(),
            self.images_dir(),
            self.narration_dir(),
            self.songs_dir(),
        ] {
            if !dir.exists() {
                debug!("Creating {}", dir.display());
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }

    /// Remove transient artifacts directly inside the cache dir. Store files
    /// (`*.json`) and subdirectories are kept. Returns how many files went.
    pub fn clean_temp(&self) -> ReelgenResult<usize> {
        let cache = self.cache_dir();
        if !cache.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&cache)? {
            let path = entry?.path();
            if path.is_file() && !path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Pick a random background song from `songs/`, if any are present.
    pub fn choose_song(&self) -> ReelgenResult<Option<PathBuf>> {
        let dir = self.songs_dir();
        if !dir.exists() {
            return Ok(None);
        }

        let songs: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();

        Ok(songs.choose(&mut rand::thread_rng()).cloned())
    }
}
