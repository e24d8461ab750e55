//! JSON-file-backed collections for creator accounts (one file per
//! provider) and cached affiliate products.
//!
//! Every read re-parses the backing file and every write rewrites it
//! wholesale. There is no locking: concurrent processes against the same
//! root can lose updates, and a crash between truncation and rewrite can
//! corrupt a file. Single-user CLI scope.

use crate::error::{ReelgenError, ReelgenResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    YouTube,
    Twitter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::YouTube => "youtube",
            Provider::Twitter => "twitter",
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Provider::YouTube => "youtube.json",
            Provider::Twitter => "twitter.json",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ReelgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Provider::YouTube),
            "twitter" => Ok(Provider::Twitter),
            other => Err(ReelgenError::UnknownWorkflow(other.to_string())),
        }
    }
}

/// A registered content-creator identity. `id` is generator-assigned and
/// immutable; `videos` grows as shorts are published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub nickname: String,
    /// Twitter documents written by earlier tooling call this `topic`.
    #[serde(alias = "topic")]
    pub niche: String,
    pub language: String,
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl VideoRecord {
    pub fn new(title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            date: chrono::Utc::now().to_rfc3339(),
            url,
        }
    }
}

/// Affiliate products carry whatever fields the source listing had.
pub type Product = serde_json::Map<String, Value>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsDoc {
    accounts: Vec<Account>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProductsDoc {
    products: Vec<Product>,
}

pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// `dir` is the cache directory holding the per-collection files.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn accounts_path(&self, provider: Provider) -> PathBuf {
        self.dir.join(provider.file_name())
    }

    fn products_path(&self) -> PathBuf {
        self.dir.join("products.json")
    }

    /// All accounts for `provider`. An absent file is initialized to an
    /// empty collection on disk and returns empty — never an error. A
    /// present-but-malformed file is a propagated parse failure.
    pub fn accounts(&self, provider: Provider) -> ReelgenResult<Vec<Account>> {
        let doc: AccountsDoc = read_or_init(&self.accounts_path(provider))?;
        Ok(doc.accounts)
    }

    /// Append an account and rewrite the file. Duplicate ids are the
    /// caller's responsibility.
    pub fn add_account(&self, provider: Provider, account: Account) -> ReelgenResult<()> {
        let mut accounts = self.accounts(provider)?;
        accounts.push(account);
        write_doc(&self.accounts_path(provider), &AccountsDoc { accounts })
    }

    /// Remove the account with `id`, if present. Removing an unknown id
    /// succeeds silently.
    pub fn remove_account(&self, provider: Provider, id: &str) -> ReelgenResult<()> {
        let mut accounts = self.accounts(provider)?;
        accounts.retain(|account| account.id != id);
        write_doc(&self.accounts_path(provider), &AccountsDoc { accounts })
    }

    pub fn find_account(&self, provider: Provider, id: &str) -> ReelgenResult<Option<Account>> {
        Ok(self
            .accounts(provider)?
            .into_iter()
            .find(|account| account.id == id))
    }

    /// Append a video record to the account with `id`. Unknown ids are a
    /// no-op, matching `remove_account`.
    pub fn append_video(
        &self,
        provider: Provider,
        id: &str,
        record: VideoRecord,
    ) -> ReelgenResult<()> {
        let mut accounts = self.accounts(provider)?;
        if let Some(account) = accounts.iter_mut().find(|account| account.id == id) {
            account.videos.push(record);
        } else {
            debug!("append_video: no {provider} account with id {id}");
        }
        write_doc(&self.accounts_path(provider), &AccountsDoc { accounts })
    }

    pub fn products(&self) -> ReelgenResult<Vec<Product>> {
        let doc: ProductsDoc = read_or_init(&self.products_path())?;
        Ok(doc.products)
    }

    pub fn add_product(&self, product: Product) -> ReelgenResult<()> {
        let mut products = self.products()?;
        products.push(product);
        write_doc(&self.products_path(), &ProductsDoc { products })
    }
}

/// Read a collection document, creating it empty first if absent.
fn read_or_init<T>(path: &Path) -> ReelgenResult<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        debug!("Initializing empty store at {}", path.display());
        write_doc(path, &T::default())?;
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ReelgenError::StoreParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Full-file rewrite. No temp file, no lock — see the module docs.
fn write_doc<T: Serialize>(path: &Path, doc: &T) -> ReelgenResult<()> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| ReelgenError::StoreParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn make_account(id: &str) -> Account {
        Account {
            id: id.into(),
            nickname: format!("nick-{id}"),
            niche: "woodworking".into(),
            language: "English".into(),
            videos: vec![],
        }
    }

    #[test]
    fn test_missing_file_initializes_empty_and_is_idempotent() {
        let (dir, store) = make_store();
        let path = dir.path().join("youtube.json");
        assert!(!path.exists());

        assert!(store.accounts(Provider::YouTube).unwrap().is_empty());
        assert!(path.exists());

        let first = std::fs::read_to_string(&path).unwrap();
        assert!(store.accounts(Provider::YouTube).unwrap().is_empty());
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_then_list_preserves_order() {
        let (_dir, store) = make_store();
        let a = make_account("a");
        let b = make_account("b");

        store.add_account(Provider::YouTube, a.clone()).unwrap();
        store.add_account(Provider::YouTube, b.clone()).unwrap();

        let accounts = store.accounts(Provider::YouTube).unwrap();
        assert_eq!(accounts, vec![a, b]);
    }

    #[test]
    fn test_providers_are_partitioned() {
        let (_dir, store) = make_store();
        store
            .add_account(Provider::YouTube, make_account("yt"))
            .unwrap();
        store
            .add_account(Provider::Twitter, make_account("tw"))
            .unwrap();

        assert_eq!(store.accounts(Provider::YouTube).unwrap().len(), 1);
        assert_eq!(store.accounts(Provider::Twitter).unwrap().len(), 1);
        assert_eq!(
            store.accounts(Provider::Twitter).unwrap()[0].id,
            "tw".to_string()
        );
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (_dir, store) = make_store();
        store
            .add_account(Provider::YouTube, make_account("keep"))
            .unwrap();

        store.remove_account(Provider::YouTube, "ghost").unwrap();
        let accounts = store.accounts(Provider::YouTube).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "keep");
    }

    #[test]
    fn test_remove_present_id() {
        let (_dir, store) = make_store();
        store
            .add_account(Provider::YouTube, make_account("a"))
            .unwrap();
        store
            .add_account(Provider::YouTube, make_account("b"))
            .unwrap();

        store.remove_account(Provider::YouTube, "a").unwrap();
        let accounts = store.accounts(Provider::YouTube).unwrap();
        assert!(accounts.iter().all(|acc| acc.id != "a"));
        assert_eq!(accounts.len(), 1);
    }

    #[test]
    fn test_find_account() {
        let (_dir, store) = make_store();
        store
            .add_account(Provider::YouTube, make_account("x"))
            .unwrap();

        assert!(store.find_account(Provider::YouTube, "x").unwrap().is_some());
        assert!(store.find_account(Provider::YouTube, "y").unwrap().is_none());
    }

    #[test]
    fn test_append_video() {
        let (_dir, store) = make_store();
        store
            .add_account(Provider::YouTube, make_account("x"))
            .unwrap();

        let record = VideoRecord {
            title: "First short".into(),
            date: "2026-01-01T00:00:00Z".into(),
            url: Some("https://www.youtube.com/watch?v=abc".into()),
        };
        store
            .append_video(Provider::YouTube, "x", record.clone())
            .unwrap();

        let account = store.find_account(Provider::YouTube, "x").unwrap().unwrap();
        assert_eq!(account.videos, vec![record]);

        // Unknown id: no-op, nothing added anywhere
        store
            .append_video(Provider::YouTube, "ghost", VideoRecord::new("t", None))
            .unwrap();
        let accounts = store.accounts(Provider::YouTube).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].videos.len(), 1);
    }

    #[test]
    fn test_malformed_store_file_is_a_parse_error() {
        let (dir, store) = make_store();
        std::fs::write(dir.path().join("youtube.json"), "{not json").unwrap();

        let err = store.accounts(Provider::YouTube).unwrap_err();
        assert!(matches!(err, ReelgenError::StoreParse { .. }));
    }

    #[test]
    fn test_topic_alias_deserializes_into_niche() {
        let (dir, store) = make_store();
        std::fs::write(
            dir.path().join("twitter.json"),
            r#"{"accounts": [{"id": "1", "nickname": "n", "topic": "space", "language": "English"}]}"#,
        )
        .unwrap();

        let accounts = store.accounts(Provider::Twitter).unwrap();
        assert_eq!(accounts[0].niche, "space");
        assert!(accounts[0].videos.is_empty());
    }

    #[test]
    fn test_products_roundtrip() {
        let (_dir, store) = make_store();
        assert!(store.products().unwrap().is_empty());

        let mut product = Product::new();
        product.insert("name".into(), Value::String("Standing desk".into()));
        product.insert("url".into(), Value::String("https://example.com/p/1".into()));
        store.add_product(product.clone()).unwrap();

        let products = store.products().unwrap();
        assert_eq!(products, vec![product]);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("youtube".parse::<Provider>().unwrap(), Provider::YouTube);
        assert_eq!(" Twitter ".parse::<Provider>().unwrap(), Provider::Twitter);
        assert!(matches!(
            "tiktok".parse::<Provider>(),
            Err(ReelgenError::UnknownWorkflow(_))
        ));
    }
}
