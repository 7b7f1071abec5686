//! Ad data providers.
//!
//! Listing pages never reach for global datasets; they are handed an [`AdProvider`].
//! Two implementations ship with the crate:
//!
//! - [`SeedProvider`]: the built-in demo account `"1"`
//! - [`DirectoryProvider`]: JSON files laid out as `<dir>/<account>/<video|static>.json`
//!
//! Every collection is validated before it is returned.

use crate::error::{Error, Result};
use crate::types::{validate_collection, AdRecord, AdType};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const SEED_ACCOUNT: &str = "1";
const SEED_VIDEO_ADS: &str = include_str!("../data/video_ads.json");
const SEED_STATIC_ADS: &str = include_str!("../data/static_ads.json");

/// Source of ad records for an account.
pub trait AdProvider: Send + Sync {
    /// Known account ids, sorted.
    fn accounts(&self) -> Result<Vec<String>>;

    /// All ads of one type for an account.
    ///
    /// Returns [`Error::AccountNotFound`] for an unknown account.
    fn load_ads(&self, account_id: &str, ad_type: AdType) -> Result<Vec<AdRecord>>;
}

/// Parse and validate a JSON array of ad records.
pub fn parse_ads(json: &str) -> Result<Vec<AdRecord>> {
    let ads: Vec<AdRecord> = serde_json::from_str(json)?;
    validate_collection(&ads)?;
    Ok(ads)
}

/// Built-in demo data.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedProvider;

impl AdProvider for SeedProvider {
    fn accounts(&self) -> Result<Vec<String>> {
        Ok(vec![SEED_ACCOUNT.to_string()])
    }

    fn load_ads(&self, account_id: &str, ad_type: AdType) -> Result<Vec<AdRecord>> {
        if account_id != SEED_ACCOUNT {
            return Err(Error::AccountNotFound(account_id.to_string()));
        }
        let ads = match ad_type {
            AdType::Video => parse_ads(SEED_VIDEO_ADS)?,
            AdType::Static => parse_ads(SEED_STATIC_ADS)?,
        };
        tracing::info!(account = account_id, ad_type = %ad_type, count = ads.len(), "Loaded seed ads");
        Ok(ads)
    }
}

/// Reads accounts from a directory tree.
///
/// ```text
/// <root>/
///   1/
///     video.json
///     static.json
///   2/
///     static.json
/// ```
///
/// A missing `<type>.json` in an existing account directory means no ads of that type.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ads_path(&self, account_id: &str, ad_type: AdType) -> PathBuf {
        self.root
            .join(account_id)
            .join(format!("{}.json", ad_type.as_str()))
    }
}

impl AdProvider for DirectoryProvider {
    fn accounts(&self) -> Result<Vec<String>> {
        let pattern = self.root.join("*").join("*.json");
        let pattern_str = pattern.to_string_lossy();

        let entries = glob::glob(&pattern_str)
            .map_err(|e| Error::Config(format!("invalid data directory pattern: {}", e)))?;

        let mut accounts = BTreeSet::new();
        for entry in entries.flatten() {
            let is_ad_file = entry
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.parse::<AdType>().is_ok());
            if !is_ad_file {
                continue;
            }
            if let Some(account) = entry
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
            {
                accounts.insert(account.to_string());
            }
        }
        Ok(accounts.into_iter().collect())
    }

    fn load_ads(&self, account_id: &str, ad_type: AdType) -> Result<Vec<AdRecord>> {
        let account_dir = self.root.join(account_id);
        if account_id.is_empty() || account_id.contains(['/', '\\']) || !account_dir.is_dir() {
            return Err(Error::AccountNotFound(account_id.to_string()));
        }

        let path = self.ads_path(account_id, ad_type);
        if !path.exists() {
            tracing::info!(account = account_id, ad_type = %ad_type, "No ad file, returning empty list");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let ads = parse_ads(&content)?;
        tracing::info!(
            account = account_id,
            ad_type = %ad_type,
            path = %path.display(),
            count = ads.len(),
            "Loaded ads from directory"
        );
        Ok(ads)
    }
}

/// Pick the provider for an optional data directory.
pub fn provider_for(data_dir: Option<&Path>) -> Box<dyn AdProvider> {
    match data_dir {
        Some(dir) => Box::new(DirectoryProvider::new(dir)),
        None => Box::new(SeedProvider),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdStatus;
    use tempfile::TempDir;

    #[test]
    fn test_seed_data() {
        let provider = SeedProvider;
        assert_eq!(provider.accounts().unwrap(), vec!["1"]);

        let video = provider.load_ads("1", AdType::Video).unwrap();
        assert_eq!(video.len(), 4);
        assert_eq!(video[0].name, "Summer Collection Video Campaign");
        assert_eq!(video[0].video_views, Some(85000.0));

        let stat = provider.load_ads("1", AdType::Static).unwrap();
        assert_eq!(stat.len(), 5);
        assert_eq!(stat[2].status, AdStatus::Paused);
        assert!(stat.iter().all(|ad| ad.video_views.is_none()));
    }

    #[test]
    fn test_seed_unknown_account() {
        assert!(matches!(
            SeedProvider.load_ads("42", AdType::Video),
            Err(Error::AccountNotFound(id)) if id == "42"
        ));
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_directory_accounts_and_load() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "acme/static.json",
            r#"[{"id":"a","name":"Banner","status":"active","spend":10}]"#,
        );
        write(tmp.path(), "beta/video.json", "[]");
        write(tmp.path(), "beta/notes.json", "{}");
        std::fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let provider = DirectoryProvider::new(tmp.path());
        assert_eq!(provider.accounts().unwrap(), vec!["acme", "beta"]);

        let ads = provider.load_ads("acme", AdType::Static).unwrap();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].spend, 10.0);

        // account exists, file does not
        assert!(provider.load_ads("acme", AdType::Video).unwrap().is_empty());
        assert!(matches!(
            provider.load_ads("nobody", AdType::Video),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_directory_rejects_invalid_records() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "1/static.json",
            r#"[{"id":"a","name":"A","status":"active","spend":1},
                {"id":"a","name":"B","status":"active","spend":2}]"#,
        );
        write(
            tmp.path(),
            "2/static.json",
            r#"[{"id":"a","name":"A","status":"active","spend":-5}]"#,
        );
        write(tmp.path(), "3/static.json", "not json");

        let provider = DirectoryProvider::new(tmp.path());
        assert!(matches!(
            provider.load_ads("1", AdType::Static),
            Err(Error::InvalidRecord { .. })
        ));
        assert!(matches!(
            provider.load_ads("2", AdType::Static),
            Err(Error::InvalidRecord { .. })
        ));
        assert!(matches!(
            provider.load_ads("3", AdType::Static),
            Err(Error::Json(_))
        ));
    }
}
