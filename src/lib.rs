//! blogcms-rs: content store and admin tooling for a JSON-backed blog
//!
//! The heart of the crate is [`content::ContentStore`], which owns the posts,
//! categories and settings of a blog and keeps their identity and slug rules
//! intact across edits, deletes and bulk imports. Durable storage sits behind
//! [`persistence::PersistenceGateway`]; the CLI and the read-only HTTP API are
//! thin layers over the store.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod persistence;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::ContentStore;
use persistence::JsonFileGateway;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application handle
#[derive(Clone)]
pub struct BlogCms {
    /// Site configuration
    pub config: config::CmsConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Canonical JSON document
    pub data_path: PathBuf,
    /// Directory for exported backups
    pub backup_dir: PathBuf,
}

impl BlogCms {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::CmsConfig::load(&config_path)?
        } else {
            config::CmsConfig::default()
        };

        let data_path = base_dir.join(&config.data_file);
        let backup_dir = base_dir.join(&config.backup_dir);

        Ok(Self {
            config,
            base_dir,
            data_path,
            backup_dir,
        })
    }

    /// Open the file-backed content store
    pub fn open_store(&self) -> Result<ContentStore<JsonFileGateway>> {
        let gateway = JsonFileGateway::new(&self.data_path);
        let store = ContentStore::open(gateway)?
            .with_default_author(self.config.default_author.clone());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDraft;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let cms = BlogCms::new(dir.path()).unwrap();
        assert_eq!(cms.data_path, dir.path().join("data/blog.json"));
        assert_eq!(cms.backup_dir, dir.path().join("backups"));
    }

    #[test]
    fn test_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "data_file: blog.json\ndefault_author: Jo\n",
        )
        .unwrap();
        let cms = BlogCms::new(dir.path()).unwrap();

        let mut store = cms.open_store().unwrap();
        let saved = store
            .save_post(PostDraft::new("Egress", "Exit widths").published())
            .unwrap();
        assert!(saved.sync.is_committed());

        let reopened = cms.open_store().unwrap();
        assert_eq!(reopened.posts().len(), 1);
        assert_eq!(reopened.posts()[0].author, "Jo");
        assert_eq!(reopened.published_posts().len(), 1);
    }
}
