//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CmsConfig;
use crate::content::BlogDocument;
use crate::persistence::{JsonFileGateway, PersistenceGateway};
use crate::CONFIG_FILE;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    let config = if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
        CmsConfig::load(&config_path)?
    } else {
        let config = CmsConfig::default();
        let content = format!("# Blog CMS Configuration\n{}", config.to_yaml()?);
        fs::write(&config_path, content)?;
        config
    };

    fs::create_dir_all(target_dir.join(&config.backup_dir))?;

    let data_path = target_dir.join(&config.data_file);
    if data_path.exists() {
        anyhow::bail!("Data file already exists: {:?}", data_path);
    }

    let mut gateway = JsonFileGateway::new(&data_path);
    gateway.write(&BlogDocument::default())?;
    tracing::info!("Created {:?}", data_path);

    Ok(())
}
