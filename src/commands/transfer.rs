//! Export and import backups of the content document

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use super::new::report_sync;
use crate::helpers::backup_file_name;
use crate::BlogCms;

/// Write the current document to `output`, or to a dated file in the backup dir
pub fn export(cms: &BlogCms, output: Option<&Path>) -> Result<PathBuf> {
    let store = cms.open_store()?;
    let document = store.export_document();

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            fs::create_dir_all(&cms.backup_dir)?;
            cms.backup_dir
                .join(backup_file_name(&Local::now().date_naive()))
        }
    };

    fs::write(&path, document.to_json()?)?;
    tracing::info!("Exported {} posts to {:?}", document.posts.len(), path);
    println!("Exported: {:?}", path);

    Ok(path)
}

/// Replace the store's content with the document in `file`
pub fn import(cms: &BlogCms, file: &Path) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;

    let mut store = cms.open_store()?;
    let sync = store.import_document(&text)?;

    println!("Imported {} posts from {:?}", store.posts().len(), file);
    report_sync(&sync);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use crate::commands::new::create_post;
    use crate::content::PostDraft;

    #[test]
    fn test_export_to_backup_dir() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        let cms = BlogCms::new(dir.path()).unwrap();
        create_post(&cms, PostDraft::new("Egress", "Exit widths")).unwrap();

        let path = export(&cms, None).unwrap();
        assert!(path.starts_with(&cms.backup_dir));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("blog-backup-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_import_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        let cms = BlogCms::new(dir.path()).unwrap();
        create_post(&cms, PostDraft::new("Old", "post")).unwrap();

        let file = dir.path().join("incoming.json");
        fs::write(
            &file,
            r#"{"posts": [{"id": 8, "slug": "a", "title": "A"}, {"id": 3, "slug": "b", "title": "B"}]}"#,
        )
        .unwrap();
        import(&cms, &file).unwrap();

        let store = cms.open_store().unwrap();
        let ids: Vec<_> = store.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.posts()[0].title, "A");
    }

    #[test]
    fn test_import_bad_shape_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        let cms = BlogCms::new(dir.path()).unwrap();
        create_post(&cms, PostDraft::new("Kept", "post")).unwrap();

        let file = dir.path().join("bad.json");
        fs::write(&file, r#"{"posts": "not-an-array"}"#).unwrap();
        assert!(import(&cms, &file).is_err());

        let store = cms.open_store().unwrap();
        assert_eq!(store.posts()[0].title, "Kept");
    }
}
