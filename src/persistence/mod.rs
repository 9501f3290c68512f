//! Persistence gateways - durable storage for the canonical document
//!
//! The content store reads the document once when it is opened and writes
//! the full document after every mutation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::content::BlogDocument;
use crate::error::PersistenceError;

/// Backing store for the canonical JSON document
pub trait PersistenceGateway {
    /// Read the stored document text. `None` means nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored document
    fn write(&mut self, document: &BlogDocument) -> Result<(), PersistenceError>;
}

/// Stores the document as pretty JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        if !self.path.exists() {
            tracing::debug!("No document at {:?}", self.path);
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&mut self, document: &BlogDocument) -> Result<(), PersistenceError> {
        let json = document.to_json()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Write next to the target, then rename over it
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Wrote {} posts to {:?}", document.posts.len(), self.path);
        Ok(())
    }
}

/// Keeps the document in memory
///
/// Writes can be switched to fail, which lets callers observe how the store
/// behaves when durable storage is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    document: Option<String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing document text
    pub fn with_document(text: impl Into<String>) -> Self {
        Self {
            document: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Last successfully written document text
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.document.clone())
    }

    fn write(&mut self, document: &BlogDocument) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable(
                "memory gateway is rejecting writes".to_string(),
            ));
        }
        self.document = Some(document.to_json()?);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDraft;

    #[test]
    fn test_file_gateway_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path().join("blog.json"));
        assert!(gateway.read().unwrap().is_none());
    }

    #[test]
    fn test_file_gateway_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("blog.json");
        let mut gateway = JsonFileGateway::new(&path);

        let mut doc = BlogDocument::default();
        doc.posts
            .push(PostDraft::new("Egress", "Exit capacity").into_post(1, "Admin"));
        doc.categories.insert("Egress".to_string());
        gateway.write(&doc).unwrap();

        assert!(path.exists());
        let text = gateway.read().unwrap().unwrap();
        let back = BlogDocument::from_json(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_memory_gateway_failure_switch() {
        let mut gateway = MemoryGateway::new();
        let doc = BlogDocument::default();

        gateway.write(&doc).unwrap();
        assert_eq!(gateway.writes(), 1);

        gateway.set_fail_writes(true);
        assert!(matches!(
            gateway.write(&doc),
            Err(PersistenceError::Unavailable(_))
        ));
        assert_eq!(gateway.writes(), 1);
    }
}
