//! Create and edit posts

use anyhow::Result;

use crate::content::{ContentStore, PostDraft, Saved, SyncState};
use crate::persistence::PersistenceGateway;
use crate::BlogCms;

/// Save a draft and report the outcome
pub fn save<G: PersistenceGateway>(store: &mut ContentStore<G>, draft: PostDraft) -> Result<Saved> {
    let saved = store.save_post(draft)?;
    let verb = if saved.created { "Created" } else { "Updated" };
    println!("{} post {} ({})", verb, saved.id, saved.slug);
    report_sync(&saved.sync);
    Ok(saved)
}

/// Create a new post in the site's store
pub fn create_post(cms: &BlogCms, draft: PostDraft) -> Result<Saved> {
    let mut store = cms.open_store()?;
    save(&mut store, PostDraft { id: None, ..draft })
}

/// Merge `draft` onto the post with `id`
pub fn edit_post(cms: &BlogCms, id: u64, draft: PostDraft) -> Result<Saved> {
    let mut store = cms.open_store()?;
    if store.post(id).is_none() {
        anyhow::bail!("No post with id {}", id);
    }
    save(&mut store, PostDraft { id: Some(id), ..draft })
}

/// Remove the post with `id`
pub fn delete_post(cms: &BlogCms, id: u64) -> Result<()> {
    let mut store = cms.open_store()?;
    match store.delete_post(id) {
        Ok(sync) => {
            println!("Deleted post {}", id);
            report_sync(&sync);
        }
        Err(crate::error::StoreError::NotFound(id)) => {
            println!("No post with id {}, nothing deleted", id);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Print a warning when the durable copy fell behind memory
pub fn report_sync(sync: &SyncState) {
    if let SyncState::Diverged { reason } = sync {
        eprintln!("warning: change kept in memory but not saved: {}", reason);
    }
}
