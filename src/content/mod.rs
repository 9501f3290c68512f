//! Content module - the post model, the canonical document and the store

mod document;
mod post;
pub mod query;
mod slug;
mod store;

pub use document::{BlogDocument, Settings, DEFAULT_POSTS_PER_PAGE};
pub use post::{parse_iso_date, Post, PostDraft, PostStatus};
pub use query::{CategoryCount, Page};
pub use slug::generate_slug;
pub use store::{ContentStore, Saved, SyncState, DEFAULT_AUTHOR};
