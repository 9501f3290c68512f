//! Content store - owns posts, categories and settings
//!
//! The store enforces identity and slug rules on every mutation and writes
//! the full document through its [`PersistenceGateway`] afterwards. A failed
//! write never rolls the in-memory state back; it is reported as
//! [`SyncState::Diverged`] instead, both in the mutation's return value and
//! through [`ContentStore::sync_state`].

use indexmap::IndexSet;
use serde::Serialize;

use super::query::{self, CategoryCount, Page};
use super::{generate_slug, BlogDocument, Post, PostDraft, Settings};
use crate::error::{Result, StoreError, ValidationError};
use crate::persistence::PersistenceGateway;

/// Author assigned to new posts that do not name one
pub const DEFAULT_AUTHOR: &str = "Admin";

/// Whether the durable copy matches memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncState {
    Committed,
    Diverged { reason: String },
}

impl SyncState {
    pub fn is_committed(&self) -> bool {
        matches!(self, SyncState::Committed)
    }
}

/// Result of a successful [`ContentStore::save_post`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub id: u64,
    pub slug: String,
    /// `true` when the draft was appended as a new post
    pub created: bool,
    pub sync: SyncState,
}

/// In-memory owner of the blog content
#[derive(Debug)]
pub struct ContentStore<G> {
    posts: Vec<Post>,
    categories: IndexSet<String>,
    settings: Settings,
    gateway: G,
    default_author: String,
    sync: SyncState,
}

impl<G: PersistenceGateway> ContentStore<G> {
    /// Create an empty store without reading from the gateway
    pub fn new(gateway: G) -> Self {
        Self {
            posts: Vec::new(),
            categories: IndexSet::new(),
            settings: Settings::default(),
            gateway,
            default_author: DEFAULT_AUTHOR.to_string(),
            sync: SyncState::Committed,
        }
    }

    /// Create a store and load whatever the gateway currently holds
    pub fn open(gateway: G) -> Result<Self> {
        let mut store = Self::new(gateway);
        match store.gateway.read()? {
            Some(text) => store.load(&text)?,
            None => tracing::info!("No stored document, starting empty"),
        }
        Ok(store)
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Replace the whole state from JSON text.
    ///
    /// The document is trusted: ids and slugs are taken as they are. On a
    /// parse failure the current state is left untouched.
    pub fn load(&mut self, text: &str) -> Result<()> {
        let document = BlogDocument::from_json(text)?;
        self.load_document(document);
        Ok(())
    }

    /// Replace the whole state with an already parsed document
    pub fn load_document(&mut self, document: BlogDocument) {
        tracing::info!(
            "Loaded {} posts and {} categories",
            document.posts.len(),
            document.categories.len()
        );
        self.posts = document.posts;
        self.categories = document.categories;
        self.settings = document.settings;
    }

    /// Suggested id for a new post: one past the current maximum
    pub fn next_id(&self) -> u64 {
        self.posts.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Create or update a post.
    ///
    /// A draft whose id matches a stored post is merged onto it in place,
    /// keeping every id. Any other draft is appended and all ids are
    /// renumbered by position. Title and excerpt must be non-blank and the
    /// slug (derived from the title when blank) must not be used by any
    /// other post.
    pub fn save_post(&mut self, mut draft: PostDraft) -> Result<Saved> {
        let index = draft
            .id
            .and_then(|id| self.posts.iter().position(|p| p.id == id));
        let existing = index.map(|i| &self.posts[i]);

        let title = draft
            .title
            .as_deref()
            .or(existing.map(|p| p.title.as_str()))
            .unwrap_or_default();
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField("title").into());
        }

        let excerpt = draft
            .excerpt
            .as_deref()
            .or(existing.map(|p| p.excerpt.as_str()))
            .unwrap_or_default();
        if excerpt.trim().is_empty() {
            return Err(ValidationError::MissingField("excerpt").into());
        }

        let requested = draft
            .slug
            .as_deref()
            .or(existing.map(|p| p.slug.as_str()))
            .unwrap_or_default()
            .trim();
        let slug = if requested.is_empty() {
            generate_slug(title)
        } else {
            requested.to_string()
        };

        // Empty slugs are never considered duplicates
        if !slug.is_empty()
            && self
                .posts
                .iter()
                .any(|p| p.slug == slug && Some(p.id) != draft.id)
        {
            tracing::warn!("Rejected save: slug {:?} already in use", slug);
            return Err(ValidationError::DuplicateSlug(slug).into());
        }

        draft.slug = Some(slug.clone());

        let (id, created, category) = match index {
            Some(i) => {
                let post = &mut self.posts[i];
                draft.apply_to(post);
                tracing::info!("Updated post {} ({})", post.id, post.slug);
                (post.id, false, post.category.clone())
            }
            None => {
                let post = draft.into_post(self.next_id(), &self.default_author);
                let category = post.category.clone();
                self.posts.push(post);
                // Inserts repair any gaps left by a trusted load
                self.renumber();
                let id = self.posts.len() as u64;
                tracing::info!("Created post {} ({})", id, slug);
                (id, true, category)
            }
        };

        self.register_category(&category);
        let sync = self.persist();

        Ok(Saved {
            id,
            slug,
            created,
            sync,
        })
    }

    /// Remove a post and renumber the remaining ones
    pub fn delete_post(&mut self, id: u64) -> Result<SyncState> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = self.posts.remove(index);
        tracing::info!("Deleted post {} ({})", removed.id, removed.slug);

        self.renumber();
        Ok(self.persist())
    }

    /// Replace everything from externally supplied JSON text.
    ///
    /// Rejected without touching the state when the text is not JSON or
    /// `posts` is not an array. Post ids are renumbered; titles, excerpts and
    /// slugs are accepted as they are.
    pub fn import_document(&mut self, text: &str) -> Result<SyncState> {
        let document = BlogDocument::from_import_json(text)?;
        Ok(self.import(document))
    }

    /// Replace everything from an already parsed document
    pub fn import(&mut self, document: BlogDocument) -> SyncState {
        tracing::info!("Importing {} posts", document.posts.len());
        self.load_document(document);
        self.renumber();
        self.persist()
    }

    /// Snapshot of the whole state
    pub fn export_document(&self) -> BlogDocument {
        BlogDocument {
            posts: self.posts.clone(),
            categories: self.categories.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Register a category name. Blank and known names are ignored.
    pub fn add_category(&mut self, name: &str) -> SyncState {
        if self.register_category(name) {
            self.persist()
        } else {
            self.sync.clone()
        }
    }

    /// State of the last write to the gateway
    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Write the current state again, e.g. after a diverged mutation
    pub fn flush(&mut self) -> SyncState {
        self.persist()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn categories(&self) -> &IndexSet<String> {
        &self.categories
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn published_posts(&self) -> Vec<&Post> {
        query::published_posts(&self.posts)
    }

    pub fn featured_post(&self) -> Option<&Post> {
        query::featured_post(&self.posts)
    }

    pub fn paged_posts(&self, page_size: usize) -> Vec<&Post> {
        query::paged_posts(&self.posts, page_size)
    }

    pub fn popular_posts(&self, n: usize) -> Vec<&Post> {
        query::popular_posts(&self.posts, n)
    }

    pub fn search_posts(&self, text: &str) -> Vec<&Post> {
        query::search_posts(&self.posts, text)
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<&Post> {
        query::posts_by_category(&self.posts, category)
    }

    pub fn paginate(&self, page: usize, page_size: usize) -> Page<'_> {
        query::paginate(&self.posts, page, page_size)
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        query::category_counts(&self.posts)
    }

    /// Reassign every id to its 1-based position
    fn renumber(&mut self) {
        for (i, post) in self.posts.iter_mut().enumerate() {
            post.id = i as u64 + 1;
        }
    }

    fn register_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.categories.contains(name) {
            return false;
        }
        tracing::debug!("Registered category {:?}", name);
        self.categories.insert(name.to_string())
    }

    fn persist(&mut self) -> SyncState {
        let document = self.export_document();
        self.sync = match self.gateway.write(&document) {
            Ok(()) => SyncState::Committed,
            Err(e) => {
                tracing::warn!("Persisting content failed, memory and storage diverge: {}", e);
                SyncState::Diverged {
                    reason: e.to_string(),
                }
            }
        };
        self.sync.clone()
    }
}
